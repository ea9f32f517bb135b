//! Top-level screen state machine
//!
//! Exactly one [`ScreenState`] is active. Requests are queued rather than
//! applied on the spot: a collaborator callback that asks for another
//! transition while one is being applied just overwrites the queued target
//! (last writer wins), and the owner drains the queue before the frame ends.

use serde::{Deserialize, Serialize};

/// Which presentation owns the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScreenState {
    Menu,
    /// The only state that advances the simulation
    Playing,
    Dialogue,
    Inventory,
    Paused,
    Victory,
    GameOver,
}

impl ScreenState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenState::Menu => "Menu",
            ScreenState::Playing => "Playing",
            ScreenState::Dialogue => "Dialogue",
            ScreenState::Inventory => "Inventory",
            ScreenState::Paused => "Paused",
            ScreenState::Victory => "Victory",
            ScreenState::GameOver => "GameOver",
        }
    }

    /// Does this state run the physics/AI/projectile/camera step?
    pub fn simulates(&self) -> bool {
        matches!(self, ScreenState::Playing)
    }

    /// Legal edges of the screen graph
    pub fn can_transition_to(&self, next: ScreenState) -> bool {
        use ScreenState::*;
        matches!(
            (self, next),
            (Menu, Playing)
                | (Playing, Dialogue)
                | (Dialogue, Playing)
                | (Playing, Inventory)
                | (Inventory, Playing)
                | (Playing, Paused)
                | (Paused, Playing)
                | (Paused, Menu)
                | (Playing, GameOver)
                | (GameOver, Playing)
                | (GameOver, Menu)
                | (Playing, Victory)
                | (Victory, Menu)
        )
    }
}

/// A transition that was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: ScreenState,
    pub to: ScreenState,
}

/// Current screen plus the queued request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenMachine {
    current: ScreenState,
    pending: Option<ScreenState>,
    /// Set while a transition's enter effects run
    #[serde(skip)]
    in_transition: bool,
}

impl Default for ScreenMachine {
    fn default() -> Self {
        Self::new(ScreenState::Menu)
    }
}

impl ScreenMachine {
    pub fn new(initial: ScreenState) -> Self {
        Self {
            current: initial,
            pending: None,
            in_transition: false,
        }
    }

    pub fn current(&self) -> ScreenState {
        self.current
    }

    pub fn pending(&self) -> Option<ScreenState> {
        self.pending
    }

    pub fn is_transitioning(&self) -> bool {
        self.in_transition
    }

    /// Queue a transition; a later request in the same frame replaces it
    pub fn request(&mut self, next: ScreenState) {
        match self.pending.replace(next) {
            Some(replaced) if replaced != next => {
                log::debug!("Screen request {} superseded by {}", replaced.as_str(), next.as_str());
            }
            _ => {}
        }
    }

    /// Pop the queued request and make it current if the edge is legal
    ///
    /// The caller runs the enter effects and then calls [`ScreenMachine::finish`].
    /// Illegal or no-op requests are dropped.
    pub fn begin(&mut self) -> Option<Transition> {
        let next = self.pending.take()?;
        if next == self.current {
            return None;
        }
        if !self.current.can_transition_to(next) {
            log::warn!(
                "Rejected screen transition {} -> {}",
                self.current.as_str(),
                next.as_str()
            );
            return None;
        }

        let from = self.current;
        self.current = next;
        self.in_transition = true;
        log::info!("Screen {} -> {}", from.as_str(), next.as_str());
        Some(Transition { from, to: next })
    }

    pub fn finish(&mut self) {
        self.in_transition = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_playing_simulates() {
        use ScreenState::*;
        for state in [Menu, Dialogue, Inventory, Paused, Victory, GameOver] {
            assert!(!state.simulates());
        }
        assert!(Playing.simulates());
    }

    #[test]
    fn test_legal_edges() {
        use ScreenState::*;
        assert!(Menu.can_transition_to(Playing));
        assert!(Paused.can_transition_to(Menu));
        assert!(GameOver.can_transition_to(Playing));
        assert!(!Menu.can_transition_to(Victory));
        assert!(!Dialogue.can_transition_to(Inventory));
        assert!(!Victory.can_transition_to(Playing));
        assert!(!Paused.can_transition_to(GameOver));
    }

    #[test]
    fn test_request_last_writer_wins() {
        let mut machine = ScreenMachine::new(ScreenState::Playing);
        machine.request(ScreenState::Paused);
        machine.request(ScreenState::Inventory);
        let t = machine.begin().unwrap();
        assert_eq!(t.to, ScreenState::Inventory);
        assert!(machine.is_transitioning());
        machine.finish();
        assert_eq!(machine.current(), ScreenState::Inventory);
        assert!(machine.begin().is_none());
    }

    #[test]
    fn test_illegal_request_dropped() {
        let mut machine = ScreenMachine::default();
        machine.request(ScreenState::Victory);
        assert!(machine.begin().is_none());
        assert_eq!(machine.current(), ScreenState::Menu);
        assert_eq!(machine.pending(), None);
    }

    #[test]
    fn test_request_during_transition_is_queued() {
        let mut machine = ScreenMachine::new(ScreenState::Playing);
        machine.request(ScreenState::GameOver);
        machine.begin().unwrap();
        // An enter effect asks to go somewhere else
        machine.request(ScreenState::Menu);
        assert_eq!(machine.current(), ScreenState::GameOver);
        machine.finish();
        let t = machine.begin().unwrap();
        assert_eq!((t.from, t.to), (ScreenState::GameOver, ScreenState::Menu));
    }
}
