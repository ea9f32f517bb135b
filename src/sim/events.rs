//! Outbound notifications from the simulation
//!
//! The core never calls audio or UI code directly. Update functions receive an
//! [`EventSink`] handle and report what happened; collaborators decide what,
//! if anything, to play or show. Emitting never blocks.

use serde::{Deserialize, Serialize};

use super::items::ItemKind;
use super::projectile::ProjectileKind;
use super::screen::ScreenState;

/// Who took damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitTarget {
    Player,
    Enemy { id: u32 },
}

/// Something the rest of the game may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Body left the ground by jumping
    Jump,
    /// Body touched down after being airborne
    Land,
    Hit { target: HitTarget, damage: i32 },
    Defeat { enemy_id: u32 },
    ItemCollected { item_id: u32, kind: ItemKind },
    ProjectileSpawned { id: u32, kind: ProjectileKind },
    /// Body entered a non-final exit; the host decides what to load
    ExitReached { destination_id: String },
    /// Dialogue moved to `line` (0-based) of the active session
    DialogueAdvanced { line: usize },
    ScreenChanged { from: ScreenState, to: ScreenState },
}

/// Receiver for simulation events
///
/// Only [`EventSink::emit`] is required. The four audio hooks route through it
/// by default; an audio collaborator can override them individually.
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);

    fn on_jump(&mut self) {
        self.emit(GameEvent::Jump);
    }

    fn on_land(&mut self) {
        self.emit(GameEvent::Land);
    }

    fn on_hit(&mut self, target: HitTarget, damage: i32) {
        self.emit(GameEvent::Hit { target, damage });
    }

    fn on_defeat(&mut self, enemy_id: u32) {
        self.emit(GameEvent::Defeat { enemy_id });
    }
}

/// Records every event in order (tests, replays in a debugger)
impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: GameEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hooks_route_through_emit() {
        let mut events: Vec<GameEvent> = Vec::new();
        events.on_jump();
        events.on_land();
        events.on_hit(HitTarget::Enemy { id: 3 }, 2);
        events.on_defeat(3);
        assert_eq!(
            events,
            vec![
                GameEvent::Jump,
                GameEvent::Land,
                GameEvent::Hit {
                    target: HitTarget::Enemy { id: 3 },
                    damage: 2
                },
                GameEvent::Defeat { enemy_id: 3 },
            ]
        );
    }

    #[test]
    fn test_hook_override() {
        #[derive(Default)]
        struct JumpCounter {
            jumps: u32,
            other: u32,
        }
        impl EventSink for JumpCounter {
            fn emit(&mut self, _event: GameEvent) {
                self.other += 1;
            }
            fn on_jump(&mut self) {
                self.jumps += 1;
            }
        }

        let mut sink = JumpCounter::default();
        sink.on_jump();
        sink.on_land();
        assert_eq!(sink.jumps, 1);
        assert_eq!(sink.other, 1);
    }
}
