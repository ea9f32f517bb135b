//! Frame step
//!
//! One call to [`tick`] consumes one `dt` and fully settles the state. Only
//! the `Playing` screen advances the world; the other screens read input for
//! their own presentation and leave the simulation frozen.

use super::body::BodyInput;
use super::collision::{
    check_support, collect_items, move_horizontal, move_vertical, resolve_enemy_contacts,
};
use super::events::{EventSink, GameEvent};
use super::items::UseOutcome;
use super::projectile::{Projectile, resolve_projectile_hits};
use super::screen::ScreenState;
use super::state::{DialogueSession, GameState};
use crate::consts::MAX_FRAME_DT;
use crate::frame_step;

/// Held-direction queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
}

/// One-shot actions besides interact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Throw,
    Shoot,
    Pause,
    Inventory,
    Confirm,
    Back,
    NewGame,
}

/// Host-side input device, polled once at the top of the frame
pub trait InputSource {
    fn is_direction_held(&self, direction: Direction) -> bool;

    /// True only for the frame the key went down
    fn is_interact_pressed(&self) -> bool;

    fn is_action_pressed(&self, _action: Action) -> bool {
        false
    }
}

/// Input for a single tick
///
/// `left`, `right` and `jump` are held state. The rest are presses, true only
/// on the frame the key went down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// Talk to NPCs; advance dialogue; use the selected inventory slot
    pub interact: bool,
    pub throw: bool,
    pub shoot: bool,
    pub pause: bool,
    /// Open/close the inventory
    pub inventory: bool,
    /// Start/continue from the menu, resume, restart
    pub confirm: bool,
    /// Leave the current screen (abandon from pause, skip dialogue)
    pub back: bool,
    /// Menu: start over even if a run can be continued
    pub new_game: bool,
}

impl TickInput {
    pub fn poll(source: &impl InputSource) -> Self {
        Self {
            left: source.is_direction_held(Direction::Left),
            right: source.is_direction_held(Direction::Right),
            jump: source.is_direction_held(Direction::Up),
            interact: source.is_interact_pressed(),
            throw: source.is_action_pressed(Action::Throw),
            shoot: source.is_action_pressed(Action::Shoot),
            pause: source.is_action_pressed(Action::Pause),
            inventory: source.is_action_pressed(Action::Inventory),
            confirm: source.is_action_pressed(Action::Confirm),
            back: source.is_action_pressed(Action::Back),
            new_game: source.is_action_pressed(Action::NewGame),
        }
    }

    pub fn body(&self) -> BodyInput {
        BodyInput {
            left: self.left,
            right: self.right,
            jump: self.jump,
        }
    }
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, sink: &mut dyn EventSink) {
    // Requests the host made between frames
    state.apply_transitions(sink);

    match state.screen.current() {
        ScreenState::Menu => {
            if input.new_game {
                state.request_new_game();
            } else if input.confirm {
                state.request_screen(ScreenState::Playing);
            }
        }
        ScreenState::Playing => step_playing(state, input, dt, sink),
        ScreenState::Dialogue => step_dialogue(state, input, sink),
        ScreenState::Inventory => step_inventory(state, input),
        ScreenState::Paused => {
            if input.back {
                state.request_screen(ScreenState::Menu);
            } else if input.pause || input.confirm {
                state.request_screen(ScreenState::Playing);
            }
        }
        ScreenState::GameOver => {
            if input.back {
                state.request_screen(ScreenState::Menu);
            } else if input.confirm {
                state.request_screen(ScreenState::Playing);
            }
        }
        ScreenState::Victory => {
            if input.confirm || input.back {
                state.request_screen(ScreenState::Menu);
            }
        }
    }

    state.apply_transitions(sink);
    state.last_input = *input;
}

fn step_playing(state: &mut GameState, input: &TickInput, dt: f32, sink: &mut dyn EventSink) {
    if input.pause {
        state.request_screen(ScreenState::Paused);
        return;
    }
    if input.inventory {
        state.request_screen(ScreenState::Inventory);
        return;
    }
    if input.interact && try_talk(state) {
        return;
    }

    let dt = dt.clamp(0.0, MAX_FRAME_DT);
    let step = frame_step(dt);
    state.time_ticks += 1;
    state.body.tick_timers(dt);
    state.throw_cooldown = (state.throw_cooldown - dt).max(0.0);
    state.shoot_cooldown = (state.shoot_cooldown - dt).max(0.0);

    // Body
    let tuning = &state.tuning;
    let level = &state.level;
    state.body.apply_input(input.body(), tuning, sink);
    state.body.apply_gravity(step, tuning);
    move_horizontal(
        &mut state.body,
        step,
        &level.platforms,
        &state.platform_index,
        level.world_width,
        tuning,
    );
    check_support(
        &mut state.body,
        &level.platforms,
        &state.platform_index,
        level.floor_y,
        tuning,
    );
    move_vertical(
        &mut state.body,
        step,
        &level.platforms,
        &state.platform_index,
        level.floor_y,
        tuning,
        sink,
    );
    resolve_enemy_contacts(&mut state.body, &state.enemies, tuning, sink);
    collect_items(&state.body, &mut state.items, &mut state.inventory, sink);

    if state.body.is_dead() {
        log::info!("Player defeated after {} ticks", state.time_ticks);
        state.request_screen(ScreenState::GameOver);
        return;
    }

    fire(state, input, sink);

    // Enemies
    for enemy in &mut state.enemies {
        enemy.update(dt, &state.tuning);
    }

    // Projectiles
    let (world_width, floor_y) = (state.level.world_width, state.level.floor_y);
    for projectile in &mut state.projectiles {
        if let Some(reason) = projectile.update(dt, world_width, floor_y) {
            log::trace!("Projectile {} expired: {:?}", projectile.id, reason);
        }
    }
    resolve_projectile_hits(&mut state.projectiles, &mut state.enemies, sink);

    state.camera.update(state.body.center(), state.time_ticks);

    check_triggers(state, sink);
    state.cleanup();
}

/// Spawn stones/bolts for this frame's throw and shoot presses
fn fire(state: &mut GameState, input: &TickInput, sink: &mut dyn EventSink) {
    if input.throw && state.throw_cooldown <= 0.0 && state.inventory.take_stone() {
        let id = state.next_entity_id();
        let stone = Projectile::stone(
            id,
            state.body.hand_position(),
            state.body.facing_right,
            &state.tuning,
        );
        sink.emit(GameEvent::ProjectileSpawned { id, kind: stone.kind });
        state.projectiles.push(stone);
        state.throw_cooldown = state.tuning.throw_cooldown;
    }

    if input.shoot && state.shoot_cooldown <= 0.0 && state.inventory.has_staff {
        let id = state.next_entity_id();
        let bolt = Projectile::bolt(
            id,
            state.body.hand_position(),
            state.body.facing_right,
            &state.tuning,
        );
        sink.emit(GameEvent::ProjectileSpawned { id, kind: bolt.kind });
        state.projectiles.push(bolt);
        state.shoot_cooldown = state.tuning.shoot_cooldown;
    }
}

/// Open a conversation with the first NPC within talking range
fn try_talk(state: &mut GameState) -> bool {
    let reach = state.body.rect().inflate(state.tuning.talk_radius);
    let Some(npc) = state
        .level
        .npcs
        .iter()
        .find(|n| !n.lines.is_empty() && n.rect.intersects(&reach))
    else {
        return false;
    };

    log::debug!("Talking to {}", npc.name);
    let session = DialogueSession::new(Some(npc.name.clone()), npc.lines.clone());
    state.open_dialogue(session);
    true
}

/// Exits and story beats under the body after everything has moved
fn check_triggers(state: &mut GameState, sink: &mut dyn EventSink) {
    let rect = state.body.rect();

    let inside = state.level.exits.iter().position(|e| e.rect.intersects(&rect));
    if let Some(i) = inside {
        let exit = &state.level.exits[i];
        if exit.is_final {
            log::info!("Reached final exit '{}'", exit.destination_id);
            state.request_screen(ScreenState::Victory);
            return;
        }
        if state.exit_inside != Some(i) {
            log::info!("Reached exit to '{}'", exit.destination_id);
            sink.emit(GameEvent::ExitReached {
                destination_id: exit.destination_id.clone(),
            });
        }
    }
    state.exit_inside = inside;

    let beat = (0..state.level.story_beats.len()).find(|&i| {
        state.story_seen.get(i) == Some(&false)
            && state.level.story_beats[i].rect.intersects(&rect)
    });
    if let Some(i) = beat {
        state.story_seen[i] = true;
        let lines = state.level.story_beats[i].lines.clone();
        state.open_dialogue(DialogueSession::new(None, lines));
    }
}

fn step_dialogue(state: &mut GameState, input: &TickInput, sink: &mut dyn EventSink) {
    if input.back {
        state.request_screen(ScreenState::Playing);
        return;
    }
    if !(input.interact || input.confirm) {
        return;
    }

    let next_line = state
        .dialogue
        .as_mut()
        .and_then(|session| session.advance().then_some(session.line));
    match next_line {
        Some(line) => sink.emit(GameEvent::DialogueAdvanced { line }),
        None => state.request_screen(ScreenState::Playing),
    }
}

fn step_inventory(state: &mut GameState, input: &TickInput) {
    if input.inventory || input.back {
        state.request_screen(ScreenState::Playing);
        return;
    }

    // Cursor moves once per key press, not per held frame
    let last = state.last_input;
    if input.left && !last.left {
        state.inventory.move_cursor(-1);
    }
    if input.right && !last.right {
        state.inventory.move_cursor(1);
    }

    if input.interact || input.confirm {
        match state.inventory.use_selected(state.tuning.herb_heal) {
            UseOutcome::Heal(amount) => {
                state.body.heal(amount);
                log::debug!("Used herb, health now {}", state.body.health);
            }
            UseOutcome::Nothing => {}
        }
    }
}
