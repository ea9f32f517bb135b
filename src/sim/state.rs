//! Session state and entity collections
//!
//! Everything the simulation carries between frames lives here: the active
//! screen, the body, camera, enemies, projectiles and items. There is no
//! other mutable state. Restart and level loads rebuild the entities from
//! the level data.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::body::{AnimationFlags, KinematicBody};
use super::camera::{Camera, CameraBounds};
use super::collision::PlatformIndex;
use super::enemy::{Enemy, EnemyKind};
use super::events::{EventSink, GameEvent};
use super::items::{Inventory, Item, ItemKind};
use super::level::{Level, LevelError};
use super::projectile::{Projectile, ProjectileKind};
use super::rect::Rect;
use super::screen::{ScreenMachine, ScreenState, Transition};
use super::tick::TickInput;
use crate::consts::MAX_TRANSITIONS_PER_FRAME;
use crate::tuning::Tuning;

/// An open conversation
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueSession {
    /// NPC name, `None` for story beats
    pub speaker: Option<String>,
    pub lines: Vec<String>,
    /// Index of the line on screen
    pub line: usize,
}

impl DialogueSession {
    pub fn new(speaker: Option<String>, lines: Vec<String>) -> Self {
        Self {
            speaker,
            lines,
            line: 0,
        }
    }

    pub fn current_line(&self) -> Option<&str> {
        self.lines.get(self.line).map(String::as_str)
    }

    /// Move to the next line; false once the session is over
    pub fn advance(&mut self) -> bool {
        if self.line < self.lines.len() {
            self.line += 1;
        }
        self.line < self.lines.len()
    }

    pub fn is_finished(&self) -> bool {
        self.line >= self.lines.len()
    }
}

/// What a renderer needs for one frame, detached from the live state
#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub screen: ScreenState,
    pub camera_offset: Vec2,
    pub body: BodyView,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub items: Vec<ItemView>,
    pub inventory: Inventory,
    pub speaker: Option<String>,
    pub dialogue_line: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BodyView {
    pub rect: Rect,
    pub flags: AnimationFlags,
    pub health: i32,
    pub max_health: i32,
    pub invulnerable: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct EnemyView {
    pub id: u32,
    pub kind: EnemyKind,
    pub rect: Rect,
    pub facing_right: bool,
    pub health: i32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProjectileView {
    pub id: u32,
    pub kind: ProjectileKind,
    pub rect: Rect,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ItemView {
    pub id: u32,
    pub kind: ItemKind,
    pub rect: Rect,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed for enemy patrol staggering; restarts reuse it
    pub seed: u64,
    pub tuning: Tuning,
    pub level: Level,
    pub platform_index: PlatformIndex,
    pub screen: ScreenMachine,
    pub body: KinematicBody,
    pub camera: Camera,
    /// Sorted by id; defeated entries linger as tombstones until cleanup
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub items: Vec<Item>,
    pub inventory: Inventory,
    pub dialogue: Option<DialogueSession>,
    /// Per story beat: already played this run
    pub story_seen: Vec<bool>,
    /// Non-final exit the body is currently inside (to report it once)
    pub exit_inside: Option<usize>,
    pub throw_cooldown: f32,
    pub shoot_cooldown: f32,
    /// Simulated (Playing) frames this run
    pub time_ticks: u64,
    /// A run exists that the menu can continue
    pub session_active: bool,
    /// Input of the previous frame, for edge-triggered menu navigation
    pub last_input: TickInput,
    next_id: u32,
}

impl GameState {
    /// Validate `level` and build a session parked on the menu
    pub fn new(level: Level, tuning: Tuning, seed: u64) -> Result<Self, LevelError> {
        let level = level.validate()?;
        let platform_index = PlatformIndex::new(&level.platforms);
        let bounds = camera_bounds(&level, &tuning);

        let mut state = Self {
            seed,
            camera: Camera::new(&tuning, bounds),
            body: KinematicBody::new(level.player_spawn),
            tuning,
            platform_index,
            level,
            screen: ScreenMachine::new(ScreenState::Menu),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            items: Vec::new(),
            inventory: Inventory::default(),
            dialogue: None,
            story_seen: Vec::new(),
            exit_inside: None,
            throw_cooldown: 0.0,
            shoot_cooldown: 0.0,
            time_ticks: 0,
            session_active: false,
            last_input: TickInput::default(),
            next_id: 1,
        };
        state.restart();
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Fresh run on the current level: body, inventory and every entity rebuilt
    pub fn restart(&mut self) {
        self.body = KinematicBody::new(self.level.player_spawn);
        self.inventory = Inventory::with_stones(self.tuning.starting_stones);
        self.time_ticks = 0;
        self.rebuild_world();
        log::info!("Run started on '{}'", self.level.name);
    }

    /// Swap in another level, keeping health and inventory
    ///
    /// Fails without touching the current level if the new data is fatal.
    pub fn load_level(&mut self, level: Level) -> Result<(), LevelError> {
        let level = level.validate()?;
        self.platform_index = PlatformIndex::new(&level.platforms);
        self.level = level;

        let health = self.body.health;
        self.body = KinematicBody::new(self.level.player_spawn);
        self.body.health = health.clamp(1, self.body.max_health);
        self.rebuild_world();
        log::info!("Loaded level '{}'", self.level.name);
        Ok(())
    }

    /// Respawn enemies/items from level data, drop projectiles, reset camera
    fn rebuild_world(&mut self) {
        let mut rng = Pcg32::seed_from_u64(self.seed);

        self.enemies.clear();
        for spawn in self.level.enemies.clone() {
            let id = self.next_entity_id();
            self.enemies
                .push(Enemy::spawn(id, &spawn, &self.tuning, &mut rng));
        }

        self.items.clear();
        for spawn in self.level.items.clone() {
            let id = self.next_entity_id();
            self.items.push(Item::new(id, spawn.kind, spawn.x, spawn.y));
        }

        self.projectiles.clear();
        self.dialogue = None;
        self.story_seen = vec![false; self.level.story_beats.len()];
        self.exit_inside = None;
        self.throw_cooldown = 0.0;
        self.shoot_cooldown = 0.0;

        self.camera = Camera::new(&self.tuning, camera_bounds(&self.level, &self.tuning));
        self.camera.snap_to(self.body.center());
        self.normalize_order();
    }

    /// Ask for a screen change; applied by [`GameState::apply_transitions`]
    pub fn request_screen(&mut self, next: ScreenState) {
        self.screen.request(next);
    }

    /// Menu choice that always starts over instead of continuing
    pub fn request_new_game(&mut self) {
        self.session_active = false;
        self.request_screen(ScreenState::Playing);
    }

    /// Open a conversation and switch to the dialogue screen
    pub fn open_dialogue(&mut self, session: DialogueSession) {
        if session.lines.is_empty() {
            return;
        }
        self.dialogue = Some(session);
        self.request_screen(ScreenState::Dialogue);
    }

    /// Drain queued screen requests, running each transition's enter effects
    ///
    /// Enter effects may queue further requests; those are applied in the same
    /// frame, up to a small bound. Anything still queued waits for the next
    /// call.
    pub fn apply_transitions(&mut self, sink: &mut dyn EventSink) {
        self.drain_transitions(sink, MAX_TRANSITIONS_PER_FRAME);
    }

    fn drain_transitions(&mut self, sink: &mut dyn EventSink, limit: usize) {
        if self.screen.is_transitioning() {
            log::warn!("Re-entrant screen drain ignored");
            return;
        }
        for _ in 0..limit {
            let Some(transition) = self.screen.begin() else {
                return;
            };
            self.on_enter(transition);
            self.screen.finish();
            sink.emit(GameEvent::ScreenChanged {
                from: transition.from,
                to: transition.to,
            });
        }
        if let Some(next) = self.screen.pending() {
            log::warn!("Screen request {} deferred to next frame", next.as_str());
        }
    }

    fn on_enter(&mut self, transition: Transition) {
        use ScreenState::*;
        match (transition.from, transition.to) {
            (Menu, Playing) => {
                if !self.session_active {
                    self.restart();
                }
                self.session_active = true;
            }
            (GameOver, Playing) => {
                self.restart();
                self.session_active = true;
            }
            (Dialogue, Playing) => self.dialogue = None,
            (Playing, Dialogue) if self.dialogue.is_none() => {
                // Nothing to show; bounce straight back
                self.screen.request(Playing);
            }
            (GameOver, Menu) | (Victory, Menu) => self.session_active = false,
            _ => {}
        }
    }

    /// Visible entities only: defeated enemies, spent projectiles and
    /// collected items are left out
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            screen: self.screen.current(),
            camera_offset: self.camera.offset(),
            body: BodyView {
                rect: self.body.rect(),
                flags: self.body.animation_flags(),
                health: self.body.health,
                max_health: self.body.max_health,
                invulnerable: self.body.invulnerable_for > 0.0,
            },
            enemies: self
                .enemies
                .iter()
                .filter(|e| !e.defeated)
                .map(|e| EnemyView {
                    id: e.id,
                    kind: e.kind,
                    rect: e.rect,
                    facing_right: e.direction > 0.0,
                    health: e.health,
                })
                .collect(),
            projectiles: self
                .projectiles
                .iter()
                .filter(|p| p.active)
                .map(|p| ProjectileView {
                    id: p.id,
                    kind: p.kind,
                    rect: p.rect,
                })
                .collect(),
            items: self
                .items
                .iter()
                .filter(|i| !i.collected)
                .map(|i| ItemView {
                    id: i.id,
                    kind: i.kind,
                    rect: i.rect,
                })
                .collect(),
            inventory: self.inventory.clone(),
            speaker: self.dialogue.as_ref().and_then(|d| d.speaker.clone()),
            dialogue_line: self
                .dialogue
                .as_ref()
                .and_then(|d| d.current_line())
                .map(str::to_string),
        }
    }

    /// Remove tombstones: spent projectiles, collected items, enemies that
    /// have lingered long enough after defeat
    pub fn cleanup(&mut self) {
        let linger = self.tuning.corpse_linger;
        self.projectiles.retain(|p| p.active);
        self.items.retain(|i| !i.collected);
        self.enemies
            .retain(|e| !(e.defeated && e.defeated_for >= linger));
    }

    /// Ensure collections are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.projectiles.sort_by_key(|p| p.id);
        self.items.sort_by_key(|i| i.id);
    }
}

fn camera_bounds(level: &Level, tuning: &Tuning) -> CameraBounds {
    CameraBounds::for_world(
        level.world_width,
        level.world_height,
        Vec2::new(tuning.viewport_width, tuning.viewport_height),
    )
}
