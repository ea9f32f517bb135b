//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-stepped, single-threaded, no I/O
//! - Seeded RNG only
//! - Stable iteration order (by entity ID, platforms in level order)
//! - No rendering, audio or platform dependencies

pub mod body;
pub mod camera;
pub mod collision;
pub mod enemy;
pub mod events;
pub mod items;
pub mod level;
pub mod projectile;
pub mod rect;
pub mod screen;
pub mod state;
pub mod tick;

pub use body::{AnimationFlags, BodyInput, KinematicBody};
pub use camera::{Camera, CameraBounds};
pub use collision::{Collidable, HitOutcome, PlatformIndex};
pub use enemy::{Enemy, EnemyKind};
pub use events::{EventSink, GameEvent, HitTarget, NullSink};
pub use items::{Inventory, Item, ItemKind};
pub use level::{Level, LevelError, Platform, PlatformKind};
pub use projectile::{Projectile, ProjectileKind};
pub use rect::Rect;
pub use screen::{ScreenMachine, ScreenState, Transition};
pub use state::{DialogueSession, GameState, RenderSnapshot};
pub use tick::{Action, Direction, InputSource, TickInput, tick};
