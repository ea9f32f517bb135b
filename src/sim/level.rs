//! Level data as handed over by the level/asset loader
//!
//! Immutable for the lifetime of a level. Validation runs once at load time:
//! recoverable problems (negative sizes, spawns outside the world) are clamped
//! and logged, while data the simulation cannot run without (no world, no
//! floor) is rejected before the first tick.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::EnemyKind;
use super::items::ItemKind;
use super::rect::Rect;

/// Cosmetic platform tag (renderer picks the tileset)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlatformKind {
    #[default]
    Grass,
    Stone,
    Wood,
    Bridge,
}

/// A static platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    #[serde(default)]
    pub kind: PlatformKind,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32, height: f32, kind: PlatformKind) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
            kind,
        }
    }
}

/// Where an enemy starts and what it is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub x: f32,
    pub y: f32,
    pub kind: EnemyKind,
    pub health: i32,
    /// Half-width of the patrol range; tuning default when absent
    #[serde(default)]
    pub patrol_radius: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSpawn {
    pub x: f32,
    pub y: f32,
    pub kind: ItemKind,
}

/// A region that ends the level when the body enters it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitTrigger {
    pub rect: Rect,
    pub destination_id: String,
    /// Reaching a final exit wins the game
    #[serde(default)]
    pub is_final: bool,
}

/// A character the player can talk to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Npc {
    pub name: String,
    pub rect: Rect,
    pub lines: Vec<String>,
}

/// Dialogue that plays once when the body first enters `rect`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryBeat {
    pub rect: Rect,
    pub lines: Vec<String>,
}

/// Everything needed to (re)build a level's entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    pub world_width: f32,
    pub world_height: f32,
    /// Top edge of the world floor, the support of last resort
    pub floor_y: f32,
    /// Top-left corner of the player body at spawn
    pub player_spawn: Vec2,
    /// Ordered platform list
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    #[serde(default)]
    pub items: Vec<ItemSpawn>,
    #[serde(default)]
    pub exits: Vec<ExitTrigger>,
    #[serde(default)]
    pub npcs: Vec<Npc>,
    #[serde(default)]
    pub story_beats: Vec<StoryBeat>,
}

/// Level data the simulation cannot run with
#[derive(Debug)]
pub enum LevelError {
    /// JSON could not be parsed
    Parse(serde_json::Error),
    InvalidWorldSize { width: f32, height: f32 },
    /// The floor is missing from the playable area
    NoFloor { floor_y: f32, world_height: f32 },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::Parse(err) => write!(f, "level data is not valid JSON: {err}"),
            LevelError::InvalidWorldSize { width, height } => {
                write!(f, "world size must be positive, got {width}x{height}")
            }
            LevelError::NoFloor {
                floor_y,
                world_height,
            } => write!(
                f,
                "floor at y={floor_y} is outside the world (height {world_height})"
            ),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LevelError {
    fn from(err: serde_json::Error) -> Self {
        LevelError::Parse(err)
    }
}

impl Level {
    /// Parse and validate level JSON
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: Level = serde_json::from_str(json)?;
        level.validate()
    }

    /// Reject fatal problems, clamp everything else into range
    pub fn validate(mut self) -> Result<Self, LevelError> {
        let (width, height) = (self.world_width, self.world_height);
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(LevelError::InvalidWorldSize { width, height });
        }
        if !self.floor_y.is_finite() || self.floor_y <= 0.0 || self.floor_y > height {
            return Err(LevelError::NoFloor {
                floor_y: self.floor_y,
                world_height: height,
            });
        }

        let clamp_rect = |what: &str, rect: &mut Rect| {
            let x = if rect.x.is_finite() { rect.x.clamp(0.0, width) } else { 0.0 };
            let y = if rect.y.is_finite() { rect.y.clamp(0.0, height) } else { 0.0 };
            let clamped = Rect::new(x, y, rect.width, rect.height);
            if clamped != *rect {
                log::warn!("{} rect {:?} outside the world or inverted, clamped", what, rect);
                *rect = clamped;
            }
        };

        for platform in &mut self.platforms {
            clamp_rect("Platform", &mut platform.rect);
        }
        for exit in &mut self.exits {
            clamp_rect("Exit", &mut exit.rect);
        }
        for npc in &mut self.npcs {
            clamp_rect("NPC", &mut npc.rect);
        }
        for beat in &mut self.story_beats {
            clamp_rect("Story beat", &mut beat.rect);
        }

        let floor_y = self.floor_y;
        let clamp_spawn = |what: &str, x: &mut f32, y: &mut f32| {
            let cx = x.clamp(0.0, width);
            let cy = y.clamp(0.0, floor_y);
            if cx != *x || cy != *y || !x.is_finite() || !y.is_finite() {
                log::warn!("{} spawn ({}, {}) outside the world, clamped", what, x, y);
            }
            *x = if cx.is_finite() { cx } else { 0.0 };
            *y = if cy.is_finite() { cy } else { 0.0 };
        };

        clamp_spawn("Player", &mut self.player_spawn.x, &mut self.player_spawn.y);
        for enemy in &mut self.enemies {
            clamp_spawn("Enemy", &mut enemy.x, &mut enemy.y);
            if enemy.health <= 0 {
                log::warn!("Enemy {:?} spawned with health {}, using 1", enemy.kind, enemy.health);
                enemy.health = 1;
            }
            if let Some(radius) = enemy.patrol_radius.as_mut() {
                *radius = radius.max(0.0);
            }
        }
        for item in &mut self.items {
            clamp_spawn("Item", &mut item.x, &mut item.y);
        }
        log::info!(
            "Level '{}' validated: {}x{} world, {} platforms, {} enemies, {} items",
            self.name,
            width,
            height,
            self.platforms.len(),
            self.enemies.len(),
            self.items.len()
        );
        Ok(self)
    }

    /// Built-in level used by the headless runner and integration tests
    pub fn demo() -> Self {
        use PlatformKind::*;

        Self {
            name: "Meadow Ridge".to_string(),
            world_width: 4096.0,
            world_height: 1024.0,
            floor_y: 960.0,
            player_spawn: Vec2::new(64.0, 852.0),
            platforms: vec![
                Platform::new(0.0, 900.0, 640.0, 32.0, Grass),
                Platform::new(720.0, 820.0, 200.0, 24.0, Wood),
                Platform::new(980.0, 740.0, 180.0, 24.0, Wood),
                Platform::new(1240.0, 900.0, 900.0, 32.0, Grass),
                Platform::new(1500.0, 780.0, 160.0, 24.0, Stone),
                Platform::new(2200.0, 860.0, 320.0, 24.0, Bridge),
                Platform::new(2600.0, 900.0, 1496.0, 32.0, Grass),
            ],
            enemies: vec![
                EnemySpawn {
                    x: 1400.0,
                    y: 852.0,
                    kind: EnemyKind::Soldier,
                    health: 3,
                    patrol_radius: Some(120.0),
                },
                EnemySpawn {
                    x: 2800.0,
                    y: 868.0,
                    kind: EnemyKind::Animal,
                    health: 2,
                    patrol_radius: None,
                },
            ],
            items: vec![
                ItemSpawn { x: 760.0, y: 790.0, kind: ItemKind::Stone },
                ItemSpawn { x: 1040.0, y: 710.0, kind: ItemKind::Herb },
                ItemSpawn { x: 1560.0, y: 750.0, kind: ItemKind::Staff },
                ItemSpawn { x: 2350.0, y: 830.0, kind: ItemKind::Relic },
            ],
            exits: vec![ExitTrigger {
                rect: Rect::new(3980.0, 800.0, 64.0, 100.0),
                destination_id: "summit".to_string(),
                is_final: true,
            }],
            npcs: vec![Npc {
                name: "Hermit".to_string(),
                rect: Rect::new(400.0, 852.0, 32.0, 48.0),
                lines: vec![
                    "The ridge is crawling with soldiers.".to_string(),
                    "Stones won't stop them for long. Find the staff.".to_string(),
                ],
            }],
            story_beats: vec![StoryBeat {
                rect: Rect::new(1240.0, 700.0, 40.0, 200.0),
                lines: vec!["Smoke rises from the watchtower ahead.".to_string()],
            }],
        }
    }
}
