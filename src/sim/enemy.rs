//! Patrolling enemies
//!
//! Each enemy walks back and forth around its spawn point. Two independent
//! triggers reverse it: a periodic timer and the patrol boundary. The boundary
//! check runs last so a clamped enemy always heads back toward its origin.
//! Defeated enemies are tombstones: skipped by AI and collision until the
//! cleanup pass removes them.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Collidable, HitOutcome};
use super::level::EnemySpawn;
use super::rect::Rect;
use crate::frame_step;
use crate::tuning::Tuning;

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Soldier,
    Animal,
    Brute,
}

impl EnemyKind {
    /// Body size (width, height)
    pub fn size(&self) -> (f32, f32) {
        match self {
            EnemyKind::Soldier => (32.0, 48.0),
            EnemyKind::Animal => (40.0, 32.0),
            EnemyKind::Brute => (48.0, 56.0),
        }
    }

    /// Multiplier on the tuned patrol speed
    pub fn speed_factor(&self) -> f32 {
        match self {
            EnemyKind::Soldier => 1.0,
            EnemyKind::Animal => 1.4,
            EnemyKind::Brute => 0.6,
        }
    }

    /// Damage dealt to the player on touch
    pub fn contact_damage(&self) -> i32 {
        match self {
            EnemyKind::Soldier | EnemyKind::Animal => 1,
            EnemyKind::Brute => 2,
        }
    }
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub rect: Rect,
    pub health: i32,
    pub max_health: i32,
    /// Left edge the patrol is centred on
    pub patrol_origin_x: f32,
    pub patrol_radius: f32,
    /// -1.0 (left) or +1.0 (right)
    pub direction: f32,
    /// Seconds since the last timer-driven flip
    pub flip_timer: f32,
    pub defeated: bool,
    /// Seconds spent defeated (cleanup removes after the linger time)
    pub defeated_for: f32,
}

impl Enemy {
    /// Build an enemy from its spawn record
    ///
    /// The flip timer starts at a random phase so enemies sharing a period do
    /// not turn around in lockstep.
    pub fn spawn(id: u32, spawn: &EnemySpawn, tuning: &Tuning, rng: &mut impl Rng) -> Self {
        let (width, height) = spawn.kind.size();
        let health = spawn.health.max(1);
        let flip_timer = if tuning.patrol_flip_period > 0.0 {
            rng.random_range(0.0..tuning.patrol_flip_period)
        } else {
            0.0
        };

        Self {
            id,
            kind: spawn.kind,
            rect: Rect::new(spawn.x, spawn.y, width, height),
            health,
            max_health: health,
            patrol_origin_x: spawn.x,
            patrol_radius: spawn
                .patrol_radius
                .unwrap_or(tuning.default_patrol_radius)
                .max(0.0),
            direction: 1.0,
            flip_timer,
            defeated: false,
            defeated_for: 0.0,
        }
    }

    /// Advance the patrol by one frame
    pub fn update(&mut self, dt: f32, tuning: &Tuning) {
        if self.defeated {
            self.defeated_for += dt;
            return;
        }

        let speed = tuning.enemy_speed * self.kind.speed_factor();
        self.rect.x += self.direction * speed * frame_step(dt);

        // Timer flip
        if tuning.patrol_flip_period > 0.0 {
            self.flip_timer += dt;
            if self.flip_timer >= tuning.patrol_flip_period {
                self.flip_timer -= tuning.patrol_flip_period;
                self.direction = -self.direction;
            }
        }

        // Boundary flip + clamp (dominates the timer)
        let offset = self.rect.x - self.patrol_origin_x;
        if offset.abs() > self.patrol_radius {
            let side = offset.signum();
            self.rect.x = self.patrol_origin_x + side * self.patrol_radius;
            self.direction = -side;
        }
    }

    /// Subtract health; flips to defeated at zero
    pub fn take_damage(&mut self, damage: i32) -> HitOutcome {
        if self.defeated {
            return HitOutcome::Ignored;
        }
        self.health = (self.health - damage.max(0)).max(0);
        if self.health <= 0 {
            self.defeated = true;
            self.defeated_for = 0.0;
            HitOutcome::Destroyed
        } else {
            HitOutcome::Damaged {
                remaining: self.health,
            }
        }
    }
}

impl Collidable for Enemy {
    fn bounds(&self) -> Rect {
        self.rect
    }

    fn is_active(&self) -> bool {
        !self.defeated
    }

    fn on_hit(&mut self, damage: i32) -> HitOutcome {
        self.take_damage(damage)
    }
}
