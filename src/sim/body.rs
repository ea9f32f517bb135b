//! The player's kinematic body
//!
//! Velocities are per-frame quantities at the target frame rate; every
//! integration multiplies by the dt-normalized `step` so behaviour holds up
//! when the frame driver hands us a slightly longer or shorter dt.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Collidable, HitOutcome};
use super::events::EventSink;
use super::rect::Rect;
use crate::consts::{PLAYER_HEIGHT, PLAYER_MAX_HEALTH, PLAYER_WIDTH};
use crate::tuning::Tuning;

/// Movement intent for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BodyInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Flags a renderer uses to pick the sprite/animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationFlags {
    pub on_ground: bool,
    pub is_jumping: bool,
    pub is_walking: bool,
    pub facing_right: bool,
}

/// Player body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KinematicBody {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub on_ground: bool,
    pub is_jumping: bool,
    pub facing_right: bool,
    pub health: i32,
    pub max_health: i32,
    /// Seconds left of contact-damage immunity
    pub invulnerable_for: f32,
}

impl KinematicBody {
    /// A fresh body at `spawn` (top-left), airborne until the first resolution
    pub fn new(spawn: Vec2) -> Self {
        Self {
            pos: spawn,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            vel: Vec2::ZERO,
            on_ground: false,
            is_jumping: false,
            facing_right: true,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            invulnerable_for: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Where projectiles leave the body (leading edge, chest height)
    pub fn hand_position(&self) -> Vec2 {
        let x = if self.facing_right {
            self.pos.x + self.size.x
        } else {
            self.pos.x
        };
        Vec2::new(x, self.pos.y + self.size.y * 0.4)
    }

    pub fn is_walking(&self) -> bool {
        self.on_ground && self.vel.x != 0.0
    }

    pub fn animation_flags(&self) -> AnimationFlags {
        AnimationFlags {
            on_ground: self.on_ground,
            is_jumping: self.is_jumping,
            is_walking: self.is_walking(),
            facing_right: self.facing_right,
        }
    }

    /// Set horizontal velocity from held keys and start a jump if grounded
    ///
    /// No acceleration model: velocity snaps to `±walk_speed` or zero. A jump
    /// request while airborne leaves `vel.y` untouched. Returns true if a jump
    /// started.
    pub fn apply_input(&mut self, input: BodyInput, tuning: &Tuning, sink: &mut dyn EventSink) -> bool {
        self.vel.x = match (input.left, input.right) {
            (true, false) => -tuning.walk_speed,
            (false, true) => tuning.walk_speed,
            _ => 0.0,
        };
        if self.vel.x > 0.0 {
            self.facing_right = true;
        } else if self.vel.x < 0.0 {
            self.facing_right = false;
        }

        if input.jump && self.on_ground {
            self.vel.y = tuning.jump_strength;
            self.on_ground = false;
            self.is_jumping = true;
            sink.on_jump();
            return true;
        }
        false
    }

    /// Accumulate gravity while airborne, capped at terminal velocity
    pub fn apply_gravity(&mut self, step: f32, tuning: &Tuning) {
        if self.on_ground {
            return;
        }
        self.vel.y = (self.vel.y + tuning.gravity * step).min(tuning.terminal_velocity);
    }

    pub fn tick_timers(&mut self, dt: f32) {
        self.invulnerable_for = (self.invulnerable_for - dt).max(0.0);
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount.max(0)).min(self.max_health);
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Lose health unless still invulnerable from the last hit
    pub fn take_damage(&mut self, damage: i32, invulnerability: f32) -> HitOutcome {
        if self.invulnerable_for > 0.0 || self.is_dead() {
            return HitOutcome::Ignored;
        }
        self.health = (self.health - damage.max(0)).clamp(0, self.max_health);
        self.invulnerable_for = invulnerability;
        if self.health == 0 {
            HitOutcome::Destroyed
        } else {
            HitOutcome::Damaged {
                remaining: self.health,
            }
        }
    }
}

impl Collidable for KinematicBody {
    fn bounds(&self) -> Rect {
        self.rect()
    }

    fn is_active(&self) -> bool {
        !self.is_dead()
    }

    /// Hit that respects the current window but opens none; callers set
    /// `invulnerable_for` themselves
    fn on_hit(&mut self, damage: i32) -> HitOutcome {
        self.take_damage(damage, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::{GameEvent, NullSink};
    use proptest::prelude::*;

    fn grounded_body() -> KinematicBody {
        let mut body = KinematicBody::new(Vec2::new(100.0, 100.0));
        body.on_ground = true;
        body
    }

    #[test]
    fn test_walk_is_instant() {
        let tuning = Tuning::default();
        let mut body = grounded_body();
        body.apply_input(BodyInput { right: true, ..Default::default() }, &tuning, &mut NullSink);
        assert_eq!(body.vel.x, tuning.walk_speed);
        assert!(body.facing_right);
        assert!(body.is_walking());

        body.apply_input(BodyInput { left: true, ..Default::default() }, &tuning, &mut NullSink);
        assert_eq!(body.vel.x, -tuning.walk_speed);
        assert!(!body.facing_right);

        // Both held cancel out, facing is kept
        body.apply_input(BodyInput { left: true, right: true, jump: false }, &tuning, &mut NullSink);
        assert_eq!(body.vel.x, 0.0);
        assert!(!body.facing_right);
    }

    #[test]
    fn test_jump_from_ground() {
        let tuning = Tuning::default();
        let mut body = grounded_body();
        let mut events: Vec<GameEvent> = Vec::new();
        assert!(body.apply_input(BodyInput { jump: true, ..Default::default() }, &tuning, &mut events));
        assert_eq!(body.vel.y, tuning.jump_strength);
        assert!(!body.on_ground);
        assert!(body.is_jumping);
        assert_eq!(events, vec![GameEvent::Jump]);
    }

    #[test]
    fn test_gravity_only_when_airborne_and_capped() {
        let tuning = Tuning::default();
        let mut body = grounded_body();
        body.apply_gravity(1.0, &tuning);
        assert_eq!(body.vel.y, 0.0);

        body.on_ground = false;
        body.apply_gravity(1.0, &tuning);
        assert_eq!(body.vel.y, tuning.gravity);
        for _ in 0..200 {
            body.apply_gravity(1.0, &tuning);
        }
        assert_eq!(body.vel.y, tuning.terminal_velocity);
    }

    #[test]
    fn test_damage_respects_invulnerability() {
        let mut body = grounded_body();
        assert_eq!(body.take_damage(1, 1.0), HitOutcome::Damaged { remaining: 4 });
        assert_eq!(body.take_damage(1, 1.0), HitOutcome::Ignored);
        body.tick_timers(1.0);
        assert_eq!(body.take_damage(10, 1.0), HitOutcome::Destroyed);
        assert_eq!(body.health, 0);
        assert!(!body.is_active());
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let mut body = grounded_body();
        body.health = 2;
        body.heal(2);
        assert_eq!(body.health, 4);
        body.heal(10);
        assert_eq!(body.health, body.max_health);
    }

    #[test]
    fn test_hand_follows_facing() {
        let mut body = grounded_body();
        assert_eq!(body.hand_position().x, 100.0 + PLAYER_WIDTH);
        body.facing_right = false;
        assert_eq!(body.hand_position().x, 100.0);
    }

    proptest! {
        #[test]
        fn prop_jump_gated_while_airborne(
            vy in -20.0f32..20.0,
            left in any::<bool>(),
            right in any::<bool>(),
        ) {
            let tuning = Tuning::default();
            let mut body = KinematicBody::new(Vec2::new(0.0, 0.0));
            body.vel.y = vy;
            body.on_ground = false;
            let mut events: Vec<GameEvent> = Vec::new();
            let jumped = body.apply_input(BodyInput { left, right, jump: true }, &tuning, &mut events);
            prop_assert!(!jumped);
            prop_assert_eq!(body.vel.y, vy);
            prop_assert!(events.is_empty());
        }
    }
}
