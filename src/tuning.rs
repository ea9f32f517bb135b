//! Data-driven game balance
//!
//! Every physics, combat, AI and camera constant lives here so a designer can
//! override them from JSON without recompiling. Missing fields fall back to
//! the defaults below.

use serde::{Deserialize, Serialize};

/// Tunable simulation constants
///
/// Body and enemy speeds are in pixels per frame at [`crate::consts::TARGET_FPS`];
/// projectile values are in pixels per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Body ===
    /// Horizontal walk speed (px/frame)
    pub walk_speed: f32,
    /// Initial vertical velocity of a jump (negative is up)
    pub jump_strength: f32,
    /// Downward acceleration while airborne (px/frame²)
    pub gravity: f32,
    /// Maximum fall speed (px/frame)
    pub terminal_velocity: f32,
    /// Seconds of contact-damage immunity after being hit
    pub invulnerability_secs: f32,

    // === Collision ===
    /// How far the body's bottom may sit from a platform top and still land
    pub landing_tolerance: f32,
    /// Minimum horizontal overlap needed to stand on a platform
    pub landing_margin: f32,
    /// Vertical overlap needed before a platform's side blocks walking
    pub side_margin: f32,

    // === Projectiles ===
    pub stone_speed: f32,
    /// Upward launch velocity of a thrown stone (negative is up)
    pub stone_lift: f32,
    pub stone_gravity: f32,
    pub stone_lifetime: f32,
    pub stone_damage: i32,
    pub bolt_speed: f32,
    pub bolt_lifetime: f32,
    pub bolt_damage: i32,
    pub throw_cooldown: f32,
    pub shoot_cooldown: f32,

    // === Enemies ===
    /// Patrol speed (px/frame)
    pub enemy_speed: f32,
    /// Seconds between timer-driven direction flips
    pub patrol_flip_period: f32,
    /// Patrol radius used when a spawn record omits one
    pub default_patrol_radius: f32,
    /// Seconds a defeated enemy stays in the collection before cleanup
    pub corpse_linger: f32,

    // === Camera ===
    pub horizontal_smoothing: f32,
    pub vertical_smoothing: f32,
    /// Vertical distance the target may drift before the camera follows
    pub vertical_deadzone: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,

    // === Interaction / inventory ===
    /// Extra reach around an NPC's rectangle that still counts as "near"
    pub talk_radius: f32,
    pub starting_stones: u32,
    /// Health restored by one herb
    pub herb_heal: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        use crate::consts::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};

        Self {
            // Body - arcade feel, instant horizontal response
            walk_speed: 4.0,
            jump_strength: -13.0,
            gravity: 0.6,
            terminal_velocity: 14.0,
            invulnerability_secs: 1.0,

            // Collision - the permissive landing model
            landing_tolerance: 10.0,
            landing_margin: 4.0,
            side_margin: 6.0,

            // Projectiles
            stone_speed: 300.0,
            stone_lift: -180.0,
            stone_gravity: 600.0,
            stone_lifetime: 2.0,
            stone_damage: 1,
            bolt_speed: 600.0,
            bolt_lifetime: 0.8,
            bolt_damage: 2,
            throw_cooldown: 0.35,
            shoot_cooldown: 0.5,

            // Enemies
            enemy_speed: 1.5,
            patrol_flip_period: 3.0,
            default_patrol_radius: 96.0,
            corpse_linger: 0.75,

            // Camera
            horizontal_smoothing: 0.1,
            vertical_smoothing: 0.08,
            vertical_deadzone: 48.0,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,

            // Interaction
            talk_radius: 48.0,
            starting_stones: 5,
            herb_heal: 2,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut tuning: Tuning = serde_json::from_str(json)?;
        tuning.sanitize();
        Ok(tuning)
    }

    /// Pull out-of-range values back into something the simulation can use
    pub fn sanitize(&mut self) {
        let smoothing_x = self.horizontal_smoothing.clamp(0.0, 1.0);
        let smoothing_y = self.vertical_smoothing.clamp(0.0, 1.0);
        if smoothing_x != self.horizontal_smoothing || smoothing_y != self.vertical_smoothing {
            log::warn!(
                "Camera smoothing out of range ({}, {}), clamped to [0, 1]",
                self.horizontal_smoothing,
                self.vertical_smoothing
            );
        }
        self.horizontal_smoothing = smoothing_x;
        self.vertical_smoothing = smoothing_y;

        if self.jump_strength > 0.0 {
            log::warn!("jump_strength must point up, flipping {}", self.jump_strength);
            self.jump_strength = -self.jump_strength;
        }
        if self.stone_lift > 0.0 {
            self.stone_lift = -self.stone_lift;
        }

        self.walk_speed = self.walk_speed.max(0.0);
        self.gravity = self.gravity.max(0.0);
        self.terminal_velocity = self.terminal_velocity.max(0.0);
        self.landing_tolerance = self.landing_tolerance.max(0.0);
        self.landing_margin = self.landing_margin.max(0.0);
        self.side_margin = self.side_margin.max(0.0);
        self.stone_gravity = self.stone_gravity.max(0.0);
        self.patrol_flip_period = self.patrol_flip_period.max(0.0);
        self.vertical_deadzone = self.vertical_deadzone.max(0.0);
        self.viewport_width = self.viewport_width.max(1.0);
        self.viewport_height = self.viewport_height.max(1.0);
        self.herb_heal = self.herb_heal.max(0);
    }
}
