//! Smoothed follow camera
//!
//! Horizontal: exponential approach toward the player-centred target.
//! Vertical: same approach, but only once the target drifts past a deadzone so
//! small hops don't bob the view. Both axes are clamped to the world after
//! smoothing.
//!
//! Each frame smooths from where the camera stood when the frame began, so
//! calling [`Camera::update`] again in the same frame with the same target
//! gives the same answer.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::clamp_lenient;
use crate::tuning::Tuning;

/// World-space limits for the camera's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl CameraBounds {
    /// Bounds that keep a `viewport`-sized window inside the world
    pub fn for_world(world_width: f32, world_height: f32, viewport: Vec2) -> Self {
        Self {
            min_x: 0.0,
            max_x: (world_width - viewport.x).max(0.0),
            min_y: 0.0,
            max_y: (world_height - viewport.y).max(0.0),
        }
    }

    pub fn clamp(&self, pos: Vec2) -> Vec2 {
        Vec2::new(
            clamp_lenient(pos.x, self.min_x, self.max_x),
            clamp_lenient(pos.y, self.min_y, self.max_y),
        )
    }
}

/// Camera state (top-left of the visible window, world space)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub pos: Vec2,
    pub viewport: Vec2,
    pub horizontal_smoothing: f32,
    pub vertical_smoothing: f32,
    pub vertical_deadzone: f32,
    pub bounds: CameraBounds,
    /// Position at the start of `frame`
    origin: Vec2,
    frame: Option<u64>,
}

impl Camera {
    pub fn new(tuning: &Tuning, bounds: CameraBounds) -> Self {
        Self {
            pos: Vec2::new(bounds.min_x, bounds.min_y),
            viewport: Vec2::new(tuning.viewport_width, tuning.viewport_height),
            horizontal_smoothing: tuning.horizontal_smoothing,
            vertical_smoothing: tuning.vertical_smoothing,
            vertical_deadzone: tuning.vertical_deadzone,
            bounds,
            origin: Vec2::new(bounds.min_x, bounds.min_y),
            frame: None,
        }
    }

    /// Top-left that would centre `focus` in the viewport
    pub fn target_for(&self, focus: Vec2) -> Vec2 {
        focus - self.viewport / 2.0
    }

    /// Jump straight to `focus` (level start / restart)
    pub fn snap_to(&mut self, focus: Vec2) {
        self.pos = self.bounds.clamp(self.target_for(focus));
        self.origin = self.pos;
        self.frame = None;
    }

    /// Smooth toward `focus` for simulation frame `frame`
    pub fn update(&mut self, focus: Vec2, frame: u64) {
        if self.frame != Some(frame) {
            self.origin = self.pos;
            self.frame = Some(frame);
        }

        let target = self.target_for(focus);
        let mut next = self.origin;
        next.x += (target.x - next.x) * self.horizontal_smoothing;
        if (target.y - next.y).abs() > self.vertical_deadzone {
            next.y += (target.y - next.y) * self.vertical_smoothing;
        }
        self.pos = self.bounds.clamp(next);
    }

    /// Offset a renderer subtracts from world coordinates
    pub fn offset(&self) -> Vec2 {
        self.pos
    }
}
