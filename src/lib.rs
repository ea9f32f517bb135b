//! Ridge Runner - side-scrolling platformer simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (body physics, collisions, AI, camera, screens)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, audio playback and asset loading are external collaborators.
//! They read [`sim::RenderSnapshot`] and receive [`sim::GameEvent`]s.

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Frame rate that per-frame velocities are expressed against
    pub const TARGET_FPS: f32 = 60.0;
    /// Nominal frame delta at the target rate
    pub const FRAME_DT: f32 = 1.0 / TARGET_FPS;
    /// Largest dt a single tick will integrate (hitches are truncated, not replayed)
    pub const MAX_FRAME_DT: f32 = 1.0 / 20.0;

    /// Player body size in pixels
    pub const PLAYER_WIDTH: f32 = 32.0;
    pub const PLAYER_HEIGHT: f32 = 48.0;
    pub const PLAYER_MAX_HEALTH: i32 = 5;

    /// Default viewport (the window the camera frames)
    pub const VIEWPORT_WIDTH: f32 = 1024.0;
    pub const VIEWPORT_HEIGHT: f32 = 768.0;

    /// Stone and bolt rectangle sizes
    pub const STONE_SIZE: f32 = 8.0;
    pub const BOLT_WIDTH: f32 = 16.0;
    pub const BOLT_HEIGHT: f32 = 6.0;

    /// Safety bound on chained screen transitions resolved in a single frame
    pub const MAX_TRANSITIONS_PER_FRAME: usize = 4;
}

/// Clamp that tolerates an inverted range (world narrower than the viewport).
///
/// When `min > max` the value pins to `min` (`f32::clamp` would panic).
#[inline]
pub fn clamp_lenient(value: f32, min: f32, max: f32) -> f32 {
    if min > max {
        min
    } else {
        value.clamp(min, max)
    }
}

/// Scale factor that converts a per-frame quantity to the given dt
#[inline]
pub fn frame_step(dt: f32) -> f32 {
    dt.clamp(0.0, consts::MAX_FRAME_DT) * consts::TARGET_FPS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_lenient_inverted_range() {
        assert_eq!(clamp_lenient(50.0, 0.0, 100.0), 50.0);
        assert_eq!(clamp_lenient(-5.0, 0.0, 100.0), 0.0);
        assert_eq!(clamp_lenient(500.0, 10.0, -20.0), 10.0);
    }

    #[test]
    fn test_frame_step_is_one_at_target_rate() {
        assert!((frame_step(consts::FRAME_DT) - 1.0).abs() < 1e-5);
        // Hitches are truncated
        assert!((frame_step(1.0) - consts::MAX_FRAME_DT * consts::TARGET_FPS).abs() < 1e-5);
        assert_eq!(frame_step(-1.0), 0.0);
    }
}
