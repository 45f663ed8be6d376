//! Fruit Mania - a swipe-to-slice arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, swipes, modes, scoring)
//! - `renderer`: Draw list handed to whatever draws the frame
//! - `audio`: Cue ids and the sink the host plays them through
//! - `platform`: Input events and per-tick coalescing
//! - `persistence`: Append-only score store (SQLite or in-memory)
//! - `settings` / `tuning`: Player preferences and data-driven game balance

pub mod audio;
pub mod autopilot;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::ScoreTable;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Target frame rate; one simulation tick per frame
    pub const FPS: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / FPS as f32;
    /// Maximum ticks per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Play area
    pub const WIDTH: f32 = 1280.0;
    pub const HEIGHT: f32 = 720.0;

    /// Gravity increment added to vertical velocity every tick
    pub const GRAVITY: f32 = 10.0;
    /// Gravity while the freeze power-up slows the world down
    pub const SLOW_GRAVITY: f32 = 2.0;

    /// Blade hit box (pixels, square)
    pub const BLADE_SIZE: f32 = 10.0;
    /// Max curvature (pixels) for three cuts to count as one straight slash
    pub const COMBO_CURVATURE_LIMIT: f32 = 125.0;
    /// Highest combo cue tier
    pub const MAX_COMBO_TIER: u32 = 8;
    /// Longest pointer track kept per swipe session
    pub const MAX_TRACK_POINTS: usize = 128;

    /// Lives in Classic mode
    pub const CLASSIC_LIVES: u32 = 3;
    /// Arcade round length (seconds)
    pub const ARCADE_DURATION: f32 = 60.0;

    /// Flash overlay after a hazard explodes (alpha, decays per tick)
    pub const FLASH_START: u8 = 240;
    pub const FLASH_DECAY: u8 = 2;
    /// Fade step per tick for splashes and score popups
    pub const EFFECT_FADE: i32 = 2;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    angle.rem_euclid(360.0)
}

/// Rotate a vector by an angle in degrees (counter-clockwise on screen)
#[inline]
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    // Screen y grows downward, so a visually counter-clockwise turn is a
    // clockwise turn in math coordinates.
    let (s, c) = (-degrees.to_radians()).sin_cos();
    Vec2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

/// Axis-aligned extent of a `size` box rotated by `degrees`
#[inline]
pub fn rotated_extent(size: Vec2, degrees: f32) -> Vec2 {
    let (s, c) = degrees.to_radians().sin_cos();
    let (s, c) = (s.abs(), c.abs());
    Vec2::new(size.x * c + size.y * s, size.x * s + size.y * c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(370.0), 10.0);
        assert_eq!(normalize_degrees(-10.0), 350.0);
    }

    #[test]
    fn test_rotated_extent_quarter_turn_swaps_axes() {
        let e = rotated_extent(Vec2::new(100.0, 50.0), 90.0);
        assert!((e.x - 50.0).abs() < 1e-3);
        assert!((e.y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_rotate_degrees_round_trip() {
        let v = Vec2::new(3.0, -4.0);
        let back = rotate_degrees(rotate_degrees(v, 33.0), -33.0);
        assert!((back - v).length() < 1e-4);
    }
}
