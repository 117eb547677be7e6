//! Bouncy Fellas - two sprites, one pointer, a little impulse physics
//!
//! Core modules:
//! - `sim`: Physics core (bodies, collision, per-frame step)
//! - `tuning`: Data-driven gameplay constants
//! - `renderer`: Sprite handles and Canvas 2D drawing

pub mod renderer;
pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec2;

/// Gameplay constants (defaults for [`Tuning`])
pub mod consts {
    /// Host frame interval that `dt = 1.0` corresponds to (ms, 60 Hz)
    pub const TARGET_FRAME_MS: f64 = 1000.0 / 60.0;
    /// Largest frame-relative delta the host will pass on (tab switches etc.)
    pub const MAX_FRAME_DT: f32 = 4.0;

    /// Rendered sprite size (pixels)
    pub const SPRITE_SIZE: f32 = 100.0;
    /// Collision circle radius, a bit inside the artwork
    pub const SPRITE_COLLISION_RADIUS: f32 = 46.0;

    /// Pointer-attached body mass
    pub const HERO_MASS: f32 = 1.0;
    /// Free body mass
    pub const FELLA_MASS: f32 = 3.0;

    /// Seek speed toward the pointer (fraction of distance per frame)
    pub const MOVEMENT_SPEED: f32 = 0.4;
    /// Collision impulse power (gameplay feel, not physics)
    pub const IMPULSE_POWER: f32 = 4.6;
    /// Per-frame velocity decay
    pub const DAMPING: f32 = 0.99;
    /// Fraction of the push an attached body receives
    pub const ATTACHED_RESPONSE: f32 = 0.1;

    /// Idle wander speed before the first contact
    pub const WANDER_SPEED: f32 = 2.7;
    /// Wander heading range (degrees, inclusive)
    pub const WANDER_MIN_DEG: u32 = 10;
    pub const WANDER_MAX_DEG: u32 = 350;

    /// Velocity assigned when a body touches a wall with a zero component
    pub const WALL_KICK_X: f32 = -1.0;
    pub const WALL_KICK_Y: f32 = -1.2;

    /// Consecutive contact count after which a body is considered stuck
    pub const STUCK_THRESHOLD: u32 = 30;
    /// Velocity multiplier applied to free bodies while stuck
    pub const STUCK_BOOST: f32 = 15.0;

    /// Secondary clicks needed to free the pointer
    pub const RELEASE_CLICKS: u8 = 2;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Convert host elapsed milliseconds to a frame-relative delta
///
/// `1.0` is one 60 Hz frame. Non-positive or non-finite input (first frame,
/// clock hiccups) yields `1.0`; long stalls are capped at `MAX_FRAME_DT`.
pub fn frame_delta(elapsed_ms: f64) -> f32 {
    use consts::{MAX_FRAME_DT, TARGET_FRAME_MS};
    if !(elapsed_ms.is_finite() && elapsed_ms > 0.0) {
        return 1.0;
    }
    ((elapsed_ms / TARGET_FRAME_MS) as f32).min(MAX_FRAME_DT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(2.5 * PI) - PI / 2.0).abs() < 1e-5);
        assert!((normalize_angle(-1.5 * PI) - PI / 2.0).abs() < 1e-5);
        assert!((normalize_angle(-PI / 2.0) - (-PI / 2.0)).abs() < 1e-6);
        assert!((normalize_angle(2.0 * PI)).abs() < 1e-5);
    }

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(2.0, PI / 2.0);
        assert!(p.x.abs() < 1e-5);
        assert!((p.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_frame_delta() {
        assert!((frame_delta(1000.0 / 60.0) - 1.0).abs() < 1e-5);
        assert!((frame_delta(1000.0 / 30.0) - 2.0).abs() < 1e-5);
        assert_eq!(frame_delta(0.0), 1.0);
        assert_eq!(frame_delta(f64::NAN), 1.0);
        assert_eq!(frame_delta(10_000.0), consts::MAX_FRAME_DT);
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0)), 5.0);
    }
}
