//! Astro Clash - an asteroids arena with cpu pilots and four game modes
//!
//! Core modules:
//! - `sim`: Simulation (polygon physics, entities, cpu controller, mode rules)
//! - `render`: Draw lists of world-space polygons and overlay text
//! - `settings`: Session configuration
//! - `audio`: Fire-and-forget sound cues

pub mod audio;
pub mod render;
pub mod settings;
pub mod sim;

pub use settings::{ConfigError, Difficulty, Mode, SessionConfig};

use glam::Vec2;

/// Game tuning constants
///
/// Speeds and turn rates are per tick; durations are seconds and are
/// consumed by the elapsed time handed to each tick.
pub mod consts {
    /// Fixed timestep used by the headless runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Ship defaults
    pub const SHIP_SIZE: f32 = 15.0;
    pub const SHIP_DRAG: f32 = 0.995;
    pub const HUMAN_THRUST: f32 = 0.20;
    pub const HUMAN_TURN_RATE: f32 = 0.05;
    pub const BULLET_LIMIT: usize = 4;
    /// Spawn protection window
    pub const INVINCIBILITY_SECS: f32 = 5.0;
    /// Below this much protection left the cpu treats itself as exposed
    pub const INVINCIBILITY_EXPIRING_SECS: f32 = 0.5;

    /// Cpu pilot
    pub const CPU_THRUST: f32 = 0.05;
    pub const CPU_TURN_RATE: f32 = 0.25;
    pub const CPU_ESCAPE_TURN_RATE: f32 = 0.35;
    /// Fire radius = size * FIRE_RANGE_FACTOR
    pub const FIRE_RANGE_FACTOR: f32 = 10.0;
    /// Death radius = size * DEATH_RANGE_FACTOR
    pub const DEATH_RANGE_FACTOR: f32 = FIRE_RANGE_FACTOR - 4.0;

    /// Meteor defaults
    pub const METEOR_START_SIZE: f32 = 30.0;
    pub const METEOR_START_HITS: u32 = 3;
    pub const METEOR_MAX_SPEED: f32 = 1.5;
    pub const METEOR_SPIN: f32 = 0.1;
    pub const METEOR_SPLIT_COUNT: usize = 4;

    /// Bullet defaults
    pub const BULLET_SPEED: f32 = 6.0;
    pub const BULLET_SIZE: f32 = 1.0;
    pub const BULLET_LIFETIME_SECS: f32 = 1.5;

    /// Race mode clock
    pub const RACE_DURATION_SECS: f32 = 120.0;
    /// Distance from the side edges where versus ships respawn
    pub const VERSUS_EDGE_MARGIN: f32 = 60.0;
}

/// Normalize an angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Unit vector for a facing angle
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Rotate a local-space point by `angle` and translate it by `origin`
#[inline]
pub fn to_world(local: Vec2, angle: f32, origin: Vec2) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    origin + Vec2::new(local.x * cos - local.y * sin, local.x * sin + local.y * cos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::{PI, TAU};

    #[test]
    fn test_normalize_angle_wraps_both_directions() {
        assert!((normalize_angle(TAU + 0.5) - 0.5).abs() < 1e-5);
        assert!((normalize_angle(-0.5) - (TAU - 0.5)).abs() < 1e-5);
        assert_eq!(normalize_angle(0.0), 0.0);
        assert_eq!(normalize_angle(TAU), 0.0);
    }

    #[test]
    fn test_to_world_quarter_turn() {
        let p = to_world(Vec2::new(10.0, 0.0), PI / 2.0, Vec2::new(100.0, 100.0));
        assert!((p.x - 100.0).abs() < 1e-4);
        assert!((p.y - 110.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn normalized_angle_is_in_range(theta in -1000.0f32..1000.0) {
            let a = normalize_angle(theta);
            prop_assert!(a >= 0.0);
            prop_assert!(a < TAU);
        }
    }
}
