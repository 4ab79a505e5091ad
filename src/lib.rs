//! Arcade Sim - deterministic cores for two arena arcade games
//!
//! Core modules:
//! - `sim`: Shared simulation pieces (collision, timers, projectiles, scheduling)
//! - `boss_fight`: Single-arena boss encounter with cycling player weapon modes
//! - `shooter`: Wave-based survival shooter with stacking boosts
//! - `tuning`: Data-driven game balance
//!
//! Rendering, input devices and frame scheduling live outside this crate.
//! Front-ends feed one input snapshot per tick and read the state back
//! through the `view()` accessors.

pub mod boss_fight;
pub mod error;
pub mod shooter;
pub mod sim;
pub mod tuning;

pub use boss_fight::{BossFight, BossInput};
pub use error::{ActivationError, TuningError};
pub use shooter::{ShooterGame, ShooterInput};
pub use tuning::{BossTuning, ShooterTuning, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation tick rate (one tick per rendered frame at 60 Hz)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
}

/// Convert a millisecond delay to whole simulation ticks (rounded)
#[inline]
pub fn ms_to_ticks(ms: u32) -> u64 {
    ((ms as u64) * consts::TICK_RATE as u64 + 500) / 1000
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

/// Heading (radians) of the vector pointing from `from` to `to`
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(0), 0);
        assert_eq!(ms_to_ticks(200), 12);
        assert_eq!(ms_to_ticks(50), 3);
        assert_eq!(ms_to_ticks(1000), 60);
    }

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(3.0 * PI) - (-PI)).abs() < 1e-5);
        assert!((normalize_angle(-PI / 2.0) + PI / 2.0).abs() < 1e-6);
        assert!(normalize_angle(PI) < PI);
    }

    #[test]
    fn test_angle_to() {
        let a = angle_to(Vec2::ZERO, Vec2::new(0.0, 10.0));
        assert!((a - PI / 2.0).abs() < 1e-6);
        let b = angle_to(Vec2::new(5.0, 5.0), Vec2::new(0.0, 5.0));
        assert!((b.abs() - PI).abs() < 1e-6);
    }
}
