//! Shared simulation core
//!
//! Both games are built from these pieces. Everything here is pure and
//! deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod events;
pub mod mode;
pub mod particles;
pub mod projectile;
pub mod schedule;
pub mod timer;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use collision::{Bounds, circles_overlap, point_segment_distance, segment_hits_circle};
pub use events::{GameEvent, Outcome};
pub use mode::{ModeCycler, ModeSlot, ModeState, ModeTransition};
pub use particles::{MAX_PARTICLES, Particle, Particles};
pub use projectile::{Beam, Owner, Projectile, ShotStyle, StepContext, StepOutcome};
pub use schedule::Schedule;
pub use timer::{Cooldown, HealAbility, Health};

/// Held movement keys for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveKeys {
    /// Unit direction (diagonals normalized), zero when idle or cancelled out
    pub fn direction(&self) -> Vec2 {
        let x = self.right as i32 - self.left as i32;
        let y = self.down as i32 - self.up as i32;
        Vec2::new(x as f32, y as f32).normalize_or_zero()
    }

    /// Keys that move from `from` toward `to`, with a dead zone of `slack`
    pub fn toward(from: Vec2, to: Vec2, slack: f32) -> Self {
        let d = to - from;
        Self {
            up: d.y < -slack,
            down: d.y > slack,
            left: d.x < -slack,
            right: d.x > slack,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_keys_direction() {
        let keys = MoveKeys {
            up: true,
            right: true,
            ..Default::default()
        };
        let d = keys.direction();
        assert!((d.length() - 1.0).abs() < 1e-6);
        assert!(d.x > 0.0 && d.y < 0.0);

        let cancelled = MoveKeys {
            left: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(cancelled.direction(), Vec2::ZERO);
    }

    #[test]
    fn test_move_keys_toward() {
        let keys = MoveKeys::toward(Vec2::ZERO, Vec2::new(10.0, -2.0), 4.0);
        assert!(keys.right && !keys.left && !keys.up && !keys.down);
    }
}
