//! Single-arena boss encounter
//!
//! The player moves with WASD-style keys, aims with a pointer and fires
//! whatever weapon mode is currently cycled in. The boss bounces around the
//! upper half of the arena and every attack cycle mixes several of its
//! 21 patterns.

pub mod patterns;
pub mod state;
pub mod tick;
pub mod weapons;

pub use patterns::{AttackPattern, BossAction};
pub use state::{Boss, BossFight, BossInput, BossView, Dash, Player};
pub use weapons::{Volley, WeaponMode};
