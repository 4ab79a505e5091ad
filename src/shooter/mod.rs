//! Endless wave shooter
//!
//! The ship moves freely and fires on its own at the nearest enemy. Waves
//! grow with the wave number, every fifth brings a boss, and kills drop
//! boosts that stack on timers.

pub mod boosts;
pub mod enemy;
pub mod state;
pub mod tick;
pub mod wave;

pub use boosts::{BoostKind, Boosts};
pub use enemy::{Attack, BossKind, Enemy, EnemyKind, EnemyStats};
pub use state::{Pickup, PickupKind, ShooterGame, ShooterInput, ShooterView, Ship};
pub use wave::{WaveDirector, WaveSignal};
