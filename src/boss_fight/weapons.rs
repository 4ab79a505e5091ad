//! Player weapon modes
//!
//! The player never picks a weapon. Modes cycle on their own (see
//! [`ModeCycler`]); each has its own volley shape and shot cooldown.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::projectile::{Explosive, Orbit};
use crate::sim::{ModeCycler, Owner, Projectile, ShotStyle};
use crate::tuning::BossTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponMode {
    MultiShot,
    Minigun,
    RayGun,
    Shotgun,
    Explosive,
    Piercing,
    LaserSniper,
    Ricochet,
    Orbital,
}

impl WeaponMode {
    pub const ALL: [WeaponMode; 9] = [
        WeaponMode::MultiShot,
        WeaponMode::Minigun,
        WeaponMode::RayGun,
        WeaponMode::Shotgun,
        WeaponMode::Explosive,
        WeaponMode::Piercing,
        WeaponMode::LaserSniper,
        WeaponMode::Ricochet,
        WeaponMode::Orbital,
    ];

    pub fn name(self) -> &'static str {
        match self {
            WeaponMode::MultiShot => "Multi Shot",
            WeaponMode::Minigun => "Minigun",
            WeaponMode::RayGun => "Ray Gun",
            WeaponMode::Shotgun => "Shotgun",
            WeaponMode::Explosive => "Explosive",
            WeaponMode::Piercing => "Piercing",
            WeaponMode::LaserSniper => "Laser Sniper",
            WeaponMode::Ricochet => "Ricochet",
            WeaponMode::Orbital => "Orbital",
        }
    }

    /// `(duration, cooldown)` in ticks
    pub fn timing(self) -> (f32, f32) {
        match self {
            WeaponMode::MultiShot => (180.0, 200.0),
            WeaponMode::Minigun => (150.0, 250.0),
            WeaponMode::RayGun => (120.0, 220.0),
            WeaponMode::Shotgun => (200.0, 180.0),
            WeaponMode::Explosive => (150.0, 240.0),
            WeaponMode::Piercing => (180.0, 200.0),
            WeaponMode::LaserSniper => (100.0, 280.0),
            WeaponMode::Ricochet => (160.0, 230.0),
            WeaponMode::Orbital => (200.0, 210.0),
        }
    }

    /// Holding the fire button keeps shooting
    pub fn repeats_while_held(self) -> bool {
        matches!(self, WeaponMode::Minigun | WeaponMode::RayGun)
    }

    pub fn color(self) -> u32 {
        match self {
            WeaponMode::MultiShot => 0xff6600,
            WeaponMode::Minigun => 0xffff00,
            WeaponMode::RayGun => 0x00ffff,
            WeaponMode::Shotgun => 0xff3300,
            WeaponMode::Explosive => 0xff9900,
            WeaponMode::Piercing => 0x00ff88,
            WeaponMode::LaserSniper => 0xff00ff,
            WeaponMode::Ricochet => 0x00ff00,
            WeaponMode::Orbital => 0x8800ff,
        }
    }
}

/// Fresh cycler with every mode ready
pub fn weapon_cycler() -> ModeCycler<WeaponMode> {
    ModeCycler::new(WeaponMode::ALL.iter().map(|&m| {
        let (duration, cooldown) = m.timing();
        (m, duration, cooldown)
    }))
}

/// Shots from one trigger pull plus the shot cooldown it costs
#[derive(Debug, Clone)]
pub struct Volley {
    pub shots: Vec<Projectile>,
    pub cooldown: f32,
    /// Muzzle flash color and particle count
    pub flash: (u32, usize),
}

/// Build the volley for `mode` (or the default shot) fired from `origin`
/// along `aim`
pub fn fire(mode: Option<WeaponMode>, origin: Vec2, aim: f32, tuning: &BossTuning) -> Volley {
    let speed = tuning.shot_speed;
    let shot = |angle: f32, speed: f32, radius: f32, damage: f32| {
        Projectile::aimed(Owner::Player, origin, angle, speed, radius, damage)
    };

    let Some(mode) = mode else {
        return Volley {
            shots: vec![shot(aim, speed, 8.0, 15.0)],
            cooldown: 15.0,
            flash: (0xffff00, 5),
        };
    };

    let (shots, cooldown, particles) = match mode {
        WeaponMode::MultiShot => {
            let shots = (-1..=1)
                .map(|i| shot(aim + i as f32 * 0.2, speed, 6.0, 10.0).style(ShotStyle::Multi))
                .collect();
            (shots, 20.0, 8)
        }
        WeaponMode::Minigun => (
            vec![shot(aim, speed * 1.5, 5.0, 5.0).style(ShotStyle::Minigun)],
            3.0,
            3,
        ),
        // Damage comes from the continuous ray, not a projectile
        WeaponMode::RayGun => (Vec::new(), 5.0, 0),
        WeaponMode::Shotgun => {
            let shots = (-3..=3)
                .map(|i| shot(aim + i as f32 * 0.15, speed * 0.8, 5.0, 8.0).style(ShotStyle::Shotgun))
                .collect();
            (shots, 30.0, 15)
        }
        WeaponMode::Explosive => {
            let burst = Explosive::cosmetic();
            (
                vec![shot(aim, speed, 7.0, 20.0).style(ShotStyle::Explosive).explosive(burst)],
                25.0,
                10,
            )
        }
        WeaponMode::Piercing => (
            vec![shot(aim, speed * 1.3, 6.0, 12.0)
                .style(ShotStyle::Piercing)
                .piercing(tuning.pierce_limit)],
            18.0,
            8,
        ),
        WeaponMode::LaserSniper => (
            vec![shot(aim, speed * 2.5, 4.0, 40.0).style(ShotStyle::Sniper)],
            45.0,
            12,
        ),
        WeaponMode::Ricochet => (
            vec![shot(aim, speed, 6.0, 12.0)
                .style(ShotStyle::Ricochet)
                .ricochet(tuning.ricochet_limit)],
            20.0,
            8,
        ),
        WeaponMode::Orbital => {
            let count = 4;
            let shots = (0..count)
                .map(|i| {
                    let angle = std::f32::consts::TAU / count as f32 * i as f32;
                    shot(angle, 4.0, 6.0, 8.0).style(ShotStyle::Orbital).orbiting(Orbit {
                        angle,
                        distance: 0.0,
                        angular_speed: 0.1,
                        expansion: 2.0,
                        max_distance: tuning.orbit_max_distance,
                    })
                })
                .collect();
            (shots, 40.0, 15)
        }
    };

    Volley {
        shots,
        cooldown,
        flash: (mode.color(), particles),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volley(mode: Option<WeaponMode>) -> Volley {
        fire(mode, Vec2::new(100.0, 100.0), 0.0, &BossTuning::default())
    }

    #[test]
    fn test_default_shot() {
        let v = volley(None);
        assert_eq!(v.shots.len(), 1);
        assert_eq!(v.shots[0].radius, 8.0);
        assert_eq!(v.shots[0].damage, 15.0);
        assert_eq!(v.cooldown, 15.0);
        assert!((v.shots[0].vel - Vec2::new(10.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_volley_shapes() {
        assert_eq!(volley(Some(WeaponMode::MultiShot)).shots.len(), 3);
        assert_eq!(volley(Some(WeaponMode::Shotgun)).shots.len(), 7);
        assert_eq!(volley(Some(WeaponMode::Orbital)).shots.len(), 4);
        assert!(volley(Some(WeaponMode::RayGun)).shots.is_empty());
        assert_eq!(volley(Some(WeaponMode::RayGun)).cooldown, 5.0);
    }

    #[test]
    fn test_mode_speeds() {
        let sniper = volley(Some(WeaponMode::LaserSniper));
        assert!((sniper.shots[0].vel.length() - 25.0).abs() < 1e-4);
        assert_eq!(sniper.shots[0].damage, 40.0);

        let minigun = volley(Some(WeaponMode::Minigun));
        assert!((minigun.shots[0].vel.length() - 15.0).abs() < 1e-4);
        assert_eq!(minigun.cooldown, 3.0);
    }

    #[test]
    fn test_behaviors_attached() {
        let piercing = volley(Some(WeaponMode::Piercing));
        assert_eq!(piercing.shots[0].behaviors.pierce.map(|p| p.limit), Some(3));
        let ricochet = volley(Some(WeaponMode::Ricochet));
        assert_eq!(ricochet.shots[0].behaviors.ricochet.map(|r| r.limit), Some(3));
        let orbital = volley(Some(WeaponMode::Orbital));
        assert!(orbital.shots.iter().all(|s| s.behaviors.orbit.is_some()));
    }

    #[test]
    fn test_only_minigun_and_ray_gun_repeat() {
        let repeating: Vec<_> = WeaponMode::ALL
            .iter()
            .filter(|m| m.repeats_while_held())
            .collect();
        assert_eq!(repeating, vec![&WeaponMode::Minigun, &WeaponMode::RayGun]);
    }

    #[test]
    fn test_cycler_has_every_mode() {
        let cycler = weapon_cycler();
        assert_eq!(cycler.slots().len(), 9);
        assert_eq!(cycler.slot(WeaponMode::LaserSniper).unwrap().duration.max, 100.0);
        assert_eq!(cycler.slot(WeaponMode::LaserSniper).unwrap().cooldown.max, 280.0);
    }
}
