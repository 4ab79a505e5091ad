//! Enemy kinds, stats and firing behavior

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boosts::BoostKind;
use crate::angle_to;
use crate::polar_to_cartesian;
use crate::sim::projectile::Split;
use crate::sim::{Health, Owner, Projectile, ShotStyle};
use crate::tuning::ShooterTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossKind {
    /// Paired growing volleys, then a rest
    Rapid,
    /// Cycles through ten shot patterns
    Balanced,
    /// Never shoots, summons minions
    Summoner,
}

impl BossKind {
    pub const ALL: [BossKind; 3] = [BossKind::Rapid, BossKind::Balanced, BossKind::Summoner];

    pub fn name(self) -> &'static str {
        match self {
            BossKind::Rapid => "rapid",
            BossKind::Balanced => "balanced",
            BossKind::Summoner => "summoner",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Wanderer,
    Charger,
    Shooter,
    Sniper,
    Tank,
    Bloater,
    Gunner,
    Kamikaze,
    Shield,
    Boss(BossKind),
}

/// Base stats before wave scaling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub radius: f32,
    pub hp: f32,
    pub speed: f32,
}

impl EnemyKind {
    /// Kinds a wave draws its regular enemies from
    pub const REGULAR: [EnemyKind; 9] = [
        EnemyKind::Charger,
        EnemyKind::Shooter,
        EnemyKind::Tank,
        EnemyKind::Bloater,
        EnemyKind::Gunner,
        EnemyKind::Wanderer,
        EnemyKind::Sniper,
        EnemyKind::Kamikaze,
        EnemyKind::Shield,
    ];

    /// Kinds a summoner boss calls in
    pub const MINIONS: [EnemyKind; 5] = [
        EnemyKind::Charger,
        EnemyKind::Shooter,
        EnemyKind::Tank,
        EnemyKind::Bloater,
        EnemyKind::Gunner,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Wanderer => "wanderer",
            EnemyKind::Charger => "charger",
            EnemyKind::Shooter => "shooter",
            EnemyKind::Sniper => "sniper",
            EnemyKind::Tank => "tank",
            EnemyKind::Bloater => "bloater",
            EnemyKind::Gunner => "gunner",
            EnemyKind::Kamikaze => "kamikaze",
            EnemyKind::Shield => "shield",
            EnemyKind::Boss(_) => "boss",
        }
    }

    pub fn is_boss(self) -> bool {
        matches!(self, EnemyKind::Boss(_))
    }

    pub fn stats(self) -> EnemyStats {
        let (radius, hp, speed) = match self {
            EnemyKind::Wanderer => (14.0, 1.0, 70.0),
            EnemyKind::Charger => (12.0, 1.0, 180.0),
            EnemyKind::Shooter => (18.0, 2.0, 30.0),
            EnemyKind::Sniper => (12.0, 1.0, 18.0),
            EnemyKind::Tank => (22.0, 4.0, 22.0),
            EnemyKind::Bloater => (14.0, 2.0, 28.0),
            EnemyKind::Gunner => (10.0, 1.0, 36.0),
            EnemyKind::Kamikaze => (10.0, 1.0, 240.0),
            EnemyKind::Shield => (20.0, 3.0, 24.0),
            EnemyKind::Boss(_) => (28.0, 12.0, 20.0),
        };
        EnemyStats { radius, hp, speed }
    }

    /// Delay before the first shot
    pub fn first_shot_delay(self, rng: &mut Pcg32) -> f32 {
        match self {
            EnemyKind::Wanderer => 1.0 + rng.random::<f32>() * 1.6,
            EnemyKind::Charger | EnemyKind::Boss(_) => 0.6,
            EnemyKind::Shooter => 0.8 + rng.random::<f32>() * 1.4,
            EnemyKind::Sniper => 0.8 + rng.random::<f32>() * 1.6,
            EnemyKind::Tank => 1.6 + rng.random::<f32>() * 1.4,
            EnemyKind::Bloater | EnemyKind::Shield => 1.4 + rng.random::<f32>() * 1.2,
            EnemyKind::Gunner => 0.18 + rng.random::<f32>() * 0.06,
            EnemyKind::Kamikaze => f32::INFINITY,
        }
    }

    /// Kinds that fire every time their timer runs out; the rest only
    /// occasionally
    pub fn always_fires(self) -> bool {
        matches!(
            self,
            EnemyKind::Shooter
                | EnemyKind::Tank
                | EnemyKind::Bloater
                | EnemyKind::Gunner
                | EnemyKind::Boss(_)
        )
    }

    /// Boost dropped on a kill; `None` drops a heal instead
    pub fn drop_boost(self) -> Option<BoostKind> {
        match self {
            EnemyKind::Tank => Some(BoostKind::MultiShot),
            EnemyKind::Gunner => Some(BoostKind::FireRate),
            EnemyKind::Shooter => Some(BoostKind::BigShot),
            EnemyKind::Bloater => Some(BoostKind::Grow),
            EnemyKind::Wanderer => Some(BoostKind::Split),
            EnemyKind::Sniper => Some(BoostKind::Pierce),
            EnemyKind::Kamikaze => Some(BoostKind::Explosive),
            EnemyKind::Shield => Some(BoostKind::Shield),
            EnemyKind::Charger | EnemyKind::Boss(_) => None,
        }
    }

    pub fn color(self) -> u32 {
        match self {
            EnemyKind::Wanderer => 0xff7b7b,
            EnemyKind::Charger => 0xffb86b,
            EnemyKind::Shooter => 0xffd56b,
            EnemyKind::Sniper => 0xb0ff8a,
            EnemyKind::Tank => 0xc07bff,
            EnemyKind::Bloater => 0xff8fb3,
            EnemyKind::Gunner => 0x8ad6ff,
            EnemyKind::Kamikaze => 0xff4444,
            EnemyKind::Shield => 0x7bbcff,
            EnemyKind::Boss(_) => 0xffaa00,
        }
    }
}

/// Per-boss firing state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BossState {
    pub volleys: u32,
    pub resting: bool,
    pub pattern: u32,
}

/// What an enemy did when its shot timer ran out
#[derive(Debug, Clone, PartialEq)]
pub enum Attack {
    Hold,
    Shots(Vec<Projectile>),
    Summon { kind: EnemyKind, at: Vec2 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub health: Health,
    pub shoot_timer: f32,
    pub heal_timer: f32,
    /// Wave this enemy counts toward for the cleared check
    pub wave: u32,
    pub boss: BossState,
}

impl Enemy {
    /// Fresh enemy with its hp scaled by `hp_scale` (ceil, at least 1)
    pub fn new(kind: EnemyKind, pos: Vec2, hp_scale: f32, wave: u32, rng: &mut Pcg32) -> Self {
        let stats = kind.stats();
        let hp = (stats.hp * hp_scale).ceil().max(1.0);
        Self {
            id: 0,
            kind,
            pos,
            vel: Vec2::ZERO,
            radius: stats.radius,
            speed: stats.speed,
            health: Health::new(hp),
            shoot_timer: kind.first_shot_delay(rng),
            heal_timer: 0.0,
            wave,
            boss: BossState::default(),
        }
    }

    /// Steer straight at `target` and move
    pub fn chase(&mut self, target: Vec2, dt: f32) {
        self.vel = polar_to_cartesian(self.speed, angle_to(self.pos, target));
        self.pos += self.vel * dt;
    }

    /// Boss self-repair while hurt. Returns true when it healed.
    pub fn regenerate(&mut self, dt: f32, tuning: &ShooterTuning) -> bool {
        if !self.kind.is_boss() {
            return false;
        }
        self.heal_timer -= dt;
        if self.heal_timer <= 0.0 && !self.health.is_full() {
            self.health.heal(tuning.boss_heal_amount);
            self.heal_timer = tuning.boss_heal_interval;
            return true;
        }
        false
    }

    /// Count the shot timer down and fire at `target` when it runs out
    pub fn update_weapon(
        &mut self,
        dt: f32,
        target: Vec2,
        rng: &mut Pcg32,
        tuning: &ShooterTuning,
    ) -> Attack {
        self.shoot_timer -= dt;
        if self.shoot_timer > 0.0 {
            return Attack::Hold;
        }
        if !self.kind.always_fires() && rng.random::<f32>() >= 0.06 {
            self.shoot_timer = 1.0 + rng.random::<f32>() * 1.6;
            return Attack::Hold;
        }

        self.shoot_timer = match self.kind {
            EnemyKind::Boss(_) => 0.7,
            EnemyKind::Tank => 1.6 + rng.random::<f32>() * 1.4,
            EnemyKind::Bloater => 1.0 + rng.random::<f32>() * 1.2,
            EnemyKind::Gunner => 0.12 + rng.random::<f32>() * 0.06,
            _ => 0.8 + rng.random::<f32>() * 1.2,
        };

        let aim = angle_to(self.pos, target);
        let gun = Gun {
            origin: self.pos,
            aim,
            multiplier: tuning.enemy_damage_multiplier,
        };
        let shots = match self.kind {
            EnemyKind::Boss(boss) => return self.boss_attack(boss, &gun, rng),
            EnemyKind::Tank => gun.fan(1, 0.22, 220.0, 6.0, 1.0),
            EnemyKind::Shooter => {
                if rng.random::<f32>() < 0.32 {
                    gun.fan(0, 0.0, 160.0, 10.0, 3.0)
                } else {
                    gun.fan(0, 0.0, 160.0, 5.0, 1.0)
                }
            }
            EnemyKind::Bloater => grow(gun.fan(0, 0.0, 120.0, 6.0, 2.0), 24.0, 34.0),
            EnemyKind::Gunner => gun.fan(0, 0.0, 260.0, 3.0, 1.0),
            EnemyKind::Wanderer => gun.split(gun.fan(0, 0.0, 140.0, 5.0, 1.0), 0.36),
            EnemyKind::Charger | EnemyKind::Sniper | EnemyKind::Shield | EnemyKind::Kamikaze => {
                gun.fan(0, 0.0, 200.0, 5.0, 1.0)
            }
        };
        Attack::Shots(shots)
    }

    fn boss_attack(&mut self, boss: BossKind, gun: &Gun, rng: &mut Pcg32) -> Attack {
        match boss {
            BossKind::Rapid => {
                if self.boss.resting {
                    self.boss = BossState::default();
                    self.shoot_timer = 0.35;
                    return Attack::Hold;
                }
                self.boss.volleys += 1;
                if self.boss.volleys >= 2 {
                    self.boss.resting = true;
                    self.shoot_timer = 1.5 + rng.random::<f32>() * 0.5;
                } else {
                    self.shoot_timer = 0.35;
                }
                Attack::Shots(grow(gun.fan(1, 0.18, 180.0, 7.0, 2.0), 20.0, 30.0))
            }
            BossKind::Summoner => {
                self.shoot_timer = 0.5;
                let kind = EnemyKind::MINIONS[rng.random_range(0..EnemyKind::MINIONS.len())];
                let angle = rng.random::<f32>() * std::f32::consts::TAU;
                Attack::Summon {
                    kind,
                    at: self.pos + polar_to_cartesian(80.0, angle),
                }
            }
            BossKind::Balanced => {
                self.boss.pattern = (self.boss.pattern + 1) % 10;
                Attack::Shots(balanced_pattern(self.boss.pattern, gun))
            }
        }
    }
}

/// One of the balanced boss's ten rotating shot patterns
fn balanced_pattern(index: u32, gun: &Gun) -> Vec<Projectile> {
    match index {
        0 => gun.fan(1, 0.22, 220.0, 6.0, 1.0),
        1 => grow(gun.fan(0, 0.0, 120.0, 6.0, 2.0), 24.0, 34.0),
        2 => gun.split(gun.fan(0, 0.0, 140.0, 5.0, 1.0), 0.36),
        3 => gun.fan(0, 0.0, 160.0, 10.0, 3.0),
        4 => gun.fan(0, 0.0, 260.0, 3.0, 1.0),
        5 => gun.fan(0, 0.0, 200.0, 5.0, 1.0),
        6 => grow(gun.fan(1, 0.15, 180.0, 7.0, 2.0), 20.0, 30.0),
        7 => gun.split(gun.fan(1, 0.2, 150.0, 5.0, 1.0), 0.4),
        8 => gun.fan(2, 0.18, 240.0, 3.0, 1.0),
        _ => gun.fan(1, 0.3, 150.0, 8.0, 2.0),
    }
}

/// Enemy muzzle: where, which way, and how base damage scales
struct Gun {
    origin: Vec2,
    aim: f32,
    multiplier: f32,
}

impl Gun {
    fn damage(&self, base: f32) -> f32 {
        (base * self.multiplier).round().max(1.0)
    }

    /// `2 * half + 1` shots spaced `step` radians around the aim
    fn fan(&self, half: i32, step: f32, speed: f32, radius: f32, base: f32) -> Vec<Projectile> {
        let damage = self.damage(base);
        let style = if base >= 3.0 {
            ShotStyle::Heavy
        } else {
            ShotStyle::Standard
        };
        (-half..=half)
            .map(|k| {
                Projectile::aimed(
                    Owner::Enemy,
                    self.origin,
                    self.aim + k as f32 * step,
                    speed,
                    radius,
                    damage,
                )
                .style(style)
            })
            .collect()
    }

    fn split(&self, shots: Vec<Projectile>, after: f32) -> Vec<Projectile> {
        let split = Split {
            after,
            age: 0.0,
            children: 3,
            spread: 0.28,
            child_radius: 4.0,
            child_damage: self.damage(1.0),
        };
        shots
            .into_iter()
            .map(|s| s.style(ShotStyle::Split).splitting(split))
            .collect()
    }
}

fn grow(shots: Vec<Projectile>, rate: f32, max_radius: f32) -> Vec<Projectile> {
    shots
        .into_iter()
        .map(|s| s.style(ShotStyle::Growing).growing(rate, max_radius))
        .collect()
}
