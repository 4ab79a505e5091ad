//! Timed player boosts
//!
//! Every pickup of a boost adds its own countdown, so the same boost can be
//! active several times over. Stack count is how many countdowns are still
//! running, capped by `max_boost_stacks`.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::polar_to_cartesian;
use crate::sim::projectile::{Explosive, Split};
use crate::sim::{Owner, Projectile, ShotStyle};
use crate::tuning::ShooterTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BoostKind {
    MultiShot,
    FireRate,
    BigShot,
    Grow,
    Split,
    Pierce,
    Explosive,
    Shield,
}

impl BoostKind {
    pub const ALL: [BoostKind; 8] = [
        BoostKind::MultiShot,
        BoostKind::FireRate,
        BoostKind::BigShot,
        BoostKind::Grow,
        BoostKind::Split,
        BoostKind::Pierce,
        BoostKind::Explosive,
        BoostKind::Shield,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BoostKind::MultiShot => "3X SHOT",
            BoostKind::FireRate => "RAPID FIRE",
            BoostKind::BigShot => "BIG SHOT",
            BoostKind::Grow => "GROWING SHOT",
            BoostKind::Split => "SPLIT SHOT",
            BoostKind::Pierce => "PIERCE",
            BoostKind::Explosive => "EXPLOSIVE",
            BoostKind::Shield => "SHIELD",
        }
    }
}

/// Active boost countdowns (seconds), keyed by kind
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Boosts {
    timers: BTreeMap<BoostKind, Vec<f32>>,
}

impl Boosts {
    /// Add one stack of `kind` lasting `duration`.
    ///
    /// At the cap the stack closest to running out is refreshed instead.
    /// Returns the resulting stack count.
    pub fn add(&mut self, kind: BoostKind, duration: f32, max_stacks: usize) -> usize {
        let timers = self.timers.entry(kind).or_default();
        if timers.len() < max_stacks {
            timers.push(duration);
        } else if let Some(shortest) = timers.iter_mut().min_by(|a, b| a.total_cmp(b)) {
            *shortest = duration;
        }
        timers.len()
    }

    /// Count every timer down, dropping the ones that run out
    pub fn tick(&mut self, dt: f32) {
        for timers in self.timers.values_mut() {
            timers.retain_mut(|t| {
                *t -= dt;
                *t > 0.0
            });
        }
        self.timers.retain(|_, timers| !timers.is_empty());
    }

    pub fn stacks(&self, kind: BoostKind) -> usize {
        self.timers.get(&kind).map_or(0, Vec::len)
    }

    pub fn has(&self, kind: BoostKind) -> bool {
        self.stacks(kind) > 0
    }

    /// Longest remaining time of `kind`, for HUD labels
    pub fn remaining(&self, kind: BoostKind) -> Option<f32> {
        self.timers
            .get(&kind)
            .and_then(|t| t.iter().copied().max_by(|a, b| a.total_cmp(b)))
    }

    pub fn active(&self) -> impl Iterator<Item = (BoostKind, usize)> + '_ {
        self.timers.iter().map(|(&kind, t)| (kind, t.len()))
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// Seconds between auto-fire volleys
    pub fn fire_interval(&self, tuning: &ShooterTuning) -> f32 {
        if self.has(BoostKind::FireRate) {
            tuning.rapid_fire_interval
        } else {
            tuning.fire_interval
        }
    }

    /// Incoming damage after shields: halved per stack, never below 1
    pub fn shielded(&self, damage: f32) -> f32 {
        let stacks = self.stacks(BoostKind::Shield);
        if stacks == 0 {
            return damage;
        }
        (damage * 0.5f32.powi(stacks as i32)).floor().max(1.0)
    }

    /// One auto-fire volley from `origin` along `aim` with every active
    /// boost applied
    pub fn volley(&self, origin: Vec2, aim: f32, tuning: &ShooterTuning) -> Vec<Projectile> {
        let mut radius = 4.0f32;
        let mut damage = 1.0;
        let mut style = ShotStyle::Standard;
        if self.has(BoostKind::BigShot) {
            radius = 8.0;
            damage = 3.0;
            style = ShotStyle::Heavy;
        }
        if self.has(BoostKind::Grow) {
            radius = radius.max(6.0);
            style = ShotStyle::Growing;
        }
        if self.has(BoostKind::Split) {
            radius = radius.max(5.0);
            style = ShotStyle::Split;
        }

        let build = |angle: f32| {
            let mut shot = Projectile::new(
                Owner::Player,
                origin,
                polar_to_cartesian(tuning.bullet_speed, angle),
                radius,
                damage,
            )
            .style(style);
            if self.has(BoostKind::Grow) {
                shot = shot.growing(24.0, 34.0);
            }
            if self.has(BoostKind::Split) {
                shot = shot.splitting(Split {
                    after: 0.36,
                    age: 0.0,
                    children: 3,
                    spread: 0.28,
                    child_radius: 4.0,
                    child_damage: 1.0,
                });
            }
            if self.has(BoostKind::Pierce) {
                shot = shot.piercing(tuning.pierce_limit);
            }
            if self.has(BoostKind::Explosive) {
                shot = shot.explosive(Explosive {
                    shards: 6,
                    shard_speed: 260.0,
                    shard_radius: 3.0,
                    shard_damage: 1.0,
                });
            }
            shot
        };

        let multi = self.stacks(BoostKind::MultiShot);
        if multi == 0 {
            return vec![build(aim)];
        }
        // 3 bullets per stack, each stack fanned 0.08 rad further round
        (0..multi)
            .flat_map(|stack| {
                (-1..=1).map(move |k| aim + k as f32 * 0.15 + stack as f32 * 0.08)
            })
            .map(build)
            .collect()
    }
}
