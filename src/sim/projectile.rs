//! Projectiles and beams
//!
//! A projectile carries a set of independent optional behaviors. They
//! combine freely: a piercing, exploding, growing shot is legal. Only the
//! behaviors present take part in its per-tick update; a projectile with
//! none moves in a straight line until it leaves the arena or hits
//! something.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Bounds, segment_hits_circle};
use crate::{angle_to, normalize_angle, polar_to_cartesian};

/// Which side fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// Render tag (color/shape lookup for front-ends)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShotStyle {
    #[default]
    Standard,
    Multi,
    Minigun,
    Shotgun,
    Explosive,
    Piercing,
    Sniper,
    Ricochet,
    Orbital,
    Homing,
    Spiral,
    Growing,
    Split,
    Heavy,
    Shard,
}

/// Survives `limit` hits, removed on the last one
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pierce {
    pub limit: u32,
    pub hits: u32,
}

/// Reflects off arena walls, removed once `bounces` exceeds `limit`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ricochet {
    pub limit: u32,
    pub bounces: u32,
}

/// Ring of secondary shots spawned at the impact point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Explosive {
    pub shards: u32,
    pub shard_speed: f32,
    pub shard_radius: f32,
    pub shard_damage: f32,
}

impl Explosive {
    /// Blast effect only, no shards
    pub const fn cosmetic() -> Self {
        Self {
            shards: 0,
            shard_speed: 0.0,
            shard_radius: 0.0,
            shard_damage: 0.0,
        }
    }
}

/// Circles a moving center on a widening radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orbit {
    pub angle: f32,
    pub distance: f32,
    pub angular_speed: f32,
    pub expansion: f32,
    pub max_distance: f32,
}

/// Heading relaxes toward the target by `turn_rate` of the angle error per tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Homing {
    pub turn_rate: f32,
}

/// Heading rotates by a fixed `rate` per tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spiral {
    pub heading: f32,
    pub rate: f32,
}

/// Radius grows up to a cap; damage follows the radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Growth {
    pub rate: f32,
    pub max_radius: f32,
}

/// Breaks into a fan of smaller shots after `after` time units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub after: f32,
    pub age: f32,
    pub children: u32,
    pub spread: f32,
    pub child_radius: f32,
    pub child_damage: f32,
}

/// Orthogonal behavior flags
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Behaviors {
    pub pierce: Option<Pierce>,
    pub ricochet: Option<Ricochet>,
    pub explosive: Option<Explosive>,
    pub orbit: Option<Orbit>,
    pub homing: Option<Homing>,
    pub spiral: Option<Spiral>,
    pub growth: Option<Growth>,
    pub split: Option<Split>,
}

/// Per-tick environment a projectile moves through
#[derive(Debug, Clone, Copy)]
pub struct StepContext {
    /// Movement/lifetime scale (1.0 for per-tick units, `dt` for per-second)
    pub dt: f32,
    pub bounds: Bounds,
    /// How far outside the arena a shot may drift before removal
    pub margin: f32,
    /// Center orbital shots circle around (the owner's position)
    pub orbit_center: Vec2,
    /// What homing shots chase
    pub target: Option<Vec2>,
}

/// Result of advancing one projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Alive,
    Expired,
    /// Remove and replace with `split_children()`
    Split,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub owner: Owner,
    pub style: ShotStyle,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub behaviors: Behaviors,
}

impl Projectile {
    pub fn new(owner: Owner, pos: Vec2, vel: Vec2, radius: f32, damage: f32) -> Self {
        Self {
            id: 0,
            owner,
            style: ShotStyle::Standard,
            pos,
            vel,
            radius: radius.max(0.0),
            damage,
            behaviors: Behaviors::default(),
        }
    }

    /// Fire from `pos` along `angle` at `speed`
    pub fn aimed(owner: Owner, pos: Vec2, angle: f32, speed: f32, radius: f32, damage: f32) -> Self {
        Self::new(owner, pos, polar_to_cartesian(speed, angle), radius, damage)
    }

    pub fn style(mut self, style: ShotStyle) -> Self {
        self.style = style;
        self
    }

    pub fn piercing(mut self, limit: u32) -> Self {
        self.behaviors.pierce = Some(Pierce { limit, hits: 0 });
        self
    }

    pub fn ricochet(mut self, limit: u32) -> Self {
        self.behaviors.ricochet = Some(Ricochet { limit, bounces: 0 });
        self
    }

    pub fn explosive(mut self, explosive: Explosive) -> Self {
        self.behaviors.explosive = Some(explosive);
        self
    }

    pub fn orbiting(mut self, orbit: Orbit) -> Self {
        self.behaviors.orbit = Some(orbit);
        self
    }

    pub fn homing(mut self, turn_rate: f32) -> Self {
        self.behaviors.homing = Some(Homing { turn_rate });
        self
    }

    pub fn spiral(mut self, rate: f32) -> Self {
        let heading = self.vel.y.atan2(self.vel.x);
        self.behaviors.spiral = Some(Spiral { heading, rate });
        self
    }

    pub fn growing(mut self, rate: f32, max_radius: f32) -> Self {
        self.behaviors.growth = Some(Growth { rate, max_radius });
        self
    }

    pub fn splitting(mut self, split: Split) -> Self {
        self.behaviors.split = Some(split);
        self
    }

    /// Advance one tick according to the behaviors present
    pub fn advance(&mut self, ctx: &StepContext) -> StepOutcome {
        let b = &mut self.behaviors;

        if let Some(orbit) = b.orbit.as_mut() {
            orbit.angle += orbit.angular_speed;
            orbit.distance += orbit.expansion;
            self.pos = ctx.orbit_center + polar_to_cartesian(orbit.distance, orbit.angle);
            if orbit.distance > orbit.max_distance {
                return StepOutcome::Expired;
            }
        } else {
            if let (Some(homing), Some(target)) = (b.homing, ctx.target) {
                self.vel = steer_toward(self.vel, self.pos, target, homing.turn_rate);
            }
            if let Some(spiral) = b.spiral.as_mut() {
                spiral.heading = normalize_angle(spiral.heading + spiral.rate);
                self.vel = polar_to_cartesian(self.vel.length(), spiral.heading);
            }
            self.pos += self.vel * ctx.dt;
        }

        if let Some(ricochet) = b.ricochet.as_mut() {
            ricochet.bounces += ctx.bounds.bounce(self.pos, &mut self.vel);
            if ricochet.bounces > ricochet.limit {
                return StepOutcome::Expired;
            }
        }

        if let Some(growth) = b.growth {
            self.radius = (self.radius + growth.rate * ctx.dt).min(growth.max_radius);
            self.damage = (self.radius / 6.0).floor().max(1.0);
        }

        if let Some(split) = b.split.as_mut() {
            split.age += ctx.dt;
            if split.age >= split.after {
                return StepOutcome::Split;
            }
        }

        if b.ricochet.is_none() && !ctx.bounds.contains_with_margin(self.pos, ctx.margin) {
            return StepOutcome::Expired;
        }

        StepOutcome::Alive
    }

    /// Register a hit. Returns true when the projectile survives it.
    pub fn register_hit(&mut self) -> bool {
        match self.behaviors.pierce.as_mut() {
            Some(pierce) => {
                pierce.hits += 1;
                pierce.hits < pierce.limit
            }
            None => false,
        }
    }

    /// Fan of plain child shots replacing a split projectile
    pub fn split_children(&self) -> Vec<Projectile> {
        let Some(split) = self.behaviors.split else {
            return Vec::new();
        };
        let heading = self.vel.y.atan2(self.vel.x);
        let speed = self.vel.length();
        let half = (split.children as f32 - 1.0) / 2.0;

        (0..split.children)
            .map(|k| {
                let angle = heading + (k as f32 - half) * split.spread;
                Projectile::aimed(
                    self.owner,
                    self.pos,
                    angle,
                    speed,
                    split.child_radius,
                    split.child_damage,
                )
                .style(ShotStyle::Shard)
            })
            .collect()
    }

    /// Ring of secondary shots for an explosive impact at `at`
    pub fn explosion_shards(&self, at: Vec2) -> Vec<Projectile> {
        let Some(explosive) = self.behaviors.explosive else {
            return Vec::new();
        };
        (0..explosive.shards)
            .map(|k| {
                let angle = k as f32 * std::f32::consts::TAU / explosive.shards as f32;
                Projectile::aimed(
                    self.owner,
                    at,
                    angle,
                    explosive.shard_speed,
                    explosive.shard_radius,
                    explosive.shard_damage,
                )
                .style(ShotStyle::Shard)
            })
            .collect()
    }
}

/// Rotate `vel` toward `target` by `turn_rate` of the angular error,
/// keeping its speed
pub fn steer_toward(vel: Vec2, pos: Vec2, target: Vec2, turn_rate: f32) -> Vec2 {
    let current = vel.y.atan2(vel.x);
    let desired = angle_to(pos, target);
    let diff = normalize_angle(desired - current);
    polar_to_cartesian(vel.length(), current + diff * turn_rate)
}

/// A straight damaging ray with a lifetime in ticks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beam {
    pub origin: Vec2,
    pub angle: f32,
    pub length: f32,
    pub half_width: f32,
    pub remaining: u32,
    pub damage_per_tick: f32,
}

impl Beam {
    pub fn end(&self) -> Vec2 {
        self.origin + polar_to_cartesian(self.length, self.angle)
    }

    /// Continuous hit test: contact point when the circle touches the beam
    pub fn hits(&self, center: Vec2, radius: f32) -> Option<Vec2> {
        segment_hits_circle(self.origin, self.end(), center, radius + self.half_width)
    }

    /// Burn one tick of lifetime; false once spent
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining > 0
    }
}
