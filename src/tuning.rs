//! Data-driven game balance
//!
//! Every constant either game reads lives here. Defaults reproduce the
//! shipped balance; a JSON file may override any subset of fields.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// Boss encounter balance. Distances are pixels, speeds pixels/tick,
/// durations ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
    /// Projectiles this far outside the arena are discarded
    pub offscreen_margin: f32,

    // === Player ===
    pub player_radius: f32,
    pub player_speed: f32,
    pub player_health: f32,
    /// Base projectile speed for player weapons
    pub shot_speed: f32,
    pub heal_amount: f32,
    pub heal_cooldown: f32,
    /// How long the heal glow lasts (cosmetic)
    pub heal_duration: f32,
    /// Passive regeneration period and amount
    pub regen_interval: u64,
    pub regen_amount: f32,
    /// Player ray gun damage per tick and hit slack
    pub ray_damage: f32,
    pub ray_hit_margin: f32,
    pub pierce_limit: u32,
    pub ricochet_limit: u32,
    pub orbit_max_distance: f32,

    // === Boss ===
    pub boss_radius: f32,
    pub boss_health: f32,
    pub boss_velocity: Vec2,
    pub attack_interval: u32,
    pub patterns_min: u32,
    pub patterns_max: u32,
    /// Delay between mixed patterns (milliseconds)
    pub pattern_stagger_ms: u32,
    pub dash_speed: f32,
    pub dash_ticks: u32,
    pub dash_damage: f32,
    pub shot_radius: f32,
    pub shot_damage: f32,
    pub boss_shot_speed: f32,
    pub beam_length: f32,
    pub beam_half_width: f32,
    pub beam_damage: f32,
    pub homing_turn_rate: f32,
    pub homing_speed: f32,
    pub enemy_pierce_limit: u32,
    pub enemy_ricochet_limit: u32,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            arena_width: 1280.0,
            arena_height: 720.0,
            offscreen_margin: 50.0,

            player_radius: 20.0,
            player_speed: 6.0,
            player_health: 200.0,
            shot_speed: 10.0,
            heal_amount: 80.0,
            heal_cooldown: 800.0,
            heal_duration: 60.0,
            regen_interval: 1000,
            regen_amount: 15.0,
            ray_damage: 0.3,
            ray_hit_margin: 6.0,
            pierce_limit: 3,
            ricochet_limit: 3,
            orbit_max_distance: 300.0,

            boss_radius: 60.0,
            boss_health: 1200.0,
            boss_velocity: Vec2::new(2.5, 2.0),
            attack_interval: 100,
            patterns_min: 2,
            patterns_max: 4,
            pattern_stagger_ms: 200,
            dash_speed: 22.0,
            dash_ticks: 30,
            dash_damage: 40.0,
            shot_radius: 12.0,
            shot_damage: 10.0,
            boss_shot_speed: 5.5,
            beam_length: 1000.0,
            beam_half_width: 8.0,
            beam_damage: 1.0,
            homing_turn_rate: 0.08,
            homing_speed: 4.0,
            enemy_pierce_limit: 3,
            enemy_ricochet_limit: 4,
        }
    }
}

/// Wave shooter balance. Distances are pixels, speeds pixels/second,
/// durations seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShooterTuning {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
    pub player_bullet_margin: f32,
    pub enemy_bullet_margin: f32,
    pub enemy_despawn_margin: f32,

    // === Player ===
    pub player_radius: f32,
    pub player_speed: f32,
    pub player_health: f32,
    pub lives: u32,
    /// Respawn point distance above the bottom edge
    pub respawn_offset: f32,
    pub fire_interval: f32,
    pub rapid_fire_interval: f32,
    pub bullet_speed: f32,
    pub pierce_limit: u32,

    // === Boosts ===
    pub boost_duration: f32,
    /// Upper bound on simultaneous timers of one boost kind
    pub max_boost_stacks: usize,

    // === Enemies ===
    pub enemy_damage_multiplier: f32,
    /// Per-wave HP growth (`1 + (wave - 1) * step`)
    pub difficulty_step: f32,
    pub boss_heal_interval: f32,
    pub boss_heal_amount: f32,

    // === Waves ===
    pub boss_every: u32,
    pub wave_base_count: u32,
    pub wave_growth: f32,
    pub wave_max_count: u32,
    pub boss_wave_shrink: f32,
    pub spawn_interval_base: f32,
    pub spawn_interval_min: f32,
    pub spawn_interval_scale: f32,
    pub warning_secs: f32,
    pub first_wave_delay: f32,
    pub inter_wave_secs: f32,
    pub cleared_banner_secs: f32,

    // === Pickups ===
    pub drop_chance_base: f32,
    pub drop_chance_step: f32,
    pub drop_chance_max: f32,
    pub heal_pickup_amount: f32,
    pub boss_heal_drop: f32,
}

impl Default for ShooterTuning {
    fn default() -> Self {
        Self {
            arena_width: 960.0,
            arena_height: 672.0,
            player_bullet_margin: 50.0,
            enemy_bullet_margin: 80.0,
            enemy_despawn_margin: 120.0,

            player_radius: 8.0,
            player_speed: 420.0,
            player_health: 100.0,
            lives: 3,
            respawn_offset: 80.0,
            fire_interval: 0.36,
            rapid_fire_interval: 0.08,
            bullet_speed: 520.0,
            pierce_limit: 5,

            boost_duration: 8.0,
            max_boost_stacks: 4,

            enemy_damage_multiplier: 2.5,
            difficulty_step: 0.06,
            boss_heal_interval: 3.0,
            boss_heal_amount: 2.0,

            boss_every: 5,
            wave_base_count: 3,
            wave_growth: 1.6,
            wave_max_count: 40,
            boss_wave_shrink: 0.6,
            spawn_interval_base: 0.9,
            spawn_interval_min: 0.18,
            spawn_interval_scale: 0.04,
            warning_secs: 3.4,
            first_wave_delay: 1.5,
            inter_wave_secs: 2.0,
            cleared_banner_secs: 1.6,

            drop_chance_base: 0.35,
            drop_chance_step: 0.02,
            drop_chance_max: 0.85,
            heal_pickup_amount: 30.0,
            boss_heal_drop: 50.0,
        }
    }
}

/// Balance for both games
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub boss: BossTuning,
    pub shooter: ShooterTuning,
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json_pretty(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let b = &self.boss;
        let s = &self.shooter;

        positive("boss.arena_width", b.arena_width)?;
        positive("boss.arena_height", b.arena_height)?;
        positive("boss.player_health", b.player_health)?;
        positive("boss.boss_health", b.boss_health)?;
        non_negative("boss.player_radius", b.player_radius)?;
        non_negative("boss.boss_radius", b.boss_radius)?;
        non_negative("boss.shot_radius", b.shot_radius)?;
        if b.patterns_min == 0 || b.patterns_min > b.patterns_max {
            return Err(TuningError::Invalid {
                field: "boss.patterns_min",
                reason: format!(
                    "need 1 <= patterns_min <= patterns_max, got {}..={}",
                    b.patterns_min, b.patterns_max
                ),
            });
        }
        if b.attack_interval == 0 {
            return Err(invalid("boss.attack_interval", "must be at least 1 tick"));
        }
        if b.regen_interval == 0 {
            return Err(invalid("boss.regen_interval", "must be at least 1 tick"));
        }

        positive("shooter.arena_width", s.arena_width)?;
        positive("shooter.arena_height", s.arena_height)?;
        positive("shooter.player_health", s.player_health)?;
        non_negative("shooter.player_radius", s.player_radius)?;
        positive("shooter.fire_interval", s.fire_interval)?;
        positive("shooter.rapid_fire_interval", s.rapid_fire_interval)?;
        positive("shooter.spawn_interval_min", s.spawn_interval_min)?;
        if s.max_boost_stacks == 0 {
            return Err(invalid("shooter.max_boost_stacks", "must allow at least one stack"));
        }
        if s.boss_every == 0 {
            return Err(invalid("shooter.boss_every", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> TuningError {
    TuningError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            reason: format!("must be positive, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            reason: format!("must be non-negative, got {value}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "boss": { "boss_health": 500.0 } }"#).unwrap();
        assert_eq!(tuning.boss.boss_health, 500.0);
        assert_eq!(tuning.boss.player_health, 200.0);
        assert_eq!(tuning.shooter.lives, 3);
    }

    #[test]
    fn test_roundtrip_through_json() {
        let json = Tuning::default().to_json_pretty().unwrap();
        let back = Tuning::from_json(&json).unwrap();
        assert_eq!(back.boss.boss_velocity, Vec2::new(2.5, 2.0));
    }

    #[test]
    fn test_rejects_negative_radius() {
        let err = Tuning::from_json(r#"{ "shooter": { "player_radius": -1.0 } }"#).unwrap_err();
        match err {
            TuningError::Invalid { field, .. } => assert_eq!(field, "shooter.player_radius"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_bad_pattern_range() {
        let err =
            Tuning::from_json(r#"{ "boss": { "patterns_min": 5, "patterns_max": 2 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "boss.patterns_min", .. }));
    }

    #[test]
    fn test_parse_error() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
        assert!(err.to_string().starts_with("tuning parse error"));
    }
}
