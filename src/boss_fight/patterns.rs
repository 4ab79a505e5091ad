//! Boss attack patterns
//!
//! Every attack cycle the boss mixes several patterns, staggered through
//! the deferred-action schedule. Patterns read boss and player positions
//! when they execute, not when they were chosen.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{BossFight, Dash};
use crate::sim::projectile::Explosive;
use crate::sim::{Beam, Owner, Projectile, ShotStyle};
use crate::{angle_to, ms_to_ticks, polar_to_cartesian};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackPattern {
    EyeBeam,
    StalkBeams,
    Spiral,
    Nova,
    Barrage,
    XBeams,
    HomingSwarm,
    Pentagon,
    StalkSweep,
    ChaosSpread,
    GridBeams,
    Dash,
    MultiShot,
    MinigunBarrage,
    Shotgun,
    ExplosiveShells,
    PiercingShots,
    SniperBeam,
    RicochetBurst,
    OrbitalSpiral,
    SustainedRay,
}

impl AttackPattern {
    pub const ALL: [AttackPattern; 21] = [
        AttackPattern::EyeBeam,
        AttackPattern::StalkBeams,
        AttackPattern::Spiral,
        AttackPattern::Nova,
        AttackPattern::Barrage,
        AttackPattern::XBeams,
        AttackPattern::HomingSwarm,
        AttackPattern::Pentagon,
        AttackPattern::StalkSweep,
        AttackPattern::ChaosSpread,
        AttackPattern::GridBeams,
        AttackPattern::Dash,
        AttackPattern::MultiShot,
        AttackPattern::MinigunBarrage,
        AttackPattern::Shotgun,
        AttackPattern::ExplosiveShells,
        AttackPattern::PiercingShots,
        AttackPattern::SniperBeam,
        AttackPattern::RicochetBurst,
        AttackPattern::OrbitalSpiral,
        AttackPattern::SustainedRay,
    ];
}

/// Work queued on the schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossAction {
    Pattern(AttackPattern),
    /// One default shot aimed at the player
    AimedShot,
    HomingShot,
    /// Diagonal follow-up volley of the grid pattern
    XVolley,
    ExplosiveShell,
    PiercingShot,
}

impl BossFight {
    /// Pick this cycle's patterns and queue them at staggered ticks
    pub(crate) fn start_attack_cycle(&mut self) {
        let count = self
            .rng
            .random_range(self.tuning.patterns_min..=self.tuning.patterns_max);
        let stagger = ms_to_ticks(self.tuning.pattern_stagger_ms);

        let mut chosen = Vec::with_capacity(count as usize);
        for i in 0..count {
            let pattern = AttackPattern::ALL[self.rng.random_range(0..AttackPattern::ALL.len())];
            self.schedule
                .push_at(self.time_ticks + i as u64 * stagger, BossAction::Pattern(pattern));
            chosen.push(pattern);
        }
        log::debug!("Boss attack cycle at tick {}: {:?}", self.time_ticks, chosen);
    }

    /// Run a deferred action. No-op once the encounter has ended.
    pub(crate) fn run_action(&mut self, action: BossAction) {
        if self.is_over() {
            return;
        }
        match action {
            BossAction::Pattern(pattern) => self.execute_pattern(pattern),
            BossAction::AimedShot => {
                let shot = self.boss_shot(self.aim_at_player());
                self.spawn(shot);
            }
            BossAction::HomingShot => self.spawn_homing(),
            BossAction::XVolley => {
                for k in 0..4 {
                    let angle = FRAC_PI_4 + FRAC_PI_2 * k as f32;
                    self.spoke(angle);
                }
            }
            BossAction::ExplosiveShell => {
                let burst = Explosive::cosmetic();
                let shell = Projectile::aimed(Owner::Enemy, self.boss.pos, self.aim_at_player(), 4.0, 18.0, 20.0)
                    .style(ShotStyle::Explosive)
                    .explosive(burst);
                self.spawn(shell);
            }
            BossAction::PiercingShot => {
                let shot = Projectile::aimed(Owner::Enemy, self.boss.pos, self.aim_at_player(), 8.0, 10.0, 12.0)
                    .style(ShotStyle::Piercing)
                    .piercing(self.tuning.enemy_pierce_limit);
                self.spawn(shot);
            }
        }
    }

    /// Execute one pattern against the current positions
    pub fn execute_pattern(&mut self, pattern: AttackPattern) {
        if self.is_over() {
            return;
        }
        let origin = self.boss.pos;
        let aim = self.aim_at_player();

        match pattern {
            AttackPattern::EyeBeam => self.beam(origin, aim, 60),
            AttackPattern::StalkBeams => {
                for _ in 0..5 {
                    let tip = self.boss.stalk_tip(self.rng.random_range(0..10));
                    let angle = angle_to(tip, self.player.pos);
                    self.beam(tip, angle, 30);
                }
            }
            AttackPattern::Spiral => {
                for i in 0..24 {
                    let angle = TAU / 24.0 * i as f32 + self.boss.rotation * 10.0;
                    let shot = self.boss_shot(angle);
                    self.spawn(shot);
                }
            }
            AttackPattern::Nova => {
                for i in 0..32 {
                    let shot = self.boss_shot(TAU / 32.0 * i as f32);
                    self.spawn(shot);
                }
            }
            AttackPattern::Barrage => self.queue_series(BossAction::AimedShot, 15, 50),
            AttackPattern::XBeams => {
                for k in 0..4 {
                    self.beam(origin, FRAC_PI_4 + FRAC_PI_2 * k as f32, 45);
                }
            }
            AttackPattern::HomingSwarm => self.queue_series(BossAction::HomingShot, 10, 80),
            AttackPattern::Pentagon => {
                for i in 0..5 {
                    self.spoke(TAU / 5.0 * i as f32);
                }
            }
            AttackPattern::StalkSweep => {
                for i in 0..10 {
                    let tip = self.boss.stalk_tip(i);
                    let stalk_angle = TAU / 10.0 * i as f32 + self.boss.rotation * 0.3;
                    self.beam(tip, stalk_angle + self.boss.rotation, 35);
                }
            }
            AttackPattern::ChaosSpread => {
                for _ in 0..40 {
                    let angle = self.rng.random::<f32>() * TAU;
                    let shot = self.boss_shot(angle);
                    self.spawn(shot);
                }
            }
            AttackPattern::GridBeams => {
                for k in 0..4 {
                    self.beam(origin, FRAC_PI_2 * k as f32, 40);
                }
                self.schedule
                    .push_at(self.time_ticks + ms_to_ticks(300), BossAction::XVolley);
            }
            AttackPattern::Dash => {
                self.boss.dash = Some(Dash {
                    vel: polar_to_cartesian(self.tuning.dash_speed, aim),
                    remaining: self.tuning.dash_ticks,
                });
                self.particles.burst(origin, 0xff00ff, 30);
            }
            AttackPattern::MultiShot => self.fan(aim, 1, 0.2),
            AttackPattern::MinigunBarrage => self.queue_series(BossAction::AimedShot, 12, 40),
            AttackPattern::Shotgun => self.fan(aim, 3, 0.15),
            AttackPattern::ExplosiveShells => self.queue_series(BossAction::ExplosiveShell, 3, 200),
            AttackPattern::PiercingShots => self.queue_series(BossAction::PiercingShot, 5, 100),
            AttackPattern::SniperBeam => self.beam(origin, aim, 80),
            AttackPattern::RicochetBurst => {
                for _ in 0..6 {
                    let angle = self.rng.random::<f32>() * TAU;
                    let shot = Projectile::aimed(Owner::Enemy, origin, angle, 6.0, 10.0, 12.0)
                        .style(ShotStyle::Ricochet)
                        .ricochet(self.tuning.enemy_ricochet_limit);
                    self.spawn(shot);
                }
            }
            AttackPattern::OrbitalSpiral => {
                for i in 0..6 {
                    let angle = TAU / 6.0 * i as f32;
                    let shot = Projectile::aimed(Owner::Enemy, origin, angle, 3.0, 10.0, 8.0)
                        .style(ShotStyle::Orbital)
                        .spiral(0.08);
                    self.spawn(shot);
                }
            }
            AttackPattern::SustainedRay => self.beam(origin, aim, 60),
        }
    }

    fn aim_at_player(&self) -> f32 {
        angle_to(self.boss.pos, self.player.pos)
    }

    /// Default boss projectile from the boss center
    fn boss_shot(&self, angle: f32) -> Projectile {
        Projectile::aimed(
            Owner::Enemy,
            self.boss.pos,
            angle,
            self.tuning.boss_shot_speed,
            self.tuning.shot_radius,
            self.tuning.shot_damage,
        )
    }

    /// `2 * half + 1` default shots fanned around `aim`
    fn fan(&mut self, aim: f32, half: i32, step: f32) {
        for i in -half..=half {
            let shot = self.boss_shot(aim + i as f32 * step);
            self.spawn(shot);
        }
    }

    /// Five default shots along one direction at increasing speeds, so the
    /// spoke spreads into a line
    fn spoke(&mut self, angle: f32) {
        for j in 0..5 {
            let mut shot = self.boss_shot(angle);
            shot.vel *= 0.6 + 0.2 * j as f32;
            self.spawn(shot);
        }
    }

    fn beam(&mut self, origin: Vec2, angle: f32, ticks: u32) {
        self.beams.push(Beam {
            origin,
            angle,
            length: self.tuning.beam_length,
            half_width: self.tuning.beam_half_width,
            remaining: ticks,
            damage_per_tick: self.tuning.beam_damage,
        });
    }

    /// Queue `count` copies of `action`, `spacing_ms` apart, first one now
    fn queue_series(&mut self, action: BossAction, count: u32, spacing_ms: u32) {
        for i in 0..count {
            self.schedule
                .push_at(self.time_ticks + ms_to_ticks(i * spacing_ms), action);
        }
    }

    /// Homing shot appearing 200 px from the boss, already heading at the player
    fn spawn_homing(&mut self) {
        let angle = self.rng.random::<f32>() * TAU;
        let pos = self.boss.pos + polar_to_cartesian(200.0, angle);
        let heading = angle_to(pos, self.player.pos);
        let shot = Projectile::aimed(Owner::Enemy, pos, heading, self.tuning.homing_speed, 10.0, 12.0)
            .style(ShotStyle::Homing)
            .homing(self.tuning.homing_turn_rate);
        self.spawn(shot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::BossTuning;

    fn fight() -> BossFight {
        BossFight::new(9, BossTuning::default())
    }

    fn enemy_shots(f: &BossFight) -> usize {
        f.projectiles.iter().filter(|p| p.owner == Owner::Enemy).count()
    }

    #[test]
    fn test_ring_patterns_spawn_full_rings() {
        let mut f = fight();
        f.execute_pattern(AttackPattern::Nova);
        assert_eq!(enemy_shots(&f), 32);
        f.execute_pattern(AttackPattern::Spiral);
        assert_eq!(enemy_shots(&f), 56);
        f.execute_pattern(AttackPattern::Pentagon);
        assert_eq!(enemy_shots(&f), 81);
    }

    #[test]
    fn test_default_boss_shot_stats() {
        let mut f = fight();
        f.execute_pattern(AttackPattern::MultiShot);
        assert_eq!(f.projectiles.len(), 3);
        for p in &f.projectiles {
            assert_eq!(p.radius, 12.0);
            assert_eq!(p.damage, 10.0);
            assert!((p.vel.length() - 5.5).abs() < 1e-4);
        }
    }

    #[test]
    fn test_barrage_is_staggered() {
        let mut f = fight();
        f.execute_pattern(AttackPattern::Barrage);
        assert_eq!(f.pending_actions(), 15);
        assert!(f.projectiles.is_empty());

        let now = f.time_ticks;
        let due = f.schedule.drain_due(now);
        assert_eq!(due, vec![BossAction::AimedShot]);
        // 50 ms apart: the last shot fires 700 ms (42 ticks) later
        assert_eq!(f.schedule.drain_due(now + 41).len(), 13);
        assert_eq!(f.schedule.drain_due(now + 42).len(), 1);
    }

    #[test]
    fn test_beams_use_tuned_geometry() {
        let mut f = fight();
        f.execute_pattern(AttackPattern::XBeams);
        f.execute_pattern(AttackPattern::SniperBeam);
        assert_eq!(f.beams.len(), 5);
        assert!(f.beams.iter().all(|b| b.length == 1000.0 && b.half_width == 8.0));
        assert_eq!(f.beams[4].remaining, 80);
    }

    #[test]
    fn test_dash_aims_at_player() {
        let mut f = fight();
        f.player.pos = Vec2::new(640.0, 600.0);
        f.execute_pattern(AttackPattern::Dash);
        let dash = f.boss.dash.unwrap();
        assert_eq!(dash.remaining, 30);
        assert!((dash.vel - Vec2::new(0.0, 22.0)).length() < 1e-3);
    }

    #[test]
    fn test_homing_shot_starts_moving() {
        let mut f = fight();
        f.run_action(BossAction::HomingShot);
        let shot = &f.projectiles[0];
        assert!((shot.pos.distance(f.boss.pos) - 200.0).abs() < 1e-2);
        assert!((shot.vel.length() - 4.0).abs() < 1e-4);
        assert_eq!(shot.behaviors.homing.map(|h| h.turn_rate), Some(0.08));
    }

    #[test]
    fn test_grid_queues_follow_up_volley() {
        let mut f = fight();
        f.execute_pattern(AttackPattern::GridBeams);
        assert_eq!(f.beams.len(), 4);
        assert_eq!(f.schedule.next_due(), Some(f.time_ticks + 18));
        f.run_action(BossAction::XVolley);
        assert_eq!(enemy_shots(&f), 20);
    }

    #[test]
    fn test_attack_cycle_mixes_staggered_patterns() {
        let mut f = fight();
        f.time_ticks = 100;
        f.start_attack_cycle();
        let pending = f.pending_actions();
        assert!((2..=4).contains(&pending));
        assert_eq!(f.schedule.drain_due(100).len(), 1);
        assert_eq!(f.schedule.drain_due(112).len(), 1);
    }

    #[test]
    fn test_actions_after_end_are_noops() {
        let mut f = fight();
        f.damage_boss(5000.0);
        f.run_action(BossAction::Pattern(AttackPattern::Nova));
        f.run_action(BossAction::HomingShot);
        assert!(f.projectiles.is_empty());
        assert!(f.beams.is_empty());
    }
}
