//! Boss encounter state
//!
//! One `BossFight` value owns everything the encounter touches. Front-ends
//! drive it with [`BossFight::tick`] and read it back through
//! [`BossFight::view`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::patterns::BossAction;
use super::weapons::{WeaponMode, weapon_cycler};
use crate::error::ActivationError;
use crate::sim::{
    Beam, Bounds, Cooldown, GameEvent, HealAbility, Health, ModeCycler, MoveKeys, Outcome,
    Particles, Projectile, Schedule,
};
use crate::tuning::BossTuning;

/// Input snapshot for one tick
#[derive(Debug, Clone, Copy, Default)]
pub struct BossInput {
    pub movement: MoveKeys,
    /// Aim point in arena coordinates
    pub pointer: Vec2,
    /// Trigger pulled this tick (click)
    pub fire: bool,
    /// Trigger held down
    pub fire_held: bool,
    /// Heal key pressed this tick
    pub heal: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub health: Health,
    pub heal: HealAbility,
    pub shoot_cooldown: Cooldown,
    pub weapons: ModeCycler<WeaponMode>,
    /// Last pointer position (ray gun end point)
    pub aim: Vec2,
}

/// Straight-line charge toward where the player stood when it began
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dash {
    pub vel: Vec2,
    pub remaining: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Boss {
    pub pos: Vec2,
    pub radius: f32,
    pub vel: Vec2,
    pub health: Health,
    /// Ticks since the last attack cycle
    pub attack_timer: u32,
    /// Eyestalk rotation (radians), advances every tick
    pub rotation: f32,
    pub dash: Option<Dash>,
}

impl Boss {
    /// Region the boss body is kept inside: `(min, max)`
    pub fn movement_band(&self, bounds: &Bounds) -> (Vec2, Vec2) {
        let min = Vec2::new(self.radius + 150.0, self.radius + 100.0);
        let max = Vec2::new(bounds.width() - self.radius - 150.0, bounds.height() / 2.0);
        (min, max.max(min))
    }

    /// Base of eyestalk `index` (of ten)
    pub fn stalk_tip(&self, index: u32) -> Vec2 {
        let angle = std::f32::consts::TAU / 10.0 * index as f32 + self.rotation * 0.3;
        self.pos + crate::polar_to_cartesian(self.radius + 40.0, angle)
    }
}

/// Complete encounter state (deterministic for a given seed and inputs)
#[derive(Debug, Clone)]
pub struct BossFight {
    pub tuning: BossTuning,
    pub bounds: Bounds,
    pub seed: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub outcome: Outcome,
    pub player: Player,
    pub boss: Boss,
    pub projectiles: Vec<Projectile>,
    pub beams: Vec<Beam>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Particles,
    pub(crate) schedule: Schedule<BossAction>,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
    next_id: u32,
}

/// Read-only snapshot for renderers
#[derive(Debug, Serialize)]
pub struct BossView<'a> {
    pub time_ticks: u64,
    pub outcome: Outcome,
    pub player: &'a Player,
    pub boss: &'a Boss,
    pub player_health: f32,
    pub boss_health: f32,
    pub active_mode: Option<WeaponMode>,
    pub heal_glow: bool,
    /// Player ray gun segment while that mode is active
    pub ray: Option<(Vec2, Vec2)>,
    pub projectiles: &'a [Projectile],
    pub beams: &'a [Beam],
    pub particles: &'a Particles,
}

impl BossFight {
    pub fn new(seed: u64, tuning: BossTuning) -> Self {
        let bounds = Bounds::new(tuning.arena_width, tuning.arena_height);
        let mut rng = Pcg32::seed_from_u64(seed);

        let mut weapons = weapon_cycler();
        let first = weapons.activate_random(&mut rng);

        let player = Player {
            pos: bounds.center(),
            radius: tuning.player_radius,
            speed: tuning.player_speed,
            health: Health::new(tuning.player_health),
            heal: HealAbility::new(tuning.heal_amount, tuning.heal_cooldown, tuning.heal_duration),
            shoot_cooldown: Cooldown::new(0.0),
            weapons,
            aim: bounds.center(),
        };
        let boss = Boss {
            pos: Vec2::new(bounds.width() / 2.0, bounds.height() / 4.0),
            radius: tuning.boss_radius,
            vel: tuning.boss_velocity,
            health: Health::new(tuning.boss_health),
            attack_timer: 0,
            rotation: 0.0,
            dash: None,
        };

        let mut fight = Self {
            tuning,
            bounds,
            seed,
            time_ticks: 0,
            outcome: Outcome::Running,
            player,
            boss,
            projectiles: Vec::new(),
            beams: Vec::new(),
            particles: Particles::default(),
            schedule: Schedule::new(),
            rng,
            events: Vec::new(),
            next_id: 1,
        };
        if let Some(mode) = first {
            fight.events.push(GameEvent::ModeActivated { name: mode.name() });
        }
        log::info!("Boss fight started (seed {seed})");
        fight
    }

    /// Start over with the same seed and tuning
    pub fn restart(&mut self) {
        *self = Self::new(self.seed, self.tuning.clone());
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_over()
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a projectile, assigning it an ID
    pub fn spawn(&mut self, mut projectile: Projectile) {
        projectile.id = self.next_entity_id();
        self.projectiles.push(projectile);
    }

    /// Take all pending UI notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of deferred actions still queued
    pub fn pending_actions(&self) -> usize {
        self.schedule.len()
    }

    /// Use the heal ability now
    pub fn activate_heal(&mut self) -> Result<f32, ActivationError> {
        if self.is_over() {
            return Err(ActivationError::EncounterOver);
        }
        let gained = self.player.heal.activate(&mut self.player.health)?;
        self.particles.burst(self.player.pos, 0x00ff00, 40);
        self.events.push(GameEvent::HealUsed { gained });
        self.push_player_health();
        Ok(gained)
    }

    /// Force a weapon mode, ending the current one without cooldown
    pub fn activate_weapon(&mut self, mode: WeaponMode) -> Result<(), ActivationError> {
        if self.is_over() {
            return Err(ActivationError::EncounterOver);
        }
        self.player.weapons.activate(mode)?;
        self.particles.burst(self.player.pos, mode.color(), 20);
        self.events.push(GameEvent::ModeActivated { name: mode.name() });
        Ok(())
    }

    /// Damage the boss; victory fires on the hit that empties its health
    pub fn damage_boss(&mut self, amount: f32) {
        if self.is_over() {
            return;
        }
        let depleted = self.boss.health.damage(amount);
        self.events.push(GameEvent::BossHealth {
            current: self.boss.health.current(),
            max: self.boss.health.max(),
        });
        if depleted {
            self.end(Outcome::Victory);
        }
    }

    /// Damage the player; defeat fires on the hit that empties their health
    pub fn damage_player(&mut self, amount: f32) {
        if self.is_over() {
            return;
        }
        let depleted = self.player.health.damage(amount);
        self.push_player_health();
        if depleted {
            self.end(Outcome::Defeat);
        }
    }

    pub(crate) fn push_player_health(&mut self) {
        self.events.push(GameEvent::PlayerHealth {
            current: self.player.health.current(),
            max: self.player.health.max(),
        });
    }

    /// Leave `Running` exactly once, cancelling everything still scheduled
    pub(crate) fn end(&mut self, outcome: Outcome) {
        if self.is_over() || !outcome.is_over() {
            return;
        }
        self.outcome = outcome;
        self.schedule.clear();
        self.boss.dash = None;
        self.events.push(GameEvent::Ended { outcome });
        log::info!(
            "Boss fight over at tick {}: {:?} (player {:.0}/{:.0}, boss {:.0}/{:.0})",
            self.time_ticks,
            outcome,
            self.player.health.current(),
            self.player.health.max(),
            self.boss.health.current(),
            self.boss.health.max()
        );
    }

    /// Player ray gun segment, when that mode is active
    pub fn ray(&self) -> Option<(Vec2, Vec2)> {
        (self.player.weapons.active() == Some(WeaponMode::RayGun))
            .then_some((self.player.pos, self.player.aim))
    }

    pub fn view(&self) -> BossView<'_> {
        BossView {
            time_ticks: self.time_ticks,
            outcome: self.outcome,
            player: &self.player,
            boss: &self.boss,
            player_health: self.player.health.ratio(),
            boss_health: self.boss.health.ratio(),
            active_mode: self.player.weapons.active(),
            heal_glow: self.player.heal.is_glowing(),
            ray: self.ray(),
            projectiles: &self.projectiles,
            beams: &self.beams,
            particles: &self.particles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fight() -> BossFight {
        BossFight::new(42, BossTuning::default())
    }

    #[test]
    fn test_new_fight_layout() {
        let f = fight();
        assert_eq!(f.player.pos, Vec2::new(640.0, 360.0));
        assert_eq!(f.boss.pos, Vec2::new(640.0, 180.0));
        assert_eq!(f.boss.health.current(), 1200.0);
        assert!(f.player.weapons.active().is_some());
        assert_eq!(f.outcome(), Outcome::Running);
    }

    #[test]
    fn test_boss_damage_then_victory_once() {
        let mut f = fight();
        for _ in 0..3 {
            f.damage_boss(40.0);
        }
        assert_eq!(f.boss.health.current(), 1080.0);
        assert!(!f.is_over());

        f.schedule.push_at(f.time_ticks + 5, BossAction::Pattern(crate::boss_fight::AttackPattern::Nova));
        f.drain_events();
        f.damage_boss(1200.0);
        assert_eq!(f.boss.health.current(), 0.0);
        assert_eq!(f.outcome(), Outcome::Victory);
        assert_eq!(f.pending_actions(), 0);

        f.damage_boss(10.0);
        f.damage_player(500.0);
        let ended = f
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Ended { .. }))
            .count();
        assert_eq!(ended, 1);
        assert_eq!(f.outcome(), Outcome::Victory);
        assert_eq!(f.player.health.current(), 200.0);
    }

    #[test]
    fn test_heal_at_full_health_is_noop() {
        let mut f = fight();
        assert_eq!(f.activate_heal(), Err(ActivationError::AtFullHealth));
        assert_eq!(f.player.health.current(), 200.0);
        assert!(f.player.heal.cooldown.ready());
    }

    #[test]
    fn test_heal_then_cooldown() {
        let mut f = fight();
        f.damage_player(120.0);
        assert_eq!(f.activate_heal(), Ok(80.0));
        assert_eq!(f.player.health.current(), 160.0);
        assert!(matches!(f.activate_heal(), Err(ActivationError::OnCooldown { .. })));
        assert_eq!(f.player.health.current(), 160.0);
    }

    #[test]
    fn test_actions_rejected_after_end() {
        let mut f = fight();
        f.damage_player(1000.0);
        assert_eq!(f.outcome(), Outcome::Defeat);
        assert_eq!(f.activate_heal(), Err(ActivationError::EncounterOver));
        assert_eq!(f.activate_weapon(WeaponMode::Minigun), Err(ActivationError::EncounterOver));
    }

    #[test]
    fn test_view_serializes() {
        let f = fight();
        let json = serde_json::to_value(f.view()).unwrap();
        assert_eq!(json["outcome"], "Running");
        assert_eq!(json["boss_health"], 1.0);
    }

    #[test]
    fn test_restart_resets() {
        let mut f = fight();
        f.damage_boss(1500.0);
        f.restart();
        assert_eq!(f.outcome(), Outcome::Running);
        assert_eq!(f.boss.health.current(), 1200.0);
    }
}
