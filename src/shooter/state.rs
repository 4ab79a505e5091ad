//! Wave shooter state

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boosts::{BoostKind, Boosts};
use super::enemy::{Enemy, EnemyKind};
use super::wave::WaveDirector;
use crate::sim::{Bounds, GameEvent, Health, MoveKeys, Outcome, Particles, Projectile};
use crate::tuning::ShooterTuning;

/// Input snapshot for one tick. Firing is automatic.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShooterInput {
    pub movement: MoveKeys,
}

#[derive(Debug, Clone, Serialize)]
pub struct Ship {
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub health: Health,
    pub lives: u32,
    pub score: u64,
    /// Seconds until the next auto-fire volley
    pub shoot_timer: f32,
    pub boosts: Boosts,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PickupKind {
    Heal(f32),
    Life(u32),
    Boost(BoostKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub kind: PickupKind,
}

impl Pickup {
    pub fn new(pos: Vec2, kind: PickupKind) -> Self {
        let radius = match kind {
            PickupKind::Heal(_) => 10.0,
            PickupKind::Life(_) => 12.0,
            PickupKind::Boost(_) => 11.0,
        };
        Self {
            id: 0,
            pos,
            radius,
            kind,
        }
    }
}

/// Complete run state (deterministic for a given seed and inputs)
#[derive(Debug, Clone)]
pub struct ShooterGame {
    pub tuning: ShooterTuning,
    pub bounds: Bounds,
    pub seed: u64,
    pub start_wave: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub outcome: Outcome,
    pub ship: Ship,
    pub enemies: Vec<Enemy>,
    /// Shots from both sides, told apart by `owner`
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    pub director: WaveDirector,
    /// Seconds until the next ambient pickup
    pub pickup_timer: f32,
    /// Visual particles (not gameplay-affecting)
    pub particles: Particles,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
    next_id: u32,
}

/// Read-only snapshot for renderers
#[derive(Debug, Serialize)]
pub struct ShooterView<'a> {
    pub time_ticks: u64,
    pub outcome: Outcome,
    pub wave: u32,
    pub banner: Option<&'a str>,
    pub ship: &'a Ship,
    pub health: f32,
    pub enemies: &'a [Enemy],
    pub projectiles: &'a [Projectile],
    pub pickups: &'a [Pickup],
    pub particles: &'a Particles,
}

impl ShooterGame {
    pub fn new(seed: u64, start_wave: u32, tuning: ShooterTuning) -> Self {
        let bounds = Bounds::new(tuning.arena_width, tuning.arena_height);
        let mut rng = Pcg32::seed_from_u64(seed);
        let pickup_timer = 8.0 + rng.random::<f32>() * 6.0;

        let ship = Ship {
            pos: Self::respawn_point(&bounds, &tuning),
            radius: tuning.player_radius,
            speed: tuning.player_speed,
            health: Health::new(tuning.player_health),
            lives: tuning.lives,
            score: 0,
            shoot_timer: 0.0,
            boosts: Boosts::default(),
        };
        let director = WaveDirector::new(start_wave, &tuning);
        log::info!("Shooter run started (seed {seed}, wave {})", director.wave);

        Self {
            tuning,
            bounds,
            seed,
            start_wave: director.wave,
            time_ticks: 0,
            outcome: Outcome::Running,
            ship,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            director,
            pickup_timer,
            particles: Particles::default(),
            rng,
            events: Vec::new(),
            next_id: 1,
        }
    }

    fn respawn_point(bounds: &Bounds, tuning: &ShooterTuning) -> Vec2 {
        Vec2::new(bounds.width() / 2.0, bounds.height() - tuning.respawn_offset)
    }

    /// Start over with the same seed, starting wave and tuning
    pub fn restart(&mut self) {
        *self = Self::new(self.seed, self.start_wave, self.tuning.clone());
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_over()
    }

    pub fn wave(&self) -> u32 {
        self.director.wave
    }

    pub fn score(&self) -> u64 {
        self.ship.score
    }

    pub fn lives(&self) -> u32 {
        self.ship.lives
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

    /// Add an enemy, assigning it an ID
    pub fn add_enemy(&mut self, mut enemy: Enemy) {
        enemy.id = self.next_entity_id();
        self.enemies.push(enemy);
    }

    pub fn add_pickup(&mut self, mut pickup: Pickup) {
        pickup.id = self.next_entity_id();
        self.pickups.push(pickup);
    }

    /// Take all pending UI notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn `kind` just outside a random arena edge, scaled for the
    /// current wave
    pub fn spawn_at_edge(&mut self, kind: EnemyKind) {
        const MARGIN: f32 = 36.0;
        let w = self.bounds.width();
        let h = self.bounds.height();
        let across_x = MARGIN + self.rng.random::<f32>() * (w - MARGIN * 2.0);
        let across_y = MARGIN + self.rng.random::<f32>() * (h - MARGIN * 2.0);
        let pos = match self.rng.random_range(0..4) {
            0 => Vec2::new(across_x, -MARGIN),
            1 => Vec2::new(w + MARGIN, across_y),
            2 => Vec2::new(across_x, h + MARGIN),
            _ => Vec2::new(-MARGIN, across_y),
        };

        let wave = self.director.wave;
        let scale = WaveDirector::hp_scale(wave, &self.tuning);
        let enemy = Enemy::new(kind, pos, scale, wave, &mut self.rng);
        if let EnemyKind::Boss(boss) = kind {
            log::info!("Wave {wave}: {} boss spawned", boss.name());
            self.events.push(GameEvent::BossSpawned { kind: boss.name() });
        }
        self.add_enemy(enemy);
    }

    /// Drop an ambient pickup somewhere inside the arena
    pub fn spawn_ambient_pickup(&mut self) {
        const MARGIN: f32 = 40.0;
        let pos = Vec2::new(
            MARGIN + self.rng.random::<f32>() * (self.bounds.width() - MARGIN * 2.0),
            MARGIN + self.rng.random::<f32>() * (self.bounds.height() - MARGIN * 2.0),
        );
        let roll = self.rng.random::<f32>();
        let kind = if roll < 0.08 {
            PickupKind::Life(1)
        } else if roll < 0.45 {
            PickupKind::Heal(self.tuning.heal_pickup_amount)
        } else {
            PickupKind::Boost(BoostKind::ALL[self.rng.random_range(0..BoostKind::ALL.len())])
        };
        self.add_pickup(Pickup::new(pos, kind));
    }

    /// Damage the ship after shields. Emptying its health costs a life;
    /// losing the last one ends the run.
    pub fn damage_ship(&mut self, amount: f32) {
        if self.is_over() {
            return;
        }
        let amount = self.ship.boosts.shielded(amount);
        let depleted = self.ship.health.damage(amount);
        if depleted {
            self.ship.lives = self.ship.lives.saturating_sub(1);
            self.events.push(GameEvent::LivesChanged {
                lives: self.ship.lives,
            });
            log::debug!("Life lost, {} left", self.ship.lives);
            if self.ship.lives == 0 {
                self.push_ship_health();
                self.end(Outcome::Defeat);
                return;
            }
            self.ship.health.refill();
            self.ship.pos = Self::respawn_point(&self.bounds, &self.tuning);
        }
        self.push_ship_health();
    }

    /// Apply a pickup's effect to the ship
    pub fn collect(&mut self, pickup: Pickup) {
        match pickup.kind {
            PickupKind::Heal(amount) => {
                self.ship.health.heal(amount);
                self.push_ship_health();
            }
            PickupKind::Life(n) => {
                self.ship.lives += n;
                self.events.push(GameEvent::LivesChanged {
                    lives: self.ship.lives,
                });
            }
            PickupKind::Boost(kind) => {
                let stacks = self.ship.boosts.add(
                    kind,
                    self.tuning.boost_duration,
                    self.tuning.max_boost_stacks,
                );
                self.events.push(GameEvent::BoostCollected {
                    name: kind.name(),
                    stacks,
                });
            }
        }
    }

    pub(crate) fn push_ship_health(&mut self) {
        self.events.push(GameEvent::PlayerHealth {
            current: self.ship.health.current(),
            max: self.ship.health.max(),
        });
    }

    /// Leave `Running` exactly once, dropping any spawns still queued
    pub(crate) fn end(&mut self, outcome: Outcome) {
        if self.is_over() || !outcome.is_over() {
            return;
        }
        self.outcome = outcome;
        self.director.queue.clear();
        self.events.push(GameEvent::Ended { outcome });
        log::info!(
            "Shooter run over at tick {}: {:?} (wave {}, score {})",
            self.time_ticks,
            outcome,
            self.director.wave,
            self.ship.score
        );
    }

    pub fn view(&self) -> ShooterView<'_> {
        ShooterView {
            time_ticks: self.time_ticks,
            outcome: self.outcome,
            wave: self.director.wave,
            banner: self.director.banner(),
            ship: &self.ship,
            health: self.ship.health.ratio(),
            enemies: &self.enemies,
            projectiles: &self.projectiles,
            pickups: &self.pickups,
            particles: &self.particles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> ShooterGame {
        ShooterGame::new(7, 1, ShooterTuning::default())
    }

    #[test]
    fn test_new_run_layout() {
        let g = game();
        assert_eq!(g.ship.pos, Vec2::new(480.0, 592.0));
        assert_eq!(g.lives(), 3);
        assert_eq!(g.wave(), 1);
        assert!((8.0..14.0).contains(&g.pickup_timer));
        assert_eq!(g.outcome(), Outcome::Running);
    }

    #[test]
    fn test_start_wave_is_selectable() {
        let g = ShooterGame::new(7, 12, ShooterTuning::default());
        assert_eq!(g.wave(), 12);
        let g = ShooterGame::new(7, 0, ShooterTuning::default());
        assert_eq!(g.wave(), 1);
    }

    #[test]
    fn test_edge_spawn_outside_arena() {
        let mut g = game();
        for _ in 0..20 {
            g.spawn_at_edge(EnemyKind::Tank);
        }
        assert!(g.enemies.iter().all(|e| !g.bounds.contains_with_margin(e.pos, 0.0)));
        assert!(g.enemies.iter().all(|e| g.bounds.contains_with_margin(e.pos, 37.0)));
        let mut ids: Vec<u32> = g.enemies.iter().map(|e| e.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn test_losing_health_costs_a_life() {
        let mut g = game();
        g.ship.pos = Vec2::new(100.0, 100.0);
        g.damage_ship(60.0);
        assert_eq!(g.ship.health.current(), 40.0);
        g.damage_ship(60.0);
        assert_eq!(g.lives(), 2);
        assert_eq!(g.ship.health.current(), 100.0);
        assert_eq!(g.ship.pos, Vec2::new(480.0, 592.0));
        assert!(g.drain_events().contains(&GameEvent::LivesChanged { lives: 2 }));
    }

    #[test]
    fn test_last_life_ends_run_once() {
        let mut g = game();
        for _ in 0..3 {
            g.damage_ship(1000.0);
        }
        assert_eq!(g.outcome(), Outcome::Defeat);
        assert_eq!(g.lives(), 0);
        g.damage_ship(1000.0);
        let ended = g
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Ended { .. }))
            .count();
        assert_eq!(ended, 1);
    }

    #[test]
    fn test_shield_reduces_damage() {
        let mut g = game();
        g.collect(Pickup::new(Vec2::ZERO, PickupKind::Boost(BoostKind::Shield)));
        g.damage_ship(8.0);
        assert_eq!(g.ship.health.current(), 96.0);
    }

    #[test]
    fn test_pickups_apply() {
        let mut g = game();
        g.damage_ship(50.0);
        g.collect(Pickup::new(Vec2::ZERO, PickupKind::Heal(30.0)));
        assert_eq!(g.ship.health.current(), 80.0);
        g.collect(Pickup::new(Vec2::ZERO, PickupKind::Heal(30.0)));
        assert_eq!(g.ship.health.current(), 100.0);
        g.collect(Pickup::new(Vec2::ZERO, PickupKind::Life(1)));
        assert_eq!(g.lives(), 4);
        for _ in 0..6 {
            g.collect(Pickup::new(Vec2::ZERO, PickupKind::Boost(BoostKind::MultiShot)));
        }
        assert_eq!(g.ship.boosts.stacks(BoostKind::MultiShot), 4);
    }

    #[test]
    fn test_ambient_pickups_inside_arena() {
        let mut g = game();
        for _ in 0..50 {
            g.spawn_ambient_pickup();
        }
        assert!(g.pickups.iter().all(|p| g.bounds.contains_with_margin(p.pos, -39.0)));
    }

    #[test]
    fn test_view_serializes() {
        let mut g = game();
        g.collect(Pickup::new(Vec2::ZERO, PickupKind::Boost(BoostKind::Pierce)));
        let json = serde_json::to_value(g.view()).unwrap();
        assert_eq!(json["wave"], 1);
        assert_eq!(json["ship"]["lives"], 3);
        assert!(json["ship"]["boosts"]["Pierce"].is_array());
    }
}
