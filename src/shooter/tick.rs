//! Fixed timestep shooter tick
//!
//! One call advances the run by one 60 Hz frame of `SIM_DT` seconds. All
//! speeds here are pixels per second.

use glam::Vec2;
use rand::Rng;

use super::enemy::{Attack, Enemy, EnemyKind};
use super::state::{Pickup, PickupKind, ShooterGame, ShooterInput};
use super::wave::{WaveDirector, WaveSignal};
use crate::consts::SIM_DT;
use crate::sim::{GameEvent, Owner, StepContext, StepOutcome, circles_overlap};
use crate::angle_to;

impl ShooterGame {
    /// Advance the run by one tick
    pub fn tick(&mut self, input: &ShooterInput) {
        if self.is_over() {
            return;
        }
        self.time_ticks += 1;
        let dt = SIM_DT;

        self.move_ship(input, dt);
        self.run_waves(dt);

        self.pickup_timer -= dt;
        if self.pickup_timer <= 0.0 {
            self.spawn_ambient_pickup();
            self.pickup_timer = 8.0 + self.rng.random::<f32>() * 10.0;
        }

        self.ship.boosts.tick(dt);
        self.auto_fire(dt);
        self.update_enemies(dt);
        self.update_projectiles(dt);

        self.resolve_player_shots();
        self.resolve_enemy_shots();
        self.resolve_contacts();
        self.collect_pickups();

        self.particles.tick();
    }

    fn move_ship(&mut self, input: &ShooterInput, dt: f32) {
        let ship = &mut self.ship;
        ship.pos += input.movement.direction() * ship.speed * dt;
        ship.pos = self.bounds.clamp_circle(ship.pos, ship.radius + 4.0);
    }

    fn run_waves(&mut self, dt: f32) {
        let wave = self.director.wave;
        let live = self.enemies.iter().filter(|e| e.wave == wave).count();
        let signals = self.director.tick(dt, live, &mut self.rng, &self.tuning);

        for signal in signals {
            match signal {
                WaveSignal::Banner(text) => self.events.push(GameEvent::Banner { text }),
                WaveSignal::Started(wave) => self.events.push(GameEvent::WaveStarted { wave }),
                WaveSignal::Spawn(kind) => self.spawn_at_edge(kind),
                WaveSignal::Cleared(wave) => {
                    self.particles.burst(self.ship.pos, 0x7fe7a3, 30);
                    self.events.push(GameEvent::WaveCleared { wave });
                }
            }
        }
    }

    /// Fire at the nearest enemy, or straight up when there is none
    fn auto_fire(&mut self, dt: f32) {
        self.ship.shoot_timer -= dt;
        if self.ship.shoot_timer > 0.0 {
            return;
        }
        self.ship.shoot_timer = self.ship.boosts.fire_interval(&self.tuning);

        let origin = self.ship.pos;
        let aim = self
            .enemies
            .iter()
            .min_by(|a, b| {
                a.pos
                    .distance_squared(origin)
                    .total_cmp(&b.pos.distance_squared(origin))
            })
            .map_or(-std::f32::consts::FRAC_PI_2, |nearest| angle_to(origin, nearest.pos));

        for shot in self.ship.boosts.volley(origin, aim, &self.tuning) {
            self.spawn(shot);
        }
    }

    fn update_enemies(&mut self, dt: f32) {
        let target = self.ship.pos;
        let mut shots = Vec::new();
        let mut summons = Vec::new();

        for enemy in &mut self.enemies {
            enemy.chase(target, dt);
            if enemy.regenerate(dt, &self.tuning) {
                self.events.push(GameEvent::BossHealth {
                    current: enemy.health.current(),
                    max: enemy.health.max(),
                });
            }
            match enemy.update_weapon(dt, target, &mut self.rng, &self.tuning) {
                Attack::Hold => {}
                Attack::Shots(fired) => shots.extend(fired),
                Attack::Summon { kind, at } => summons.push((kind, at, enemy.wave)),
            }
        }

        let bounds = self.bounds;
        let margin = self.tuning.enemy_despawn_margin;
        self.enemies.retain(|e| bounds.contains_with_margin(e.pos, margin));

        for shot in shots {
            self.spawn(shot);
        }
        // Minions count toward their summoner's wave at base stats
        for (kind, at, wave) in summons {
            let minion = Enemy::new(kind, at, 1.0, wave, &mut self.rng);
            self.particles.burst(at, kind.color(), 8);
            self.add_enemy(minion);
        }
    }

    fn update_projectiles(&mut self, dt: f32) {
        let shots = std::mem::take(&mut self.projectiles);
        let mut kept = Vec::with_capacity(shots.len());
        let mut spawned = Vec::new();

        for mut shot in shots {
            let ctx = StepContext {
                dt,
                bounds: self.bounds,
                margin: match shot.owner {
                    Owner::Player => self.tuning.player_bullet_margin,
                    Owner::Enemy => self.tuning.enemy_bullet_margin,
                },
                orbit_center: self.ship.pos,
                target: None,
            };
            match shot.advance(&ctx) {
                StepOutcome::Alive => kept.push(shot),
                StepOutcome::Expired => {}
                StepOutcome::Split => spawned.extend(shot.split_children()),
            }
        }

        self.projectiles = kept;
        for shot in spawned {
            self.spawn(shot);
        }
    }

    /// Each enemy takes at most one player shot per tick
    fn resolve_player_shots(&mut self) {
        let mut shots = std::mem::take(&mut self.projectiles);
        let mut shards = Vec::new();
        let mut killed = Vec::new();

        for (index, enemy) in self.enemies.iter_mut().enumerate() {
            let Some(hit) = shots.iter().position(|p| {
                p.owner == Owner::Player && circles_overlap(p.pos, p.radius, enemy.pos, enemy.radius)
            }) else {
                continue;
            };
            let shot = &mut shots[hit];
            shards.extend(shot.explosion_shards(enemy.pos));
            let depleted = enemy.health.damage(shot.damage);
            if !shot.register_hit() {
                shots.remove(hit);
            }
            if enemy.kind.is_boss() {
                self.events.push(GameEvent::BossHealth {
                    current: enemy.health.current(),
                    max: enemy.health.max(),
                });
            }
            if depleted {
                killed.push(index);
            }
        }
        self.projectiles = shots;

        let mut dead = Vec::with_capacity(killed.len());
        for &index in killed.iter().rev() {
            dead.push(self.enemies.remove(index));
        }
        for enemy in dead.into_iter().rev() {
            self.on_kill(enemy);
        }
        for shard in shards {
            self.spawn(shard);
        }
    }

    fn on_kill(&mut self, enemy: Enemy) {
        self.particles.burst(enemy.pos, enemy.kind.color(), 16);

        if let EnemyKind::Boss(boss) = enemy.kind {
            self.ship.score += 100;
            let offset = Vec2::new(15.0, 0.0);
            self.add_pickup(Pickup::new(enemy.pos - offset, PickupKind::Life(1)));
            self.add_pickup(Pickup::new(
                enemy.pos + offset,
                PickupKind::Heal(self.tuning.boss_heal_drop),
            ));
            log::info!("Wave {}: {} boss defeated", enemy.wave, boss.name());
        } else {
            self.ship.score += 10;
            let chance = WaveDirector::drop_chance(self.director.wave, &self.tuning);
            if self.rng.random::<f32>() < chance {
                let kind = match enemy.kind.drop_boost() {
                    Some(boost) => PickupKind::Boost(boost),
                    None => PickupKind::Heal(self.tuning.heal_pickup_amount),
                };
                self.add_pickup(Pickup::new(enemy.pos, kind));
            }
        }
        self.events.push(GameEvent::ScoreChanged {
            score: self.ship.score,
        });
    }

    fn resolve_enemy_shots(&mut self) {
        let (pos, radius) = (self.ship.pos, self.ship.radius);
        let mut hits = Vec::new();
        self.projectiles.retain(|p| {
            let hit = p.owner == Owner::Enemy && circles_overlap(p.pos, p.radius, pos, radius);
            if hit {
                hits.push(p.damage);
            }
            !hit
        });
        for damage in hits {
            self.particles.burst(self.ship.pos, 0xff4444, 6);
            self.damage_ship(damage);
        }
    }

    /// Touching an enemy consumes it and hurts the ship
    fn resolve_contacts(&mut self) {
        let (pos, radius) = (self.ship.pos, self.ship.radius);
        let mut hits = Vec::new();
        self.enemies.retain(|e| {
            let hit = circles_overlap(e.pos, e.radius, pos, radius);
            if hit {
                hits.push((e.pos, e.kind.color(), (e.radius / 2.0).floor().max(4.0)));
            }
            !hit
        });
        for (at, color, damage) in hits {
            self.particles.burst(at, color, 12);
            self.damage_ship(damage);
        }
    }

    fn collect_pickups(&mut self) {
        let (pos, radius) = (self.ship.pos, self.ship.radius);
        let mut taken = Vec::new();
        self.pickups.retain(|p| {
            let hit = circles_overlap(p.pos, p.radius, pos, radius);
            if hit {
                taken.push(*p);
            }
            !hit
        });
        for pickup in taken {
            self.collect(pickup);
        }
    }
}
