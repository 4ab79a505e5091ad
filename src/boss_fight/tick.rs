//! Fixed timestep boss fight tick
//!
//! One call advances the encounter by one 60 Hz frame. All durations here
//! are in ticks and all speeds in pixels per tick.

use glam::Vec2;

use super::state::{BossFight, BossInput};
use super::weapons::{self, WeaponMode};
use crate::angle_to;
use crate::sim::{GameEvent, Owner, StepContext, StepOutcome, circles_overlap, segment_hits_circle};

impl BossFight {
    /// Advance the encounter by one tick
    pub fn tick(&mut self, input: &BossInput) {
        if self.is_over() {
            return;
        }
        self.time_ticks += 1;

        for action in self.schedule.drain_due(self.time_ticks) {
            self.run_action(action);
        }

        self.regenerate();
        if input.heal {
            if let Err(err) = self.activate_heal() {
                log::debug!("Heal rejected: {err}");
            }
        }

        self.move_player(input);
        self.advance_timers();
        self.handle_fire(input);

        self.move_boss();
        self.boss.rotation += 0.03;
        self.boss.attack_timer += 1;
        if self.boss.attack_timer >= self.tuning.attack_interval {
            self.boss.attack_timer = 0;
            self.start_attack_cycle();
        }

        self.update_beams();
        self.update_projectiles();
        self.update_ray_gun();

        self.particles.tick();
    }

    fn regenerate(&mut self) {
        if self.time_ticks % self.tuning.regen_interval != 0 {
            return;
        }
        if self.player.health.heal(self.tuning.regen_amount) > 0.0 {
            self.particles.burst(self.player.pos, 0x00ff00, 20);
            self.push_player_health();
        }
    }

    fn move_player(&mut self, input: &BossInput) {
        let player = &mut self.player;
        player.pos += input.movement.direction() * player.speed;
        player.pos = self.bounds.clamp_circle(player.pos, player.radius);
        player.aim = input.pointer;
    }

    fn advance_timers(&mut self) {
        self.player.shoot_cooldown.tick(1.0);
        self.player.heal.tick(1.0);

        let transition = self.player.weapons.tick(1.0, &mut self.rng);
        if let Some(expired) = transition.expired {
            self.particles.burst(self.player.pos, 0xffffff, 10);
            self.events.push(GameEvent::ModeExpired { name: expired.name() });
        }
        if let Some(activated) = transition.activated {
            self.particles.burst(self.player.pos, activated.color(), 20);
            self.events.push(GameEvent::ModeActivated { name: activated.name() });
        }
    }

    fn handle_fire(&mut self, input: &BossInput) {
        let mode = self.player.weapons.active();
        let held = input.fire_held && mode.is_some_and(WeaponMode::repeats_while_held);
        if !(input.fire || held) || !self.player.shoot_cooldown.ready() {
            return;
        }

        let aim = angle_to(self.player.pos, input.pointer);
        let volley = weapons::fire(mode, self.player.pos, aim, &self.tuning);
        self.player.shoot_cooldown.restart_with(volley.cooldown);
        let (color, count) = volley.flash;
        self.particles.burst(self.player.pos, color, count);
        for shot in volley.shots {
            self.spawn(shot);
        }
    }

    /// Bounce inside the movement band, or carry on a dash
    fn move_boss(&mut self) {
        let (min, max) = self.boss.movement_band(&self.bounds);
        let boss = &mut self.boss;

        match boss.dash.as_mut() {
            Some(dash) => {
                boss.pos += dash.vel;
                dash.remaining = dash.remaining.saturating_sub(1);
                let finished = dash.remaining == 0;
                self.particles.burst(boss.pos, 0xff00ff, 5);
                if finished {
                    boss.dash = None;
                }
            }
            None => boss.pos += boss.vel,
        }

        // Flip only while heading outward, so one contact flips once
        let mut hit_edge = false;
        if (boss.pos.x <= min.x && boss.vel.x < 0.0) || (boss.pos.x >= max.x && boss.vel.x > 0.0) {
            boss.vel.x = -boss.vel.x;
            hit_edge = true;
        }
        if (boss.pos.y <= min.y && boss.vel.y < 0.0) || (boss.pos.y >= max.y && boss.vel.y > 0.0) {
            boss.vel.y = -boss.vel.y;
            hit_edge = true;
        }
        let outside = boss.pos.x <= min.x || boss.pos.x >= max.x || boss.pos.y <= min.y || boss.pos.y >= max.y;
        if boss.dash.is_some() && (hit_edge || outside) {
            boss.dash = None;
        }

        if self.boss.dash.is_some()
            && circles_overlap(self.boss.pos, self.boss.radius, self.player.pos, self.player.radius)
        {
            self.boss.dash = None;
            self.particles.burst(self.player.pos, 0xff0000, 20);
            self.damage_player(self.tuning.dash_damage);
        }
    }

    fn update_beams(&mut self) {
        let mut beams = std::mem::take(&mut self.beams);
        beams.retain_mut(|beam| {
            let alive = beam.tick();
            if let Some(contact) = beam.hits(self.player.pos, self.player.radius) {
                self.particles.burst(contact, 0xff4444, 3);
                self.damage_player(beam.damage_per_tick);
            }
            alive
        });
        self.beams = beams;
    }

    fn update_projectiles(&mut self) {
        let shots = std::mem::take(&mut self.projectiles);
        let mut kept = Vec::with_capacity(shots.len());
        let mut spawned = Vec::new();

        for mut shot in shots {
            let ctx = StepContext {
                dt: 1.0,
                bounds: self.bounds,
                margin: self.tuning.offscreen_margin,
                orbit_center: self.player.pos,
                target: (shot.owner == Owner::Enemy).then_some(self.player.pos),
            };
            match shot.advance(&ctx) {
                StepOutcome::Alive => {}
                StepOutcome::Expired => continue,
                StepOutcome::Split => {
                    spawned.extend(shot.split_children());
                    continue;
                }
            }
            let (target_pos, target_radius) = match shot.owner {
                Owner::Player => (self.boss.pos, self.boss.radius),
                Owner::Enemy => (self.player.pos, self.player.radius),
            };
            if !circles_overlap(shot.pos, shot.radius, target_pos, target_radius) {
                kept.push(shot);
                continue;
            }

            match shot.owner {
                Owner::Player => {
                    self.particles.burst(shot.pos, 0x00ff00, 15);
                    self.damage_boss(shot.damage);
                }
                Owner::Enemy => {
                    self.particles.burst(shot.pos, 0xff4444, 10);
                    self.damage_player(shot.damage);
                }
            }
            if shot.behaviors.explosive.is_some() {
                self.explosion_burst(shot.pos);
                spawned.extend(shot.explosion_shards(shot.pos));
            }
            if shot.register_hit() {
                kept.push(shot);
            }
        }

        self.projectiles = kept;
        for shot in spawned {
            self.spawn(shot);
        }
    }

    fn explosion_burst(&mut self, at: Vec2) {
        self.particles.burst(at, 0xff9900, 30);
        for k in 0..8 {
            let angle = std::f32::consts::TAU / 8.0 * k as f32;
            self.particles
                .burst(at + crate::polar_to_cartesian(30.0, angle), 0xff6600, 10);
        }
    }

    /// Continuous player ray while the ray gun mode is active
    fn update_ray_gun(&mut self) {
        let Some((start, end)) = self.ray() else {
            return;
        };
        let reach = self.boss.radius + self.tuning.ray_hit_margin;
        if let Some(contact) = segment_hits_circle(start, end, self.boss.pos, reach) {
            self.particles.burst(contact, 0x00ffff, 2);
            self.damage_boss(self.tuning.ray_damage);
        }
    }
}
