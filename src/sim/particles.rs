//! Cosmetic particles
//!
//! Particles never feed back into gameplay. Bursts use a hash-based spread
//! instead of the game RNG so adding or removing effects cannot change a
//! seeded run.

use std::collections::VecDeque;

use glam::Vec2;
use serde::Serialize;

/// Maximum live particles; the oldest are dropped first
pub const MAX_PARTICLES: usize = 512;
/// Particle lifetime in ticks
pub const PARTICLE_LIFE: f32 = 30.0;
/// Per-tick velocity decay
pub const PARTICLE_DRAG: f32 = 0.98;

/// A particle for visual effects
#[derive(Debug, Clone, Serialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32, // 0xRRGGBB
    pub life: f32,  // Ticks left
    pub size: f32,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Particles {
    items: VecDeque<Particle>,
    #[serde(skip)]
    bursts: u32,
}

impl Particles {
    /// Spawn `count` particles at `at` with a random-looking spread
    pub fn burst(&mut self, at: Vec2, color: u32, count: usize) {
        let seed = self.bursts;
        self.bursts = self.bursts.wrapping_add(1);

        for i in 0..count as u32 {
            if self.items.len() >= MAX_PARTICLES {
                self.items.pop_front();
            }
            let hash = seed
                .wrapping_mul(2654435761)
                .wrapping_add(i.wrapping_mul(7919))
                .wrapping_mul(2246822519);
            let hx = (hash % 1000) as f32 / 1000.0;
            let hy = (hash / 1000 % 1000) as f32 / 1000.0;
            let hs = (hash / 1_000_000 % 100) as f32 / 100.0;

            self.items.push_back(Particle {
                pos: at,
                vel: Vec2::new((hx - 0.5) * 6.0, (hy - 0.5) * 6.0),
                color,
                life: PARTICLE_LIFE,
                size: 2.0 + hs * 4.0,
            });
        }
    }

    /// Move, slow and age every particle by one tick
    pub fn tick(&mut self) {
        for p in self.items.iter_mut() {
            p.pos += p.vel;
            p.vel *= PARTICLE_DRAG;
            p.life -= 1.0;
        }
        self.items.retain(|p| p.life > 0.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particles_expire() {
        let mut particles = Particles::default();
        particles.burst(Vec2::ZERO, 0xff0000, 10);
        assert_eq!(particles.len(), 10);
        for _ in 0..29 {
            particles.tick();
        }
        assert_eq!(particles.len(), 10);
        particles.tick();
        assert!(particles.is_empty());
    }

    #[test]
    fn test_cap_drops_oldest() {
        let mut particles = Particles::default();
        particles.burst(Vec2::ZERO, 0x111111, MAX_PARTICLES);
        particles.burst(Vec2::new(5.0, 5.0), 0x222222, 8);
        assert_eq!(particles.len(), MAX_PARTICLES);
        assert_eq!(particles.iter().filter(|p| p.color == 0x222222).count(), 8);
    }

    #[test]
    fn test_velocity_decays() {
        let mut particles = Particles::default();
        particles.burst(Vec2::ZERO, 0xffffff, 4);
        let before: Vec<f32> = particles.iter().map(|p| p.vel.length()).collect();
        particles.tick();
        for (p, v) in particles.iter().zip(before) {
            assert!(p.vel.length() <= v);
            assert!(p.vel.x.abs() <= 3.0 && p.vel.y.abs() <= 3.0);
        }
    }
}
