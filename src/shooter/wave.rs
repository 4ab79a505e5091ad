//! Wave sequencing
//!
//! A wave is built once into a spawn queue, announced with a banner, then
//! drained one enemy per spawn interval. It is cleared when the queue is
//! empty and nothing spawned for it is still alive.

use std::collections::VecDeque;

use rand::Rng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::enemy::{BossKind, EnemyKind};
use crate::tuning::ShooterTuning;

/// What the director wants the game to do this tick
#[derive(Debug, Clone, PartialEq)]
pub enum WaveSignal {
    /// New banner text; empty hides it
    Banner(String),
    Started(u32),
    Spawn(EnemyKind),
    Cleared(u32),
}

#[derive(Debug, Clone, Serialize)]
pub struct WaveDirector {
    pub wave: u32,
    pub queue: VecDeque<EnemyKind>,
    pub in_progress: bool,
    pub spawn_timer: f32,
    /// Pause before the next wave is built
    pub inter_wave: f32,
    pub banner: String,
    pub banner_timer: f32,
}

impl WaveDirector {
    pub fn new(start_wave: u32, tuning: &ShooterTuning) -> Self {
        Self {
            wave: start_wave.max(1),
            queue: VecDeque::new(),
            in_progress: false,
            spawn_timer: 0.0,
            inter_wave: tuning.first_wave_delay,
            banner: String::new(),
            banner_timer: 0.0,
        }
    }

    pub fn is_boss_wave(wave: u32, tuning: &ShooterTuning) -> bool {
        wave % tuning.boss_every == 0
    }

    /// Regular (non-boss) enemies in `wave`
    pub fn regular_count(wave: u32, tuning: &ShooterTuning) -> usize {
        let count = (tuning.wave_base_count + (tuning.wave_growth * wave as f32).floor() as u32)
            .min(tuning.wave_max_count);
        if Self::is_boss_wave(wave, tuning) {
            ((count as f32 * tuning.boss_wave_shrink).floor() as u32).max(3) as usize
        } else {
            count as usize
        }
    }

    /// Seconds between spawns, shrinking with the wave number
    pub fn spawn_interval(wave: u32, tuning: &ShooterTuning) -> f32 {
        let scale = 1.0 + wave.saturating_sub(1) as f32 * tuning.spawn_interval_scale;
        (tuning.spawn_interval_base / scale).max(tuning.spawn_interval_min)
    }

    /// Enemy hp multiplier for `wave`
    pub fn hp_scale(wave: u32, tuning: &ShooterTuning) -> f32 {
        1.0 + wave.saturating_sub(1) as f32 * tuning.difficulty_step
    }

    pub fn drop_chance(wave: u32, tuning: &ShooterTuning) -> f32 {
        (tuning.drop_chance_base + wave.saturating_sub(1) as f32 * tuning.drop_chance_step)
            .min(tuning.drop_chance_max)
    }

    pub fn banner(&self) -> Option<&str> {
        (!self.banner.is_empty()).then_some(self.banner.as_str())
    }

    /// Fill the queue for the current wave and raise the warning banner.
    /// Returns the banner text.
    pub fn build(&mut self, rng: &mut Pcg32, tuning: &ShooterTuning) -> String {
        self.queue.clear();
        if Self::is_boss_wave(self.wave, tuning) {
            let boss = BossKind::ALL[rng.random_range(0..BossKind::ALL.len())];
            self.queue.push_back(EnemyKind::Boss(boss));
        }
        for _ in 0..Self::regular_count(self.wave, tuning) {
            let kind = EnemyKind::REGULAR[rng.random_range(0..EnemyKind::REGULAR.len())];
            self.queue.push_back(kind);
        }

        self.banner = format!("Wave {}: {}", self.wave, summarize(&self.queue));
        self.banner_timer = tuning.warning_secs;
        log::info!("Wave {} built: {} enemies", self.wave, self.queue.len());
        self.banner.clone()
    }

    /// Advance the wave flow by `dt`. `live` counts enemies still alive
    /// that belong to the current wave.
    pub fn tick(
        &mut self,
        dt: f32,
        live: usize,
        rng: &mut Pcg32,
        tuning: &ShooterTuning,
    ) -> Vec<WaveSignal> {
        let mut signals = Vec::new();

        if !self.in_progress {
            if self.queue.is_empty() && self.inter_wave <= 0.0 {
                signals.push(WaveSignal::Banner(self.build(rng, tuning)));
            }
            if self.banner_timer <= 0.0 && !self.queue.is_empty() {
                self.in_progress = true;
                self.spawn_timer = 0.0;
                log::info!("Wave {} started", self.wave);
                signals.push(WaveSignal::Started(self.wave));
            }
            self.inter_wave -= dt;
        } else {
            let mut live = live;
            self.spawn_timer += dt;
            if self.spawn_timer > Self::spawn_interval(self.wave, tuning) {
                if let Some(kind) = self.queue.pop_front() {
                    self.spawn_timer = 0.0;
                    live += 1;
                    signals.push(WaveSignal::Spawn(kind));
                }
            }
            if self.queue.is_empty() && live == 0 {
                let cleared = self.wave;
                self.in_progress = false;
                self.wave += 1;
                self.inter_wave = tuning.inter_wave_secs;
                self.banner = "Wave cleared".to_string();
                self.banner_timer = tuning.cleared_banner_secs;
                log::info!("Wave {cleared} cleared");
                signals.push(WaveSignal::Cleared(cleared));
                signals.push(WaveSignal::Banner(self.banner.clone()));
            }
        }

        self.banner_timer -= dt;
        if self.banner_timer < 0.0 && !self.banner.is_empty() {
            self.banner.clear();
            signals.push(WaveSignal::Banner(String::new()));
        }
        signals
    }
}

/// "BOSS, tank x2, gunner x1" in order of first appearance
fn summarize(queue: &VecDeque<EnemyKind>) -> String {
    let mut counts: Vec<(EnemyKind, usize)> = Vec::new();
    for &kind in queue {
        let kind = if kind.is_boss() {
            EnemyKind::Boss(BossKind::Balanced)
        } else {
            kind
        };
        match counts.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, n)) => *n += 1,
            None => counts.push((kind, 1)),
        }
    }
    counts
        .iter()
        .map(|(kind, n)| {
            if kind.is_boss() {
                "BOSS".to_string()
            } else {
                format!("{} x{}", kind.name(), n)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use proptest::prelude::*;
    use rand::SeedableRng;

    #[test]
    fn test_wave_sizes() {
        let tuning = ShooterTuning::default();
        assert_eq!(WaveDirector::regular_count(1, &tuning), 4);
        assert_eq!(WaveDirector::regular_count(4, &tuning), 9);
        // 3 + 8 = 11, shrunk to 6 for the boss
        assert_eq!(WaveDirector::regular_count(5, &tuning), 6);
        assert_eq!(WaveDirector::regular_count(100, &tuning), 24);
        assert_eq!(WaveDirector::regular_count(99, &tuning), 40);
    }

    #[test]
    fn test_spawn_interval_floor() {
        let tuning = ShooterTuning::default();
        assert!((WaveDirector::spawn_interval(1, &tuning) - 0.9).abs() < 1e-6);
        assert_eq!(WaveDirector::spawn_interval(500, &tuning), 0.18);
    }

    #[test]
    fn test_boss_wave_queues_boss_first() {
        let tuning = ShooterTuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut director = WaveDirector::new(5, &tuning);
        let banner = director.build(&mut rng, &tuning);
        assert!(director.queue[0].is_boss());
        assert_eq!(director.queue.len(), 7);
        assert!(banner.starts_with("Wave 5: BOSS, "));
        assert_eq!(director.banner(), Some(banner.as_str()));
    }

    #[test]
    fn test_waits_for_warning_before_spawning() {
        let tuning = ShooterTuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut director = WaveDirector::new(1, &tuning);
        let mut started_at = None;
        for tick in 0..600 {
            let signals = director.tick(SIM_DT, 0, &mut rng, &tuning);
            if signals.contains(&WaveSignal::Started(1)) {
                started_at = Some(tick);
                break;
            }
        }
        let seconds = started_at.unwrap() as f32 * SIM_DT;
        assert!(seconds > 1.5 + 3.4 - 0.1 && seconds < 1.5 + 3.4 + 0.1);
    }

    /// Run a wave to completion, killing everything as soon as the queue is
    /// drained. Returns (spawned, clear signals seen, director).
    fn play_out(start_wave: u32, seed: u64) -> (usize, usize, WaveDirector) {
        let tuning = ShooterTuning::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut director = WaveDirector::new(start_wave, &tuning);
        let mut alive = 0usize;
        let mut spawned = 0usize;
        let mut clears = 0usize;
        let mut after_clear = 0;

        for _ in 0..60 * 120 {
            for signal in director.tick(SIM_DT, alive, &mut rng, &tuning) {
                match signal {
                    WaveSignal::Spawn(_) => {
                        alive += 1;
                        spawned += 1;
                    }
                    WaveSignal::Cleared(wave) => {
                        assert_eq!(wave, start_wave);
                        clears += 1;
                    }
                    WaveSignal::Banner(_) | WaveSignal::Started(_) => {}
                }
            }
            if director.in_progress && director.queue.is_empty() {
                alive = 0;
            }
            if clears > 0 {
                after_clear += 1;
                // stay inside the inter-wave pause
                if after_clear > 60 {
                    break;
                }
            }
        }
        (spawned, clears, director)
    }

    #[test]
    fn test_wave_clears_once() {
        let (spawned, clears, director) = play_out(1, 9);
        assert_eq!(spawned, 4);
        assert_eq!(clears, 1);
        assert_eq!(director.wave, 2);
        assert!(!director.in_progress);
    }

    #[test]
    fn test_no_clear_while_enemies_live() {
        let tuning = ShooterTuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut director = WaveDirector::new(1, &tuning);
        let mut alive = 0;
        for _ in 0..60 * 30 {
            for signal in director.tick(SIM_DT, alive, &mut rng, &tuning) {
                assert!(!matches!(signal, WaveSignal::Cleared(_)));
                if let WaveSignal::Spawn(_) = signal {
                    alive += 1;
                }
            }
        }
        assert!(director.queue.is_empty());
        assert_eq!(director.wave, 1);
    }

    proptest! {
        #[test]
        fn prop_queue_drains_then_clears_once(wave in 1u32..30, seed in any::<u64>()) {
            let tuning = ShooterTuning::default();
            let expected = WaveDirector::regular_count(wave, &tuning)
                + usize::from(WaveDirector::is_boss_wave(wave, &tuning));
            let (spawned, clears, director) = play_out(wave, seed);
            prop_assert_eq!(spawned, expected);
            prop_assert_eq!(clears, 1);
            prop_assert_eq!(director.wave, wave + 1);
        }
    }
}
