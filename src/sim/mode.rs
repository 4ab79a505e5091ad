//! Involuntary mode cycling
//!
//! Each slot is Idle, Active (duration counting down) or OnCooldown
//! (cooldown counting down), never Active and OnCooldown at once. When the
//! active mode runs out it goes on cooldown and a replacement is drawn at
//! random from the ready slots.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::timer::Cooldown;
use crate::error::ActivationError;

/// Observable state of one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeState {
    Idle,
    Active,
    OnCooldown,
}

/// Mode descriptor: how long it lasts and how long it rests
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeSlot<M> {
    pub mode: M,
    pub duration: Cooldown,
    pub cooldown: Cooldown,
}

impl<M> ModeSlot<M> {
    pub fn state(&self) -> ModeState {
        if !self.duration.ready() {
            ModeState::Active
        } else if !self.cooldown.ready() {
            ModeState::OnCooldown
        } else {
            ModeState::Idle
        }
    }
}

/// What a tick changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTransition<M> {
    /// Mode whose duration just ran out
    pub expired: Option<M>,
    /// Mode that just became active
    pub activated: Option<M>,
}

/// Slot table plus the index of the active slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeCycler<M> {
    slots: Vec<ModeSlot<M>>,
    active: Option<usize>,
}

impl<M: Copy + PartialEq> ModeCycler<M> {
    /// Build from `(mode, max_duration, max_cooldown)` triples
    pub fn new(modes: impl IntoIterator<Item = (M, f32, f32)>) -> Self {
        let slots = modes
            .into_iter()
            .map(|(mode, duration, cooldown)| ModeSlot {
                mode,
                duration: Cooldown::new(duration),
                cooldown: Cooldown::new(cooldown),
            })
            .collect();
        Self {
            slots,
            active: None,
        }
    }

    pub fn active(&self) -> Option<M> {
        self.active.map(|i| self.slots[i].mode)
    }

    pub fn active_slot(&self) -> Option<&ModeSlot<M>> {
        self.active.map(|i| &self.slots[i])
    }

    pub fn slots(&self) -> &[ModeSlot<M>] {
        &self.slots
    }

    pub fn slot(&self, mode: M) -> Option<&ModeSlot<M>> {
        self.slots.iter().find(|s| s.mode == mode)
    }

    /// Modes whose cooldown has run out
    pub fn ready_modes(&self) -> impl Iterator<Item = M> + '_ {
        self.slots
            .iter()
            .filter(|s| s.cooldown.ready())
            .map(|s| s.mode)
    }

    /// Make `mode` the active mode, ending the current one without cooldown.
    ///
    /// Rejected while `mode` is on cooldown.
    pub fn activate(&mut self, mode: M) -> Result<(), ActivationError> {
        let Some(index) = self.slots.iter().position(|s| s.mode == mode) else {
            return Ok(());
        };
        let slot = &self.slots[index];
        if !slot.cooldown.ready() {
            return Err(ActivationError::OnCooldown {
                remaining: slot.cooldown.remaining,
            });
        }

        if let Some(current) = self.active.take() {
            self.slots[current].duration.clear();
        }
        self.slots[index].duration.restart();
        self.active = Some(index);
        Ok(())
    }

    /// Activate a uniformly random ready mode, or go weaponless if none is
    pub fn activate_random<R: Rng>(&mut self, rng: &mut R) -> Option<M> {
        let ready: Vec<usize> = (0..self.slots.len())
            .filter(|&i| self.slots[i].cooldown.ready())
            .collect();

        if ready.is_empty() {
            if let Some(current) = self.active.take() {
                self.slots[current].duration.clear();
            }
            return None;
        }

        let index = ready[rng.random_range(0..ready.len())];
        let mode = self.slots[index].mode;
        // Ready slots always activate
        self.activate(mode).ok()?;
        Some(mode)
    }

    /// Advance durations and cooldowns by `step`
    pub fn tick<R: Rng>(&mut self, step: f32, rng: &mut R) -> ModeTransition<M> {
        let mut transition = ModeTransition {
            expired: None,
            activated: None,
        };

        match self.active {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.duration.tick(step);
                if slot.duration.ready() {
                    slot.cooldown.restart();
                    self.active = None;
                    transition.expired = Some(slot.mode);
                    transition.activated = self.activate_random(rng);
                }
            }
            None => {
                transition.activated = self.activate_random(rng);
            }
        }

        // After expiry: a mode that just expired already loses one step of cooldown
        for slot in &mut self.slots {
            slot.cooldown.tick(step);
        }

        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestMode {
        A,
        B,
        C,
    }

    fn cycler() -> ModeCycler<TestMode> {
        ModeCycler::new([
            (TestMode::A, 3.0, 5.0),
            (TestMode::B, 2.0, 4.0),
            (TestMode::C, 4.0, 6.0),
        ])
    }

    fn assert_exclusive(c: &ModeCycler<TestMode>) {
        for slot in c.slots() {
            assert!(
                slot.duration.ready() || slot.cooldown.ready(),
                "{:?} active and cooling down at once",
                slot.mode
            );
        }
    }

    #[test]
    fn test_idle_cycler_picks_a_mode() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut c = cycler();
        assert_eq!(c.active(), None);
        let t = c.tick(1.0, &mut rng);
        assert!(t.activated.is_some());
        assert_eq!(c.active(), t.activated);
    }

    #[test]
    fn test_expired_mode_goes_on_cooldown_and_is_replaced() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut c = cycler();
        c.activate(TestMode::B).unwrap();

        let first = c.tick(1.0, &mut rng);
        assert_eq!(first.expired, None);
        let second = c.tick(1.0, &mut rng);
        assert_eq!(second.expired, Some(TestMode::B));
        let replacement = second.activated.unwrap();
        assert_ne!(replacement, TestMode::B);
        assert_eq!(c.slot(TestMode::B).unwrap().state(), ModeState::OnCooldown);
        assert_exclusive(&c);
    }

    #[test]
    fn test_activate_rejected_on_cooldown() {
        let mut c = cycler();
        let mut rng = Pcg32::seed_from_u64(3);
        c.activate(TestMode::B).unwrap();
        c.tick(1.0, &mut rng);
        c.tick(1.0, &mut rng);
        let before = c.active();
        assert!(matches!(
            c.activate(TestMode::B),
            Err(ActivationError::OnCooldown { .. })
        ));
        assert_eq!(c.active(), before);
    }

    #[test]
    fn test_weaponless_until_a_cooldown_finishes() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut c = ModeCycler::new([(TestMode::A, 1.0, 3.0)]);
        c.activate(TestMode::A).unwrap();
        let t = c.tick(1.0, &mut rng);
        assert_eq!(t.expired, Some(TestMode::A));
        assert_eq!(t.activated, None);
        assert_eq!(c.active(), None);
        let cooling = c.slot(TestMode::A).map(|s| s.cooldown.remaining);
        assert_eq!(cooling, Some(2.0));

        // Cooldown 3 ticks, one already elapsed in the expiring tick
        assert_eq!(c.tick(1.0, &mut rng).activated, None);
        assert_eq!(c.tick(1.0, &mut rng).activated, None);
        assert_eq!(c.tick(1.0, &mut rng).activated, Some(TestMode::A));
    }

    proptest! {
        #[test]
        fn prop_never_active_and_cooling(seed in any::<u64>(), steps in proptest::collection::vec(0u8..4, 1..300)) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut c = cycler();
            for step in steps {
                match step {
                    0 => { let _ = c.activate(TestMode::A); }
                    1 => { let _ = c.activate(TestMode::C); }
                    _ => { c.tick(1.0, &mut rng); }
                }
                for slot in c.slots() {
                    prop_assert!(slot.duration.ready() || slot.cooldown.ready());
                }
                if let Some(active) = c.active_slot() {
                    prop_assert_eq!(active.state(), ModeState::Active);
                }
            }
        }
    }
}
