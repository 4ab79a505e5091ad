//! Countdown timers, clamped health and timed abilities
//!
//! A timer counts down by one step per tick and is ready at zero. The boss
//! fight steps in whole ticks (`1.0`), the shooter in seconds (`dt`).

use serde::{Deserialize, Serialize};

use crate::error::ActivationError;

/// A countdown that resets to a configured maximum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cooldown {
    pub remaining: f32,
    pub max: f32,
}

impl Cooldown {
    /// A ready cooldown that restarts at `max`
    pub fn new(max: f32) -> Self {
        Self { remaining: 0.0, max }
    }

    #[inline]
    pub fn ready(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Count down by `step`, flooring at zero
    pub fn tick(&mut self, step: f32) {
        if self.remaining > 0.0 {
            self.remaining = (self.remaining - step).max(0.0);
        }
    }

    /// Restart from the configured maximum
    pub fn restart(&mut self) {
        self.remaining = self.max;
    }

    /// Restart from an explicit value (weapons with per-shot delays)
    pub fn restart_with(&mut self, remaining: f32) {
        self.remaining = remaining.max(0.0);
    }

    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }
}

/// Health clamped to `[0, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    current: f32,
    max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Fraction of health left, for health bars
    pub fn ratio(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    #[inline]
    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    /// Subtract `amount`, flooring at zero.
    ///
    /// Returns true only for the hit that takes health from positive to
    /// zero, so a caller can fire its defeat transition exactly once.
    pub fn damage(&mut self, amount: f32) -> bool {
        if self.is_depleted() || amount <= 0.0 {
            return false;
        }
        self.current = (self.current - amount).max(0.0);
        self.is_depleted()
    }

    /// Add `amount`, capping at max. Returns the health actually gained.
    pub fn heal(&mut self, amount: f32) -> f32 {
        let before = self.current;
        self.current = (self.current + amount.max(0.0)).min(self.max);
        self.current - before
    }

    pub fn refill(&mut self) {
        self.current = self.max;
    }

    /// Set health directly, clamped into range
    pub fn set(&mut self, value: f32) {
        self.current = value.clamp(0.0, self.max);
    }
}

/// Heal ability: instant restore, long cooldown, short glow afterwards
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealAbility {
    pub amount: f32,
    pub cooldown: Cooldown,
    /// Remaining glow ticks after a heal (cosmetic)
    pub glow: Cooldown,
}

impl HealAbility {
    pub fn new(amount: f32, cooldown: f32, glow: f32) -> Self {
        Self {
            amount,
            cooldown: Cooldown::new(cooldown),
            glow: Cooldown::new(glow),
        }
    }

    /// Heal `health` immediately and start the cooldown.
    ///
    /// Rejected with no state change while on cooldown or at full health.
    pub fn activate(&mut self, health: &mut Health) -> Result<f32, ActivationError> {
        if !self.cooldown.ready() {
            return Err(ActivationError::OnCooldown {
                remaining: self.cooldown.remaining,
            });
        }
        if health.is_full() {
            return Err(ActivationError::AtFullHealth);
        }

        let gained = health.heal(self.amount);
        self.glow.restart();
        self.cooldown.restart();
        Ok(gained)
    }

    pub fn is_glowing(&self) -> bool {
        !self.glow.ready()
    }

    pub fn tick(&mut self, step: f32) {
        self.cooldown.tick(step);
        self.glow.tick(step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_cooldown_counts_down_to_ready() {
        let mut cd = Cooldown::new(3.0);
        assert!(cd.ready());
        cd.restart();
        assert!(!cd.ready());
        cd.tick(1.0);
        cd.tick(1.0);
        assert!(!cd.ready());
        cd.tick(1.0);
        assert!(cd.ready());
        cd.tick(1.0);
        assert_eq!(cd.remaining, 0.0);
    }

    #[test]
    fn test_damage_reports_depletion_once() {
        let mut hp = Health::new(1200.0);
        for _ in 0..3 {
            assert!(!hp.damage(40.0));
        }
        assert_eq!(hp.current(), 1080.0);
        assert!(hp.damage(1200.0));
        assert_eq!(hp.current(), 0.0);
        // Further damage never reports a second depletion
        assert!(!hp.damage(10.0));
        assert_eq!(hp.current(), 0.0);
    }

    #[test]
    fn test_heal_at_full_health_is_rejected() {
        let mut hp = Health::new(200.0);
        let mut heal = HealAbility::new(80.0, 800.0, 60.0);
        assert_eq!(heal.activate(&mut hp), Err(ActivationError::AtFullHealth));
        assert_eq!(hp.current(), 200.0);
        assert!(heal.cooldown.ready());
    }

    #[test]
    fn test_heal_clamps_and_then_cools_down() {
        let mut hp = Health::new(200.0);
        hp.damage(30.0);
        let mut heal = HealAbility::new(80.0, 800.0, 60.0);
        assert_eq!(heal.activate(&mut hp), Ok(30.0));
        assert_eq!(hp.current(), 200.0);
        assert!(heal.is_glowing());

        hp.damage(100.0);
        let err = heal.activate(&mut hp).unwrap_err();
        assert_eq!(err, ActivationError::OnCooldown { remaining: 800.0 });
        assert_eq!(hp.current(), 100.0);

        for _ in 0..800 {
            heal.tick(1.0);
        }
        assert!(heal.activate(&mut hp).is_ok());
        assert_eq!(hp.current(), 180.0);
    }

    proptest! {
        #[test]
        fn prop_health_stays_in_range(
            max in 1.0f32..5000.0,
            ops in proptest::collection::vec((any::<bool>(), 0.0f32..2000.0), 0..64),
        ) {
            let mut hp = Health::new(max);
            for (is_heal, amount) in ops {
                if is_heal {
                    hp.heal(amount);
                } else {
                    hp.damage(amount);
                }
                prop_assert!(hp.current() >= 0.0);
                prop_assert!(hp.current() <= hp.max());
            }
        }
    }
}
