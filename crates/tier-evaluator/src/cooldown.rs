//! Global cooldown shared by all tiers

use crate::tier::Tier;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Per-tier firing counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub confusion: u32,
    pub disengagement: u32,
    pub fatigue: u32,
    pub away: u32,
}

impl TierCounts {
    pub fn get(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Confusion => self.confusion,
            Tier::Disengagement => self.disengagement,
            Tier::Fatigue => self.fatigue,
            Tier::Away => self.away,
        }
    }

    fn increment(&mut self, tier: Tier) {
        let count = match tier {
            Tier::Confusion => &mut self.confusion,
            Tier::Disengagement => &mut self.disengagement,
            Tier::Fatigue => &mut self.fatigue,
            Tier::Away => &mut self.away,
        };
        *count += 1;
    }

    pub fn total(&self) -> u32 {
        self.confusion + self.disengagement + self.fatigue + self.away
    }
}

/// Cooldown gate; one firing of any tier closes it for every tier
#[derive(Debug, Clone, Default)]
pub struct CooldownGate {
    /// Timestamp of the last firing (ms)
    last_fired_ms: Option<u64>,
    /// Tier of the last firing
    last_tier: Option<Tier>,
    counts: TierCounts,
    /// Candidates blocked by the cooldown
    suppressed: u32,
    last_suppressed: Option<Tier>,
}

impl CooldownGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a firing at `now_ms` respects the cooldown
    pub fn is_open(&self, now_ms: u64, cooldown_ms: u64) -> bool {
        match self.last_fired_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= cooldown_ms,
        }
    }

    /// Milliseconds until the gate reopens (0 when open)
    pub fn remaining_ms(&self, now_ms: u64, cooldown_ms: u64) -> u64 {
        match self.last_fired_ms {
            None => 0,
            Some(last) => cooldown_ms.saturating_sub(now_ms.saturating_sub(last)),
        }
    }

    /// Record that a tier fired
    pub fn record_fire(&mut self, tier: Tier, now_ms: u64) {
        self.last_fired_ms = Some(now_ms);
        self.last_tier = Some(tier);
        self.counts.increment(tier);
    }

    /// Record that a candidate was blocked
    pub fn record_suppressed(&mut self, tier: Tier, remaining_ms: u64) {
        self.suppressed += 1;
        self.last_suppressed = Some(tier);
        debug!(tier = tier.number(), remaining_ms, "Candidate suppressed: in cooldown period");
    }

    pub fn last_fired_ms(&self) -> Option<u64> {
        self.last_fired_ms
    }

    pub fn last_tier(&self) -> Option<Tier> {
        self.last_tier
    }

    pub fn counts(&self) -> TierCounts {
        self.counts
    }

    pub fn suppressed(&self) -> u32 {
        self.suppressed
    }

    pub fn last_suppressed(&self) -> Option<Tier> {
        self.last_suppressed
    }

    /// Clear all firing history
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_until_first_fire() {
        let gate = CooldownGate::new();
        assert!(gate.is_open(0, 120_000));
        assert_eq!(gate.remaining_ms(0, 120_000), 0);
    }

    #[test]
    fn test_cross_tier_cooldown() {
        let mut gate = CooldownGate::new();
        gate.record_fire(Tier::Confusion, 100_000);

        // Any tier is blocked, not just the one that fired
        assert!(!gate.is_open(100_000, 120_000));
        assert!(!gate.is_open(219_999, 120_000));
        assert_eq!(gate.remaining_ms(200_000, 120_000), 20_000);
        assert!(gate.is_open(220_000, 120_000));
    }

    #[test]
    fn test_counts_and_suppression() {
        let mut gate = CooldownGate::new();
        gate.record_fire(Tier::Away, 0);
        gate.record_fire(Tier::Confusion, 200_000);
        gate.record_suppressed(Tier::Disengagement, 50_000);

        assert_eq!(gate.counts().get(Tier::Away), 1);
        assert_eq!(gate.counts().total(), 2);
        assert_eq!(gate.last_tier(), Some(Tier::Confusion));
        assert_eq!(gate.suppressed(), 1);
        assert_eq!(gate.last_suppressed(), Some(Tier::Disengagement));

        gate.clear();
        assert_eq!(gate.last_fired_ms(), None);
        assert_eq!(gate.counts().total(), 0);
    }
}
