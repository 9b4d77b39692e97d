//! Tier rules and evaluator configuration

use crate::tier::Tier;
use emotion_types::{AttentionLevel, AttentionState, EmotionClass};
use serde::{Deserialize, Serialize};

/// Attention condition an emotion tier additionally requires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttentionGate {
    /// No attention requirement
    Any,
    /// Level is low or medium
    LowOrMedium,
    /// Level is low, or the learner is inactive
    LowOrInactive,
}

impl AttentionGate {
    pub fn admits(self, attention: &AttentionState) -> bool {
        match self {
            AttentionGate::Any => true,
            AttentionGate::LowOrMedium => {
                matches!(attention.level, AttentionLevel::Low | AttentionLevel::Medium)
            }
            AttentionGate::LowOrInactive => attention.level == AttentionLevel::Low || !attention.is_active,
        }
    }
}

/// Condition for one emotion-based tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierRule {
    /// Dominant emotion that arms this tier
    pub emotion: EmotionClass,
    /// Earliest duration at which the tier may fire (seconds, inclusive)
    pub min_duration_secs: f64,
    /// Latest duration at which the tier may fire (seconds, inclusive)
    pub max_duration_secs: f64,
    pub attention: AttentionGate,
}

impl TierRule {
    pub fn new(emotion: EmotionClass, min_duration_secs: f64, max_duration_secs: f64, attention: AttentionGate) -> Self {
        Self {
            emotion,
            min_duration_secs,
            max_duration_secs,
            attention,
        }
    }

    pub fn in_window(&self, duration_secs: f64) -> bool {
        duration_secs >= self.min_duration_secs && duration_secs <= self.max_duration_secs
    }

    /// Whether the tick satisfies emotion, duration range and attention gate
    pub fn matches(&self, dominant: EmotionClass, duration_secs: f64, attention: &AttentionState) -> bool {
        dominant == self.emotion && self.in_window(duration_secs) && self.attention.admits(attention)
    }
}

/// Rules for the emotion-based tiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierRules {
    pub confusion: TierRule,
    pub disengagement: TierRule,
    pub fatigue: TierRule,
}

impl Default for TierRules {
    fn default() -> Self {
        Self {
            confusion: TierRule::new(EmotionClass::Confused, 90.0, 120.0, AttentionGate::Any),
            disengagement: TierRule::new(EmotionClass::Bored, 180.0, 240.0, AttentionGate::LowOrMedium),
            fatigue: TierRule::new(EmotionClass::Tired, 180.0, 240.0, AttentionGate::LowOrInactive),
        }
    }
}

impl TierRules {
    /// Rule for an emotion tier; `None` for the attention-based away tier
    pub fn rule(&self, tier: Tier) -> Option<&TierRule> {
        match tier {
            Tier::Confusion => Some(&self.confusion),
            Tier::Disengagement => Some(&self.disengagement),
            Tier::Fatigue => Some(&self.fatigue),
            Tier::Away => None,
        }
    }

    /// (tier, rule) pairs in evaluation order
    pub fn iter(&self) -> impl Iterator<Item = (Tier, &TierRule)> + '_ {
        Tier::EMOTION_TIERS
            .into_iter()
            .filter_map(move |tier| self.rule(tier).map(|rule| (tier, rule)))
    }
}

/// Evaluator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Nominal spacing between frames (seconds)
    pub frame_interval_secs: f64,
    /// Emotion that never triggers an intervention while the learner is present
    pub baseline_emotion: EmotionClass,
    pub tiers: TierRules,
    /// Idle time after which an away learner is prompted (seconds)
    pub away_idle_threshold_secs: f64,
    /// Minimum spacing between any two firings (seconds)
    pub cooldown_secs: f64,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            frame_interval_secs: 4.0,
            baseline_emotion: EmotionClass::Focused,
            tiers: TierRules::default(),
            away_idle_threshold_secs: 120.0,
            cooldown_secs: 120.0,
        }
    }
}

impl EvaluatorConfig {
    pub fn cooldown_ms(&self) -> u64 {
        secs_to_ms(self.cooldown_secs)
    }
}

fn secs_to_ms(secs: f64) -> u64 {
    if secs.is_finite() && secs > 0.0 {
        (secs * 1000.0).round() as u64
    } else {
        0
    }
}
