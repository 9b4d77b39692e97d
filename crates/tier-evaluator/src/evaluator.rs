//! Tier evaluation state machine

use crate::config::EvaluatorConfig;
use crate::cooldown::{CooldownGate, TierCounts};
use crate::duration::DurationTracker;
use crate::tier::{Tier, TierEvaluation};
use emotion_types::{AttentionState, EmotionClass, EmotionDistribution};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Inputs for one evaluation tick
#[derive(Debug, Clone, Copy)]
pub struct TierInput<'a> {
    /// Smoothed dominant emotion
    pub dominant: EmotionClass,
    /// Short-window aggregate
    pub short: &'a EmotionDistribution,
    /// Long-window aggregate
    pub long: &'a EmotionDistribution,
    pub attention: &'a AttentionState,
    /// Frame timestamp (ms)
    pub timestamp_ms: u64,
}

/// Read-only view of evaluator counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorDiagnostics {
    pub tracked_emotion: Option<EmotionClass>,
    pub duration_secs: f64,
    pub transitions: u32,
    pub last_fired_ms: Option<u64>,
    pub last_fired_tier: Option<Tier>,
    pub fire_counts: TierCounts,
    pub suppressed_by_cooldown: u32,
    pub last_suppressed_tier: Option<Tier>,
    /// Cooldown left as of the last evaluated tick (ms)
    pub cooldown_remaining_ms: u64,
    pub last_evaluated_ms: Option<u64>,
}

/// Duration & tier evaluator; one instance per learner session
pub struct TierEvaluator {
    config: EvaluatorConfig,
    duration: DurationTracker,
    cooldown: CooldownGate,
    last_evaluated_ms: Option<u64>,
}

impl TierEvaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        Self {
            config,
            duration: DurationTracker::new(),
            cooldown: CooldownGate::new(),
            last_evaluated_ms: None,
        }
    }

    /// Run one tick: update duration, pick a candidate, apply the cooldown
    pub fn evaluate(&mut self, input: &TierInput<'_>) -> TierEvaluation {
        let now_ms = input.timestamp_ms;
        self.last_evaluated_ms = Some(now_ms);

        let duration = self
            .duration
            .observe(input.dominant, self.config.frame_interval_secs);

        let Some(tier) = self.select_candidate(input.dominant, duration, input.attention) else {
            return TierEvaluation::none(duration);
        };

        let cooldown_ms = self.config.cooldown_ms();
        if !self.cooldown.is_open(now_ms, cooldown_ms) {
            let remaining = self.cooldown.remaining_ms(now_ms, cooldown_ms);
            self.cooldown.record_suppressed(tier, remaining);
            return TierEvaluation::none(duration);
        }

        self.cooldown.record_fire(tier, now_ms);
        info!(
            tier = tier.number(),
            reason = tier.reason().as_str(),
            emotion = %input.dominant,
            duration_secs = duration,
            short_confidence = input.short.confidence,
            long_confidence = input.long.confidence,
            timestamp_ms = now_ms,
            "Intervention fired"
        );
        TierEvaluation::fired(tier, duration)
    }

    /// First matching tier in priority order: do-not-disturb, away, then emotion tiers
    fn select_candidate(&self, dominant: EmotionClass, duration_secs: f64, attention: &AttentionState) -> Option<Tier> {
        if dominant == self.config.baseline_emotion && !attention.is_away() {
            return None;
        }

        if attention.is_away() && attention.idle_duration_secs >= self.config.away_idle_threshold_secs {
            return Some(Tier::Away);
        }

        for (tier, rule) in self.config.tiers.iter() {
            if rule.matches(dominant, duration_secs, attention) {
                return Some(tier);
            }
            if dominant == rule.emotion && duration_secs > rule.max_duration_secs {
                debug!(tier = tier.number(), duration_secs, "Tier window closed");
            }
        }

        None
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Replace configuration, keeping duration and cooldown state
    pub fn set_config(&mut self, config: EvaluatorConfig) {
        self.config = config;
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration.duration_secs()
    }

    pub fn fire_counts(&self) -> TierCounts {
        self.cooldown.counts()
    }

    pub fn diagnostics(&self) -> EvaluatorDiagnostics {
        let cooldown_remaining_ms = self
            .last_evaluated_ms
            .map(|now| self.cooldown.remaining_ms(now, self.config.cooldown_ms()))
            .unwrap_or(0);

        EvaluatorDiagnostics {
            tracked_emotion: self.duration.current(),
            duration_secs: self.duration.duration_secs(),
            transitions: self.duration.transitions(),
            last_fired_ms: self.cooldown.last_fired_ms(),
            last_fired_tier: self.cooldown.last_tier(),
            fire_counts: self.cooldown.counts(),
            suppressed_by_cooldown: self.cooldown.suppressed(),
            last_suppressed_tier: self.cooldown.last_suppressed(),
            cooldown_remaining_ms,
            last_evaluated_ms: self.last_evaluated_ms,
        }
    }

    /// Reset state (on session change)
    pub fn reset(&mut self) {
        self.duration.reset();
        self.cooldown.clear();
        self.last_evaluated_ms = None;
    }
}

impl Default for TierEvaluator {
    fn default() -> Self {
        Self::new(EvaluatorConfig::default())
    }
}
