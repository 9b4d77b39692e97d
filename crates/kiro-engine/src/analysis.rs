//! Per-frame analysis results and session statistics

use emotion_types::{AttentionState, EmotionClass, EmotionDistribution, EmotionScores};
use serde::{Deserialize, Serialize};
use tier_evaluator::{InterventionReason, RecommendedAction, Tier, TierEvaluation};

/// Complete result of processing one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KiroAnalysis {
    /// Dominant emotion of the smoothed trend
    pub dominant_emotion: EmotionClass,

    /// Short-window aggregate
    pub short_aggregate: EmotionDistribution,

    /// Long-window aggregate
    pub long_aggregate: EmotionDistribution,

    /// Smoothed probabilities after this frame
    pub smoothed_trend: EmotionScores,

    /// Attention snapshot the decision was made with
    pub attention_state: AttentionState,

    pub recommended_action: RecommendedAction,

    /// Fired tier (serialized as 1-4), if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_tier: Option<Tier>,

    pub should_intervene: bool,

    /// Frame timestamp (ms)
    pub timestamp_ms: u64,

    pub reason: InterventionReason,

    /// Seconds the dominant emotion has persisted
    pub dominant_duration_secs: f64,

    /// Gap between the top two smoothed probabilities
    pub confidence_margin: f64,

    /// False until enough frames have been processed
    pub is_ready: bool,

    /// Learner-facing line for the dominant emotion
    pub encouragement: String,
}

impl KiroAnalysis {
    /// Assemble the result from the stage outputs
    pub(crate) fn assemble(
        evaluation: TierEvaluation,
        short_aggregate: EmotionDistribution,
        long_aggregate: EmotionDistribution,
        smoothed_trend: EmotionScores,
        attention_state: AttentionState,
        timestamp_ms: u64,
        is_ready: bool,
    ) -> Self {
        let dominant_emotion = smoothed_trend.dominant();
        Self {
            dominant_emotion,
            short_aggregate,
            long_aggregate,
            smoothed_trend,
            attention_state,
            recommended_action: evaluation.action(),
            trigger_tier: evaluation.tier,
            should_intervene: evaluation.should_trigger,
            timestamp_ms,
            reason: evaluation.reason,
            dominant_duration_secs: evaluation.duration_secs,
            confidence_margin: smoothed_trend.margin(),
            is_ready,
            encouragement: dominant_emotion.encouragement().to_string(),
        }
    }

    /// Whether the dominant emotion works against learning
    pub fn is_negative_state(&self) -> bool {
        self.dominant_emotion.is_negative()
    }
}

/// Session counters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub frame_count: u64,

    /// Span between the first and latest frame timestamps (seconds)
    pub elapsed_secs: f64,

    /// Observed frames per second; 0 until two frames span a positive interval
    pub average_frame_rate_hz: f64,

    /// Interventions fired this session
    pub interventions: u32,

    /// Frames that needed probability repair
    pub sanitized_frames: u64,

    pub is_ready: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_fired() {
        let trend = EmotionScores::new([0.1, 0.7, 0.1, 0.1]);
        let analysis = KiroAnalysis::assemble(
            TierEvaluation::fired(Tier::Confusion, 92.0),
            EmotionDistribution::uninformed(),
            EmotionDistribution::uninformed(),
            trend,
            AttentionState::default(),
            92_000,
            true,
        );

        assert_eq!(analysis.dominant_emotion, EmotionClass::Confused);
        assert_eq!(analysis.recommended_action, RecommendedAction::SimplifyContent);
        assert_eq!(analysis.trigger_tier, Some(Tier::Confusion));
        assert!(analysis.should_intervene);
        assert!((analysis.confidence_margin - 0.6).abs() < 1e-12);
        assert!(analysis.is_negative_state());
        assert_eq!(analysis.encouragement, EmotionClass::Confused.encouragement());
    }

    #[test]
    fn test_serialized_shape() {
        let analysis = KiroAnalysis::assemble(
            TierEvaluation::none(4.0),
            EmotionDistribution::uninformed(),
            EmotionDistribution::uninformed(),
            EmotionScores::one_hot(EmotionClass::Focused),
            AttentionState::default(),
            0,
            false,
        );
        let json = serde_json::to_value(&analysis).unwrap();

        assert_eq!(json["dominant_emotion"], "focused");
        assert_eq!(json["recommended_action"], "none");
        assert_eq!(json["reason"], "no_intervention_needed");
        assert!(json.get("trigger_tier").is_none());
        assert_eq!(json["smoothed_trend"]["focused"], 1.0);
    }
}
