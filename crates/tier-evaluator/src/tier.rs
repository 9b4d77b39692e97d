//! Intervention tiers, reasons, and actions

use crate::EvaluatorError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Intervention tier.
///
/// Serialized as its number (1-4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Tier {
    /// Prolonged confusion
    Confusion,
    /// Sustained disengagement
    Disengagement,
    /// Fatigue
    Fatigue,
    /// Learner away from the session
    Away,
}

impl Tier {
    /// Emotion-based tiers in evaluation order
    pub const EMOTION_TIERS: [Tier; 3] = [Tier::Confusion, Tier::Disengagement, Tier::Fatigue];

    pub fn number(self) -> u8 {
        match self {
            Tier::Confusion => 1,
            Tier::Disengagement => 2,
            Tier::Fatigue => 3,
            Tier::Away => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Confusion => "confusion",
            Tier::Disengagement => "disengagement",
            Tier::Fatigue => "fatigue",
            Tier::Away => "away",
        }
    }

    /// Reason code reported when this tier fires
    pub fn reason(self) -> InterventionReason {
        match self {
            Tier::Confusion => InterventionReason::ProlongedConfusion,
            Tier::Disengagement => InterventionReason::Disengagement,
            Tier::Fatigue => InterventionReason::Fatigue,
            Tier::Away => InterventionReason::LearnerAway,
        }
    }

    /// Action the downstream consumer should take
    pub fn action(self) -> RecommendedAction {
        match self {
            Tier::Confusion => RecommendedAction::SimplifyContent,
            Tier::Disengagement => RecommendedAction::InteractiveExercise,
            Tier::Fatigue => RecommendedAction::SuggestBreak,
            Tier::Away => RecommendedAction::PromptContinueOrEnd,
        }
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> u8 {
        tier.number()
    }
}

impl TryFrom<u8> for Tier {
    type Error = EvaluatorError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Tier::Confusion),
            2 => Ok(Tier::Disengagement),
            3 => Ok(Tier::Fatigue),
            4 => Ok(Tier::Away),
            other => Err(EvaluatorError::UnknownTier(other)),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tier{} ({})", self.number(), self.as_str())
    }
}

/// Machine-readable reason code for a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionReason {
    NoInterventionNeeded,
    ProlongedConfusion,
    Disengagement,
    Fatigue,
    LearnerAway,
}

impl InterventionReason {
    pub fn as_str(self) -> &'static str {
        match self {
            InterventionReason::NoInterventionNeeded => "no_intervention_needed",
            InterventionReason::ProlongedConfusion => "prolonged_confusion",
            InterventionReason::Disengagement => "disengagement",
            InterventionReason::Fatigue => "fatigue",
            InterventionReason::LearnerAway => "learner_away",
        }
    }
}

/// What the downstream consumer should do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    #[default]
    None,
    /// Request simplified content
    SimplifyContent,
    /// Offer an interactive exercise or quiz
    InteractiveExercise,
    /// Suggest a rest break
    SuggestBreak,
    /// Ask whether to continue or end the session
    PromptContinueOrEnd,
}

impl RecommendedAction {
    /// Action for an optional fired tier
    pub fn for_tier(tier: Option<Tier>) -> Self {
        tier.map(Tier::action).unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecommendedAction::None => "none",
            RecommendedAction::SimplifyContent => "simplify_content",
            RecommendedAction::InteractiveExercise => "interactive_exercise",
            RecommendedAction::SuggestBreak => "suggest_break",
            RecommendedAction::PromptContinueOrEnd => "prompt_continue_or_end",
        }
    }
}

/// Result of one evaluation tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierEvaluation {
    /// Fired tier, if any
    pub tier: Option<Tier>,
    pub reason: InterventionReason,
    /// Seconds the current dominant emotion has persisted
    pub duration_secs: f64,
    pub should_trigger: bool,
}

impl TierEvaluation {
    /// Nothing to do this tick
    pub fn none(duration_secs: f64) -> Self {
        Self {
            tier: None,
            reason: InterventionReason::NoInterventionNeeded,
            duration_secs,
            should_trigger: false,
        }
    }

    pub fn fired(tier: Tier, duration_secs: f64) -> Self {
        Self {
            tier: Some(tier),
            reason: tier.reason(),
            duration_secs,
            should_trigger: true,
        }
    }

    pub fn action(&self) -> RecommendedAction {
        RecommendedAction::for_tier(self.tier)
    }
}
