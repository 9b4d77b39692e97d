//! Duration & Tier Evaluator
//!
//! The intervention decision state machine:
//! - Tracks how long the dominant emotion has persisted
//! - Matches tier conditions (emotion + duration range + attention)
//! - Gates every firing behind one cooldown shared by all tiers
//! - Maps the fired tier to a recommended action

pub mod config;
pub mod cooldown;
pub mod duration;
pub mod evaluator;
pub mod tier;

pub use config::{AttentionGate, EvaluatorConfig, TierRule, TierRules};
pub use cooldown::{CooldownGate, TierCounts};
pub use duration::DurationTracker;
pub use evaluator::{EvaluatorDiagnostics, TierEvaluator, TierInput};
pub use tier::{InterventionReason, RecommendedAction, Tier, TierEvaluation};

use thiserror::Error;

/// Evaluator error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluatorError {
    #[error("Unknown intervention tier: {0}")]
    UnknownTier(u8),
}
