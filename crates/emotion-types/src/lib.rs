//! Learner-State Value Types
//!
//! Closed value sets and records exchanged between the pipeline stages:
//! - Emotion classes and per-class probability vectors
//! - Emotion frames produced by the upstream classifier
//! - Aggregated emotion distributions
//! - Attention snapshots produced by the upstream attention tracker

pub mod attention;
pub mod emotion;
pub mod frame;

pub use attention::{AttentionLevel, AttentionState};
pub use emotion::{EmotionClass, EmotionScores};
pub use frame::{EmotionDistribution, EmotionFrame};

use thiserror::Error;

/// Errors when parsing closed value sets from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown emotion class: {0}")]
    UnknownEmotion(String),

    #[error("Unknown attention level: {0}")]
    UnknownAttentionLevel(String),
}
