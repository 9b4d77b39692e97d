//! Emotion frames and aggregated distributions

use crate::emotion::{EmotionClass, EmotionScores};
use serde::{Deserialize, Serialize};

/// One classifier reading, produced once per capture interval
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EmotionFrame {
    /// Capture time (Unix milliseconds)
    #[serde(alias = "timestamp")]
    pub timestamp_ms: u64,
    pub probabilities: EmotionScores,
}

impl EmotionFrame {
    pub fn new(timestamp_ms: u64, probabilities: EmotionScores) -> Self {
        Self {
            timestamp_ms,
            probabilities,
        }
    }
}

/// Per-class mean over a window of frames
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionDistribution {
    pub dominant: EmotionClass,
    pub distribution: EmotionScores,
    /// Probability of the dominant class; 0 when no frames were observed
    pub confidence: f64,
}

impl EmotionDistribution {
    /// Distribution over observed scores
    pub fn from_scores(distribution: EmotionScores) -> Self {
        let dominant = distribution.dominant();
        Self {
            dominant,
            distribution,
            confidence: distribution.get(dominant),
        }
    }

    /// Default for an empty window: uniform, confidence 0
    pub fn uninformed() -> Self {
        let distribution = EmotionScores::uniform();
        Self {
            dominant: distribution.dominant(),
            distribution,
            confidence: 0.0,
        }
    }
}

impl Default for EmotionDistribution {
    fn default() -> Self {
        Self::uninformed()
    }
}
