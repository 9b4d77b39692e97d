//! Kiro Emotion Engine
//!
//! Real-time learner-state analysis for a study session:
//! - Short/long window aggregation of classifier frames
//! - Exponential smoothing and dominant-emotion tracking
//! - Duration-gated intervention tiers behind a global cooldown
//!
//! One [`EmotionEngine`] serves one learner session. Calls are synchronous
//! and must be serialized per instance; nothing is shared between instances.
//!
//! ```
//! use kiro_engine::{EmotionEngine, EngineConfig};
//! use emotion_types::{AttentionState, EmotionClass, EmotionFrame, EmotionScores};
//!
//! let mut engine = EmotionEngine::new(EngineConfig::default()).unwrap();
//! let frame = EmotionFrame::new(0, EmotionScores::one_hot(EmotionClass::Focused));
//! let analysis = engine.process_frame(frame, &AttentionState::default());
//! assert!(!analysis.should_intervene);
//! ```

pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;

pub use crate::analysis::{KiroAnalysis, SessionStats};
pub use crate::config::{EngineConfig, EngineConfigPatch, TierRulePatch, TierRulesPatch};
pub use crate::engine::{EmotionEngine, EngineDiagnostics};
pub use crate::error::{ConfigError, EngineError};

pub use emotion_types::{
    AttentionLevel, AttentionState, EmotionClass, EmotionDistribution, EmotionFrame, EmotionScores,
};
pub use tier_evaluator::{AttentionGate, InterventionReason, RecommendedAction, Tier, TierEvaluation, TierRule, TierRules};
