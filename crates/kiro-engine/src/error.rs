//! Engine error types

use tier_evaluator::Tier;
use thiserror::Error;

/// Rejected configuration values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("smoothing_alpha {0} must be within [0, 1]")]
    AlphaOutOfRange(f64),

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} needs {frames} frames, more than the {max} allowed")]
    WindowTooLarge {
        field: &'static str,
        frames: usize,
        max: usize,
    },

    #[error("{tier} duration range is inverted: min {min} > max {max}")]
    InvertedRange { tier: Tier, min: f64, max: f64 },
}

/// Engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Window setup failed: {0}")]
    Window(#[from] window_aggregator::AggregatorError),
}
