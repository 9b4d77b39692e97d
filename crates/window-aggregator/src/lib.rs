//! Window Aggregator
//!
//! Keeps a short and a long window of recent emotion frames and computes the
//! per-class mean distribution over each.

mod aggregator;
mod config;

pub use aggregator::WindowAggregator;
pub use config::{WindowConfig, MAX_WINDOW_FRAMES};

use thiserror::Error;

/// Aggregator errors
#[derive(Debug, Error)]
pub enum AggregatorError {
    #[error("Window buffer error: {0}")]
    Buffer(#[from] ring_buffer::BufferError),
}
