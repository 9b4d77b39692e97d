//! Bounded Ring Buffer
//!
//! Fixed-capacity circular storage for recent frame history. Insertion and
//! eviction of the oldest element are both O(1).

mod buffer;

pub use buffer::RingBuffer;

use thiserror::Error;

/// Ring buffer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("Ring buffer capacity must be at least 1")]
    ZeroCapacity,
}
