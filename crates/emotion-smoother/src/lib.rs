//! Exponential Smoother
//!
//! Filters frame-to-frame classifier noise with an exponentially weighted
//! moving average per emotion class.

mod smoother;

pub use smoother::{ExponentialSmoother, DEFAULT_ALPHA};
