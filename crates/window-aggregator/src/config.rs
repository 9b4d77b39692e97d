//! Window sizing

use serde::{Deserialize, Serialize};

/// Largest window accepted by configuration validation (frames)
pub const MAX_WINDOW_FRAMES: usize = 10_000;

/// Window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Short window length (seconds)
    pub short_window_secs: f64,
    /// Long window length (seconds)
    pub long_window_secs: f64,
    /// Expected frame rate (frames per second)
    pub frame_rate_hz: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            short_window_secs: 20.0,
            long_window_secs: 60.0,
            frame_rate_hz: 0.25, // one frame every 4s
        }
    }
}

impl WindowConfig {
    /// Frames held by a window of `window_secs`: ceil(seconds × rate), at least 1
    pub fn capacity_for(&self, window_secs: f64) -> usize {
        // Tolerance keeps products like 10 × 0.3 from rounding up a whole frame.
        let frames = (window_secs * self.frame_rate_hz - 1e-9).ceil();
        if frames.is_finite() && frames >= 1.0 {
            frames as usize
        } else {
            1
        }
    }

    pub fn short_capacity(&self) -> usize {
        self.capacity_for(self.short_window_secs)
    }

    pub fn long_capacity(&self) -> usize {
        self.capacity_for(self.long_window_secs)
    }
}
