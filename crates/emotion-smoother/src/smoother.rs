//! EWMA over emotion probability vectors

use emotion_types::{EmotionClass, EmotionScores};
use tracing::trace;

/// Default smoothing factor
pub const DEFAULT_ALPHA: f64 = 0.2;

/// Exponentially weighted moving average per emotion class.
///
/// `alpha` is the weight on the newest frame: 1 passes input through, 0
/// freezes the state after the first update.
#[derive(Debug, Clone)]
pub struct ExponentialSmoother {
    /// Current smoothed estimate
    smoothed: EmotionScores,
    /// Smoothing factor (0-1, higher = more weight on recent)
    alpha: f64,
    /// Whether initialized with first value
    initialized: bool,
    /// Updates applied since the last reset
    updates: u64,
}

impl ExponentialSmoother {
    /// Create a new smoother; `alpha` is clamped to [0, 1]
    pub fn new(alpha: f64) -> Self {
        Self {
            smoothed: EmotionScores::uniform(),
            alpha: clamp_alpha(alpha),
            initialized: false,
            updates: 0,
        }
    }

    /// Fold one probability vector into the estimate
    pub fn update(&mut self, probabilities: &EmotionScores) -> &EmotionScores {
        self.updates += 1;

        if !self.initialized {
            // No blend toward a prior: confidence is meaningful from the first frame.
            self.smoothed = *probabilities;
            self.initialized = true;
            return &self.smoothed;
        }

        for class in EmotionClass::ALL {
            let blended = self.alpha * probabilities.get(class) + (1.0 - self.alpha) * self.smoothed.get(class);
            self.smoothed.set(class, blended);
        }
        trace!(dominant = %self.dominant(), margin = self.confidence_margin(), "Smoothed frame");

        &self.smoothed
    }

    /// Class with the highest smoothed probability
    pub fn dominant(&self) -> EmotionClass {
        self.smoothed.dominant()
    }

    /// Gap between the top two smoothed probabilities; small values flag ambiguous states
    pub fn confidence_margin(&self) -> f64 {
        self.smoothed.margin()
    }

    /// Current smoothed estimate (uniform before the first update)
    pub fn smoothed(&self) -> &EmotionScores {
        &self.smoothed
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Change the smoothing factor without discarding state
    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = clamp_alpha(alpha);
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn update_count(&self) -> u64 {
        self.updates
    }

    /// Reset the smoother
    pub fn reset(&mut self) {
        self.smoothed = EmotionScores::uniform();
        self.initialized = false;
        self.updates = 0;
    }
}

impl Default for ExponentialSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}

fn clamp_alpha(alpha: f64) -> f64 {
    if alpha.is_finite() {
        alpha.clamp(0.0, 1.0)
    } else {
        DEFAULT_ALPHA
    }
}
