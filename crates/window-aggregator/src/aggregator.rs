//! Sliding-window aggregation over emotion frames

use crate::{AggregatorError, WindowConfig};
use emotion_types::{EmotionClass, EmotionDistribution, EmotionFrame, EmotionScores};
use ring_buffer::RingBuffer;
use tracing::debug;

/// Short/long window aggregator
pub struct WindowAggregator {
    /// Short window (~20s)
    short: RingBuffer<EmotionFrame>,
    /// Long window (~60s)
    long: RingBuffer<EmotionFrame>,
    config: WindowConfig,
}

impl WindowAggregator {
    /// Create an aggregator with empty windows sized from `config`
    pub fn new(config: WindowConfig) -> Result<Self, AggregatorError> {
        debug!(
            short = config.short_capacity(),
            long = config.long_capacity(),
            "Creating window aggregator"
        );
        Ok(Self {
            short: RingBuffer::new(config.short_capacity())?,
            long: RingBuffer::new(config.long_capacity())?,
            config,
        })
    }

    /// Insert a frame into both windows, evicting the oldest where full
    pub fn add_frame(&mut self, frame: EmotionFrame) {
        self.short.push(frame);
        self.long.push(frame);
    }

    /// Mean distribution over the short window
    pub fn short_aggregate(&self) -> EmotionDistribution {
        Self::aggregate(&self.short)
    }

    /// Mean distribution over the long window
    pub fn long_aggregate(&self) -> EmotionDistribution {
        Self::aggregate(&self.long)
    }

    fn aggregate(window: &RingBuffer<EmotionFrame>) -> EmotionDistribution {
        if window.is_empty() {
            return EmotionDistribution::uninformed();
        }

        let n = window.len() as f64;
        let mut sums = [0.0; EmotionClass::COUNT];
        for frame in window.iter() {
            for (sum, p) in sums.iter_mut().zip(frame.probabilities.values()) {
                *sum += p;
            }
        }
        for sum in sums.iter_mut() {
            *sum /= n;
        }

        EmotionDistribution::from_scores(EmotionScores::new(sums))
    }

    /// Frames held in the short window
    pub fn short_len(&self) -> usize {
        self.short.len()
    }

    /// Frames held in the long window
    pub fn long_len(&self) -> usize {
        self.long.len()
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Resize both windows, keeping the most recent frames that still fit
    pub fn reconfigure(&mut self, config: WindowConfig) -> Result<(), AggregatorError> {
        self.short.resize(config.short_capacity())?;
        self.long.resize(config.long_capacity())?;
        debug!(
            short = config.short_capacity(),
            long = config.long_capacity(),
            "Window aggregator resized"
        );
        self.config = config;
        Ok(())
    }

    /// Drop all frames
    pub fn clear(&mut self) {
        self.short.clear();
        self.long.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn frame(ts: u64, values: [f64; 4]) -> EmotionFrame {
        EmotionFrame::new(ts, EmotionScores::new(values))
    }

    #[test]
    fn test_empty_window_is_uninformed() {
        let aggregator = WindowAggregator::new(WindowConfig::default()).unwrap();
        let short = aggregator.short_aggregate();
        let long = aggregator.long_aggregate();

        assert_eq!(short, EmotionDistribution::uninformed());
        assert_eq!(long, EmotionDistribution::uninformed());
        assert_eq!(short.confidence, 0.0);
        assert_eq!(short.distribution.values(), &[0.25; 4]);
    }

    #[test]
    fn test_mean_over_window() {
        let mut aggregator = WindowAggregator::new(WindowConfig::default()).unwrap();
        aggregator.add_frame(frame(0, [0.8, 0.2, 0.0, 0.0]));
        aggregator.add_frame(frame(4000, [0.2, 0.6, 0.2, 0.0]));

        let short = aggregator.short_aggregate();
        assert!((short.distribution.get(EmotionClass::Focused) - 0.5).abs() < 1e-12);
        assert!((short.distribution.get(EmotionClass::Confused) - 0.4).abs() < 1e-12);
        assert_eq!(short.dominant, EmotionClass::Focused);
        assert!((short.confidence - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_short_window_evicts_before_long() {
        let mut aggregator = WindowAggregator::new(WindowConfig::default()).unwrap();

        // 10 focused frames, then 5 confused frames
        for i in 0..10 {
            aggregator.add_frame(frame(i * 4000, [1.0, 0.0, 0.0, 0.0]));
        }
        for i in 10..15 {
            aggregator.add_frame(frame(i * 4000, [0.0, 1.0, 0.0, 0.0]));
        }

        assert_eq!(aggregator.short_len(), 5);
        assert_eq!(aggregator.long_len(), 15);
        assert_eq!(aggregator.short_aggregate().dominant, EmotionClass::Confused);
        assert_eq!(aggregator.short_aggregate().confidence, 1.0);
        assert_eq!(aggregator.long_aggregate().dominant, EmotionClass::Focused);
    }

    #[test]
    fn test_reconfigure_keeps_recent_frames() {
        let mut aggregator = WindowAggregator::new(WindowConfig::default()).unwrap();
        for i in 0..15 {
            aggregator.add_frame(frame(i * 4000, [1.0, 0.0, 0.0, 0.0]));
        }

        aggregator
            .reconfigure(WindowConfig {
                short_window_secs: 8.0,
                long_window_secs: 40.0,
                frame_rate_hz: 0.25,
            })
            .unwrap();

        assert_eq!(aggregator.short_len(), 2);
        assert_eq!(aggregator.long_len(), 10);
    }

    #[test]
    fn test_clear() {
        let mut aggregator = WindowAggregator::new(WindowConfig::default()).unwrap();
        aggregator.add_frame(frame(0, [0.0, 0.0, 1.0, 0.0]));
        aggregator.clear();
        assert_eq!(aggregator.long_aggregate(), EmotionDistribution::uninformed());
    }

    proptest! {
        #[test]
        fn prop_windows_never_exceed_capacity(count in 0usize..60) {
            let mut aggregator = WindowAggregator::new(WindowConfig::default()).unwrap();
            for i in 0..count {
                aggregator.add_frame(frame(i as u64 * 4000, [0.25; 4]));
            }
            prop_assert_eq!(aggregator.short_len(), count.min(5));
            prop_assert_eq!(aggregator.long_len(), count.min(15));
        }
    }
}
