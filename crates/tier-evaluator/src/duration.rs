//! Dominant-emotion duration tracking

use emotion_types::EmotionClass;
use serde::{Deserialize, Serialize};

/// Tracks how long the dominant emotion has persisted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DurationTracker {
    /// Emotion being timed
    current: Option<EmotionClass>,
    /// Seconds the current emotion has persisted
    duration_secs: f64,
    /// Dominant-emotion changes seen since the session started
    transitions: u32,
}

impl DurationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one tick and return the updated duration.
    ///
    /// A change of dominant emotion resets the duration to 0. The first tick of
    /// a session starts at one frame interval since there is no prior emotion
    /// to change from.
    pub fn observe(&mut self, dominant: EmotionClass, frame_interval_secs: f64) -> f64 {
        match self.current {
            Some(current) if current == dominant => {
                self.duration_secs += frame_interval_secs;
            }
            Some(_) => {
                self.current = Some(dominant);
                self.duration_secs = 0.0;
                self.transitions += 1;
            }
            None => {
                self.current = Some(dominant);
                self.duration_secs = frame_interval_secs;
            }
        }
        self.duration_secs
    }

    pub fn current(&self) -> Option<EmotionClass> {
        self.current
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn transitions(&self) -> u32 {
        self.transitions
    }

    /// Reset state (on session change)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_counts_one_interval() {
        let mut tracker = DurationTracker::new();
        assert_eq!(tracker.observe(EmotionClass::Confused, 4.0), 4.0);
        assert_eq!(tracker.current(), Some(EmotionClass::Confused));
        assert_eq!(tracker.transitions(), 0);
    }

    #[test]
    fn test_accumulates_while_unchanged() {
        let mut tracker = DurationTracker::new();
        let durations: Vec<f64> = (0..5).map(|_| tracker.observe(EmotionClass::Bored, 4.0)).collect();
        assert_eq!(durations, vec![4.0, 8.0, 12.0, 16.0, 20.0]);
    }

    #[test]
    fn test_change_resets_to_zero() {
        let mut tracker = DurationTracker::new();
        tracker.observe(EmotionClass::Focused, 4.0);
        tracker.observe(EmotionClass::Focused, 4.0);

        assert_eq!(tracker.observe(EmotionClass::Tired, 4.0), 0.0);
        assert_eq!(tracker.observe(EmotionClass::Tired, 4.0), 4.0);
        assert_eq!(tracker.transitions(), 1);
    }

    #[test]
    fn test_reset() {
        let mut tracker = DurationTracker::new();
        tracker.observe(EmotionClass::Focused, 4.0);
        tracker.observe(EmotionClass::Confused, 4.0);
        tracker.reset();

        assert_eq!(tracker, DurationTracker::default());
        assert_eq!(tracker.observe(EmotionClass::Confused, 4.0), 4.0);
    }
}
