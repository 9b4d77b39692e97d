//! Per-session orchestrator

use crate::analysis::{KiroAnalysis, SessionStats};
use crate::config::{EngineConfig, EngineConfigPatch};
use crate::error::EngineError;
use emotion_smoother::ExponentialSmoother;
use emotion_types::{AttentionState, EmotionClass, EmotionFrame};
use serde::{Deserialize, Serialize};
use tier_evaluator::{EvaluatorDiagnostics, TierEvaluator, TierInput};
use tracing::{debug, info, warn};
use window_aggregator::WindowAggregator;

/// Read-only view of engine internals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineDiagnostics {
    pub frames_processed: u64,
    pub sanitized_frames: u64,
    pub short_window_len: usize,
    pub short_window_capacity: usize,
    pub long_window_len: usize,
    pub long_window_capacity: usize,
    pub smoothed_dominant: EmotionClass,
    pub confidence_margin: f64,
    pub smoothing_alpha: f64,
    pub evaluator: EvaluatorDiagnostics,
}

/// Learner-state engine; one instance per session
pub struct EmotionEngine {
    config: EngineConfig,
    aggregator: WindowAggregator,
    smoother: ExponentialSmoother,
    evaluator: TierEvaluator,
    frame_count: u64,
    sanitized_frames: u64,
    first_timestamp_ms: Option<u64>,
    latest_timestamp_ms: Option<u64>,
}

impl EmotionEngine {
    /// Validate `config` and build the pipeline stages
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;

        info!(
            alpha = config.smoothing_alpha,
            short_window_secs = config.short_window_secs,
            long_window_secs = config.long_window_secs,
            cooldown_secs = config.cooldown_secs,
            "Initializing emotion engine"
        );

        Ok(Self {
            aggregator: WindowAggregator::new(config.window_config())?,
            smoother: ExponentialSmoother::new(config.smoothing_alpha),
            evaluator: TierEvaluator::new(config.evaluator_config()),
            config,
            frame_count: 0,
            sanitized_frames: 0,
            first_timestamp_ms: None,
            latest_timestamp_ms: None,
        })
    }

    /// Run one frame through aggregation, smoothing and tier evaluation
    pub fn process_frame(&mut self, frame: EmotionFrame, attention: &AttentionState) -> KiroAnalysis {
        let frame = self.sanitize(frame);

        self.frame_count += 1;
        self.first_timestamp_ms.get_or_insert(frame.timestamp_ms);
        self.latest_timestamp_ms = Some(
            self.latest_timestamp_ms
                .map_or(frame.timestamp_ms, |latest| latest.max(frame.timestamp_ms)),
        );

        self.aggregator.add_frame(frame);
        let short = self.aggregator.short_aggregate();
        let long = self.aggregator.long_aggregate();

        let smoothed = *self.smoother.update(&frame.probabilities);
        let dominant = smoothed.dominant();

        let evaluation = self.evaluator.evaluate(&TierInput {
            dominant,
            short: &short,
            long: &long,
            attention,
            timestamp_ms: frame.timestamp_ms,
        });

        debug!(
            frame = self.frame_count,
            dominant = %dominant,
            duration_secs = evaluation.duration_secs,
            should_trigger = evaluation.should_trigger,
            "Frame processed"
        );

        KiroAnalysis::assemble(
            evaluation,
            short,
            long,
            smoothed,
            attention.clone(),
            frame.timestamp_ms,
            self.is_ready(),
        )
    }

    fn sanitize(&mut self, frame: EmotionFrame) -> EmotionFrame {
        if frame.probabilities.is_well_formed() {
            return frame;
        }

        self.sanitized_frames += 1;
        warn!(
            timestamp_ms = frame.timestamp_ms,
            probabilities = ?frame.probabilities.values(),
            "Malformed probabilities repaired"
        );
        EmotionFrame::new(frame.timestamp_ms, frame.probabilities.sanitized())
    }

    /// Start a new session with the current configuration
    pub fn reset(&mut self) {
        self.aggregator.clear();
        self.smoother.reset();
        self.evaluator.reset();
        self.frame_count = 0;
        self.sanitized_frames = 0;
        self.first_timestamp_ms = None;
        self.latest_timestamp_ms = None;
        info!("Emotion engine reset");
    }

    /// Merge and apply a partial configuration.
    ///
    /// The merged configuration is validated as a whole; on error nothing
    /// changes. Session state (windows, smoother, duration, cooldown) is kept.
    pub fn configure(&mut self, patch: &EngineConfigPatch) -> Result<(), EngineError> {
        let merged = self.config.merged(patch);
        merged.validate()?;

        if merged.window_config() != *self.aggregator.config() {
            self.aggregator.reconfigure(merged.window_config())?;
        }
        self.smoother.set_alpha(merged.smoothing_alpha);
        self.evaluator.set_config(merged.evaluator_config());

        info!(
            alpha = merged.smoothing_alpha,
            cooldown_secs = merged.cooldown_secs,
            away_idle_threshold_secs = merged.away_idle_threshold_secs,
            "Emotion engine reconfigured"
        );
        self.config = merged;
        Ok(())
    }

    pub fn session_stats(&self) -> SessionStats {
        let elapsed_secs = match (self.first_timestamp_ms, self.latest_timestamp_ms) {
            (Some(first), Some(latest)) => latest.saturating_sub(first) as f64 / 1000.0,
            _ => 0.0,
        };
        let average_frame_rate_hz = if elapsed_secs > 0.0 {
            (self.frame_count - 1) as f64 / elapsed_secs
        } else {
            0.0
        };

        SessionStats {
            frame_count: self.frame_count,
            elapsed_secs,
            average_frame_rate_hz,
            interventions: self.evaluator.fire_counts().total(),
            sanitized_frames: self.sanitized_frames,
            is_ready: self.is_ready(),
        }
    }

    /// Whether enough frames have been seen for stable analysis
    pub fn is_ready(&self) -> bool {
        self.frame_count >= u64::from(self.config.ready_frame_count)
    }

    pub fn diagnostics(&self) -> EngineDiagnostics {
        let windows = self.aggregator.config();
        EngineDiagnostics {
            frames_processed: self.frame_count,
            sanitized_frames: self.sanitized_frames,
            short_window_len: self.aggregator.short_len(),
            short_window_capacity: windows.short_capacity(),
            long_window_len: self.aggregator.long_len(),
            long_window_capacity: windows.long_capacity(),
            smoothed_dominant: self.smoother.dominant(),
            confidence_margin: self.smoother.confidence_margin(),
            smoothing_alpha: self.smoother.alpha(),
            evaluator: self.evaluator.diagnostics(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
