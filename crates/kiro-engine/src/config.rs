//! Engine configuration

use crate::error::{ConfigError, EngineError};
use emotion_smoother::DEFAULT_ALPHA;
use emotion_types::EmotionClass;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tier_evaluator::{AttentionGate, EvaluatorConfig, Tier, TierRule, TierRules};
use tracing::info;
use window_aggregator::{WindowConfig, MAX_WINDOW_FRAMES};

/// Frames required before `is_ready` reports true
pub const DEFAULT_READY_FRAMES: u32 = 3;

/// Environment prefix for configuration overrides (`KIRO_COOLDOWN_SECS`, `KIRO_TIERS__CONFUSION__MIN_DURATION_SECS`)
pub const ENV_PREFIX: &str = "KIRO";

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// EWMA weight on the newest frame (0-1)
    pub smoothing_alpha: f64,

    /// Short aggregation window (seconds)
    pub short_window_secs: f64,

    /// Long aggregation window (seconds)
    pub long_window_secs: f64,

    /// Capture cadence (frames per second)
    pub frame_rate_hz: f64,

    /// Emotion treated as "do not disturb"
    pub baseline_emotion: EmotionClass,

    /// Emotion-tier conditions
    pub tiers: TierRules,

    /// Idle seconds before an away learner is prompted
    pub away_idle_threshold_secs: f64,

    /// Minimum seconds between any two interventions
    pub cooldown_secs: f64,

    /// Frames processed before analyses are considered reliable
    pub ready_frame_count: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: DEFAULT_ALPHA,
            short_window_secs: 20.0,
            long_window_secs: 60.0,
            frame_rate_hz: 0.25,
            baseline_emotion: EmotionClass::Focused,
            tiers: TierRules::default(),
            away_idle_threshold_secs: 120.0,
            cooldown_secs: 120.0,
            ready_frame_count: DEFAULT_READY_FRAMES,
        }
    }
}

impl EngineConfig {
    /// Earlier interventions, shorter cooldown
    pub fn strict() -> Self {
        Self {
            tiers: TierRules {
                confusion: TierRule::new(EmotionClass::Confused, 60.0, 90.0, AttentionGate::Any),
                disengagement: TierRule::new(EmotionClass::Bored, 120.0, 180.0, AttentionGate::LowOrMedium),
                fatigue: TierRule::new(EmotionClass::Tired, 120.0, 180.0, AttentionGate::LowOrInactive),
            },
            away_idle_threshold_secs: 60.0,
            cooldown_secs: 60.0,
            ..Default::default()
        }
    }

    /// Later interventions, longer cooldown
    pub fn lenient() -> Self {
        Self {
            tiers: TierRules {
                confusion: TierRule::new(EmotionClass::Confused, 120.0, 180.0, AttentionGate::Any),
                disengagement: TierRule::new(EmotionClass::Bored, 240.0, 300.0, AttentionGate::LowOrMedium),
                fatigue: TierRule::new(EmotionClass::Tired, 240.0, 300.0, AttentionGate::LowOrInactive),
            },
            away_idle_threshold_secs: 180.0,
            cooldown_secs: 300.0,
            ..Default::default()
        }
    }

    /// Load defaults, then an optional file, then `KIRO_*` environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, EngineError> {
        let mut builder = ::config::Config::builder().add_source(::config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            info!("Loading engine configuration from {}", path.display());
            builder = builder.add_source(::config::File::from(path));
        }

        let config: Self = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check every value; the first violation is returned
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.smoothing_alpha.is_finite() || !(0.0..=1.0).contains(&self.smoothing_alpha) {
            return Err(ConfigError::AlphaOutOfRange(self.smoothing_alpha));
        }

        positive("short_window_secs", self.short_window_secs)?;
        positive("long_window_secs", self.long_window_secs)?;
        positive("frame_rate_hz", self.frame_rate_hz)?;
        let windows = self.window_config();
        window_fits("short_window_secs", windows.short_capacity())?;
        window_fits("long_window_secs", windows.long_capacity())?;
        non_negative("away_idle_threshold_secs", self.away_idle_threshold_secs)?;
        non_negative("cooldown_secs", self.cooldown_secs)?;

        for (tier, rule) in self.tiers.iter() {
            let (min_field, max_field) = range_fields(tier);
            non_negative(min_field, rule.min_duration_secs)?;
            non_negative(max_field, rule.max_duration_secs)?;
            if rule.min_duration_secs > rule.max_duration_secs {
                return Err(ConfigError::InvertedRange {
                    tier,
                    min: rule.min_duration_secs,
                    max: rule.max_duration_secs,
                });
            }
        }

        Ok(())
    }

    /// Nominal seconds between frames
    pub fn frame_interval_secs(&self) -> f64 {
        1.0 / self.frame_rate_hz
    }

    pub fn window_config(&self) -> WindowConfig {
        WindowConfig {
            short_window_secs: self.short_window_secs,
            long_window_secs: self.long_window_secs,
            frame_rate_hz: self.frame_rate_hz,
        }
    }

    pub fn evaluator_config(&self) -> EvaluatorConfig {
        EvaluatorConfig {
            frame_interval_secs: self.frame_interval_secs(),
            baseline_emotion: self.baseline_emotion,
            tiers: self.tiers.clone(),
            away_idle_threshold_secs: self.away_idle_threshold_secs,
            cooldown_secs: self.cooldown_secs,
        }
    }

    /// Copy with the patch's fields applied (not validated)
    pub fn merged(&self, patch: &EngineConfigPatch) -> Self {
        let mut merged = self.clone();
        if let Some(v) = patch.smoothing_alpha {
            merged.smoothing_alpha = v;
        }
        if let Some(v) = patch.short_window_secs {
            merged.short_window_secs = v;
        }
        if let Some(v) = patch.long_window_secs {
            merged.long_window_secs = v;
        }
        if let Some(v) = patch.frame_rate_hz {
            merged.frame_rate_hz = v;
        }
        if let Some(v) = patch.baseline_emotion {
            merged.baseline_emotion = v;
        }
        if let Some(tiers) = &patch.tiers {
            tiers.apply(&mut merged.tiers);
        }
        if let Some(v) = patch.away_idle_threshold_secs {
            merged.away_idle_threshold_secs = v;
        }
        if let Some(v) = patch.cooldown_secs {
            merged.cooldown_secs = v;
        }
        if let Some(v) = patch.ready_frame_count {
            merged.ready_frame_count = v;
        }
        merged
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn window_fits(field: &'static str, frames: usize) -> Result<(), ConfigError> {
    if frames <= MAX_WINDOW_FRAMES {
        Ok(())
    } else {
        Err(ConfigError::WindowTooLarge {
            field,
            frames,
            max: MAX_WINDOW_FRAMES,
        })
    }
}

fn range_fields(tier: Tier) -> (&'static str, &'static str) {
    match tier {
        Tier::Confusion => ("tiers.confusion.min_duration_secs", "tiers.confusion.max_duration_secs"),
        Tier::Disengagement => (
            "tiers.disengagement.min_duration_secs",
            "tiers.disengagement.max_duration_secs",
        ),
        Tier::Fatigue => ("tiers.fatigue.min_duration_secs", "tiers.fatigue.max_duration_secs"),
        Tier::Away => ("away_idle_threshold_secs", "away_idle_threshold_secs"),
    }
}

/// Partial update to one tier rule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierRulePatch {
    pub emotion: Option<EmotionClass>,
    pub min_duration_secs: Option<f64>,
    pub max_duration_secs: Option<f64>,
    pub attention: Option<AttentionGate>,
}

impl TierRulePatch {
    fn apply(&self, rule: &mut TierRule) {
        if let Some(v) = self.emotion {
            rule.emotion = v;
        }
        if let Some(v) = self.min_duration_secs {
            rule.min_duration_secs = v;
        }
        if let Some(v) = self.max_duration_secs {
            rule.max_duration_secs = v;
        }
        if let Some(v) = self.attention {
            rule.attention = v;
        }
    }
}

/// Partial update to the tier rules
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierRulesPatch {
    pub confusion: Option<TierRulePatch>,
    pub disengagement: Option<TierRulePatch>,
    pub fatigue: Option<TierRulePatch>,
}

impl TierRulesPatch {
    fn apply(&self, rules: &mut TierRules) {
        if let Some(p) = &self.confusion {
            p.apply(&mut rules.confusion);
        }
        if let Some(p) = &self.disengagement {
            p.apply(&mut rules.disengagement);
        }
        if let Some(p) = &self.fatigue {
            p.apply(&mut rules.fatigue);
        }
    }
}

/// Partial configuration accepted by [`crate::EmotionEngine::configure`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfigPatch {
    pub smoothing_alpha: Option<f64>,
    pub short_window_secs: Option<f64>,
    pub long_window_secs: Option<f64>,
    pub frame_rate_hz: Option<f64>,
    pub baseline_emotion: Option<EmotionClass>,
    pub tiers: Option<TierRulesPatch>,
    pub away_idle_threshold_secs: Option<f64>,
    pub cooldown_secs: Option<f64>,
    pub ready_frame_count: Option<u32>,
}

impl EngineConfigPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
        assert!(EngineConfig::strict().validate().is_ok());
        assert!(EngineConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_alpha_bounds() {
        for alpha in [0.0, 0.5, 1.0] {
            let config = EngineConfig {
                smoothing_alpha: alpha,
                ..Default::default()
            };
            assert!(config.validate().is_ok());
        }
        for alpha in [-0.1, 1.01, f64::NAN] {
            let config = EngineConfig {
                smoothing_alpha: alpha,
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(ConfigError::AlphaOutOfRange(_))));
        }
    }

    #[test]
    fn test_negative_and_inverted_ranges() {
        let mut config = EngineConfig::default();
        config.cooldown_secs = -1.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::Negative {
                field: "cooldown_secs",
                value: -1.0
            })
        );

        let mut config = EngineConfig::default();
        config.tiers.fatigue.min_duration_secs = 300.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvertedRange {
                tier: Tier::Fatigue,
                min: 300.0,
                max: 240.0
            })
        );

        let mut config = EngineConfig::default();
        config.frame_rate_hz = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::NonPositive { field: "frame_rate_hz", .. })));
    }

    #[test]
    fn test_window_frame_limit() {
        let config = EngineConfig {
            long_window_secs: 1e13,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::WindowTooLarge {
                field: "long_window_secs",
                ..
            })
        ));

        // 40_000s at 0.25 Hz is exactly the limit
        let config = EngineConfig {
            long_window_secs: 40_000.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let config = EngineConfig {
            short_window_secs: 20.0,
            frame_rate_hz: 1e6,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::WindowTooLarge {
                field: "short_window_secs",
                ..
            })
        ));
    }

    #[test]
    fn test_derived_configs() {
        let config = EngineConfig::default();
        assert_eq!(config.frame_interval_secs(), 4.0);
        assert_eq!(config.window_config().short_capacity(), 5);
        assert_eq!(config.window_config().long_capacity(), 15);
        assert_eq!(config.evaluator_config().cooldown_ms(), 120_000);
    }

    #[test]
    fn test_patch_merges_nested_fields() {
        let patch: EngineConfigPatch = serde_json::from_str(
            r#"{"cooldown_secs": 60, "tiers": {"confusion": {"max_duration_secs": 150}}}"#,
        )
        .unwrap();
        let merged = EngineConfig::default().merged(&patch);

        assert_eq!(merged.cooldown_secs, 60.0);
        assert_eq!(merged.tiers.confusion.min_duration_secs, 90.0);
        assert_eq!(merged.tiers.confusion.max_duration_secs, 150.0);
        assert_eq!(merged.tiers.disengagement, TierRules::default().disengagement);
        assert!(!patch.is_empty());
        assert!(EngineConfigPatch::default().is_empty());
    }

    #[test]
    fn test_load_layers_file_and_environment() {
        let path = std::env::temp_dir().join(format!("kiro-engine-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "smoothing_alpha = 0.5\ncooldown_secs = 90\n\n[tiers.confusion]\nmin_duration_secs = 60\n",
        )
        .unwrap();

        let config = EngineConfig::load(Some(&path)).unwrap();
        assert_eq!(config.smoothing_alpha, 0.5);
        assert_eq!(config.cooldown_secs, 90.0);
        assert_eq!(config.tiers.confusion.min_duration_secs, 60.0);
        assert_eq!(config.tiers.confusion.max_duration_secs, 120.0);
        assert_eq!(config.long_window_secs, 60.0);

        std::env::set_var("KIRO_AWAY_IDLE_THRESHOLD_SECS", "75");
        let config = EngineConfig::load(Some(&path));
        std::env::remove_var("KIRO_AWAY_IDLE_THRESHOLD_SECS");
        assert_eq!(config.unwrap().away_idle_threshold_secs, 75.0);

        std::fs::write(&path, "smoothing_alpha = 2.0\n").unwrap();
        assert!(matches!(
            EngineConfig::load(Some(&path)),
            Err(EngineError::Config(ConfigError::AlphaOutOfRange(_)))
        ));

        let _ = std::fs::remove_file(&path);
    }
}
