//! Server settings

use kiro_engine::{EngineConfig, EngineError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Environment prefix for server overrides (`KIRO_SERVER_BIND_ADDR`, `KIRO_SERVER_ENGINE__COOLDOWN_SECS`)
pub const ENV_PREFIX: &str = "KIRO_SERVER";

/// Server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Listen address
    pub bind_addr: String,

    /// Whether to install the Prometheus recorder behind `/metrics`
    pub metrics_enabled: bool,

    /// Active sessions allowed at once
    pub max_sessions: usize,

    /// Seconds without requests before a session is discarded
    pub session_idle_timeout_secs: u64,

    /// Seconds between idle-session sweeps
    pub session_sweep_secs: u64,

    /// Configuration for newly created sessions
    pub engine: EngineConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            metrics_enabled: true,
            max_sessions: 1000,
            session_idle_timeout_secs: 1800,
            session_sweep_secs: 60,
            engine: EngineConfig::default(),
        }
    }
}

impl Settings {
    /// Load defaults, then an optional file, then `KIRO_SERVER_*` environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, EngineError> {
        let mut builder = ::config::Config::builder().add_source(::config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            info!("Loading server settings from {}", path.display());
            builder = builder.add_source(::config::File::from(path));
        }

        let settings: Self = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.engine.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join(format!("kiro-server-settings-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"bind_addr": "127.0.0.1:9090", "engine": {"cooldown_secs": 45, "baseline_emotion": "focused"}}"#,
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.bind_addr, "127.0.0.1:9090");
        assert!(settings.metrics_enabled);
        assert_eq!(settings.max_sessions, 1000);
        assert_eq!(settings.session_idle_timeout_secs, 1800);
        assert_eq!(settings.engine.cooldown_secs, 45.0);
        assert_eq!(settings.engine.short_window_secs, 20.0);

        std::fs::write(&path, r#"{"engine": {"smoothing_alpha": -1}}"#).unwrap();
        assert!(Settings::load(Some(&path)).is_err());

        let _ = std::fs::remove_file(&path);
    }
}
