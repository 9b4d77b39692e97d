//! Kiro Session Service
//!
//! HTTP front end that hosts one independent emotion engine per learner
//! session. Sessions live in memory; nothing crosses between them.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use kiro_engine::{EmotionEngine, EngineConfig};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub mod error;
pub mod routes;
pub mod settings;

pub use error::ApiError;
pub use settings::Settings;

/// One learner session
pub struct Session {
    pub engine: EmotionEngine,
    pub created_at: DateTime<Utc>,
    /// Last request that touched this session
    pub last_seen: Instant,
}

impl Session {
    pub fn new(engine: EmotionEngine) -> Self {
        Self {
            engine,
            created_at: Utc::now(),
            last_seen: Instant::now(),
        }
    }
}

/// Bounds on the session map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    /// Active sessions allowed at once
    pub max_sessions: usize,
    /// Sessions untouched this long are discarded
    pub idle_timeout: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            max_sessions: 1000,
            idle_timeout: Duration::from_secs(1800),
        }
    }
}

/// Application state shared across handlers
pub struct AppState {
    /// Active sessions by id
    pub sessions: HashMap<String, Session>,
    /// Configuration for new sessions
    pub default_config: EngineConfig,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Prometheus recorder handle, when installed
    pub prometheus: Option<PrometheusHandle>,
    pub policy: SessionPolicy,
}

pub type SharedState = Arc<RwLock<AppState>>;

impl AppState {
    /// Create new application state
    pub fn new(default_config: EngineConfig, prometheus: Option<PrometheusHandle>) -> Self {
        Self {
            sessions: HashMap::new(),
            default_config,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            prometheus,
            policy: SessionPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: SessionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Drop sessions idle for at least the policy timeout; returns how many went
    pub fn evict_idle(&mut self, now: Instant) -> usize {
        let timeout = self.policy.idle_timeout;
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| now.saturating_duration_since(session.last_seen) < timeout);

        let evicted = before - self.sessions.len();
        if evicted > 0 {
            metrics::counter!("kiro_sessions_evicted_total").increment(evicted as u64);
            info!(evicted, active = self.sessions.len(), "Idle sessions evicted");
        }
        evicted
    }

    pub fn session(&self, id: &str) -> Result<&Session, ApiError> {
        self.sessions
            .get(id)
            .ok_or_else(|| ApiError::SessionNotFound(id.to_string()))
    }

    /// Mutable access; marks the session as seen
    pub fn session_mut(&mut self, id: &str) -> Result<&mut Session, ApiError> {
        let session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| ApiError::SessionNotFound(id.to_string()))?;
        session.last_seen = Instant::now();
        Ok(session)
    }
}

/// Health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime_seconds: u64,
    pub active_sessions: usize,
}

/// Create the application router
pub fn create_router(state: SharedState) -> Router {
    use routes::sessions;

    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/sessions", post(sessions::create_session))
        .route("/api/v1/sessions/:id", axum::routing::delete(sessions::delete_session))
        .route("/api/v1/sessions/:id/frames", post(sessions::process_frame))
        .route("/api/v1/sessions/:id/stats", get(sessions::get_stats))
        .route("/api/v1/sessions/:id/diagnostics", get(sessions::get_diagnostics))
        .route("/api/v1/sessions/:id/config", axum::routing::patch(sessions::update_config))
        .route("/api/v1/sessions/:id/reset", post(sessions::reset_session))
        .route("/metrics", get(routes::metrics::get_metrics))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    let state = state.read().await;

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        active_sessions: state.sessions.len(),
    })
}

/// Initialize logging (`RUST_LOG`, default `info`)
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Periodically evict idle sessions
pub fn spawn_session_sweeper(state: SharedState, period: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let evicted = state.write().await.evict_idle(Instant::now());
            debug!(evicted, "Session sweep complete");
        }
    })
}

/// Run the server until the listener fails
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let prometheus = if settings.metrics_enabled {
        Some(PrometheusBuilder::new().install_recorder()?)
    } else {
        None
    };

    let policy = SessionPolicy {
        max_sessions: settings.max_sessions,
        idle_timeout: Duration::from_secs(settings.session_idle_timeout_secs),
    };
    let state = Arc::new(RwLock::new(
        AppState::new(settings.engine, prometheus).with_policy(policy),
    ));
    spawn_session_sweeper(state.clone(), Duration::from_secs(settings.session_sweep_secs.max(1)));
    let app = create_router(state);

    info!("Starting Kiro session service on {}", settings.bind_addr);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
