//! Session Routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use emotion_types::{AttentionState, EmotionFrame};
use kiro_engine::{EmotionEngine, EngineConfig, EngineConfigPatch, EngineDiagnostics, KiroAnalysis, SessionStats};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::{Session, SharedState};

/// Response for session creation
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub config: EngineConfig,
}

/// One frame with its attention snapshot
#[derive(Debug, Deserialize)]
pub struct FrameRequest {
    pub frame: EmotionFrame,
    #[serde(default)]
    pub attention: AttentionState,
}

/// Response for the stats endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionStatsResponse {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub stats: SessionStats,
}

/// Create a session, optionally overriding the server defaults
pub async fn create_session(
    State(state): State<SharedState>,
    patch: Option<Json<EngineConfigPatch>>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), ApiError> {
    let mut state = state.write().await;

    state.evict_idle(Instant::now());
    if state.sessions.len() >= state.policy.max_sessions {
        return Err(ApiError::TooManySessions(state.sessions.len()));
    }

    let config = match patch {
        Some(Json(patch)) => state.default_config.merged(&patch),
        None => state.default_config.clone(),
    };
    let engine = EmotionEngine::new(config.clone())?;

    let session_id = Uuid::new_v4().to_string();
    let session = Session::new(engine);
    let created_at = session.created_at;
    state.sessions.insert(session_id.clone(), session);
    metrics::counter!("kiro_sessions_created_total").increment(1);
    info!(session_id = %session_id, active = state.sessions.len(), "Session created");

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id,
            created_at,
            config,
        }),
    ))
}

/// Process one frame for a session
pub async fn process_frame(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(request): Json<FrameRequest>,
) -> Result<Json<KiroAnalysis>, ApiError> {
    let mut state = state.write().await;
    let session = state.session_mut(&id)?;

    let analysis = session.engine.process_frame(request.frame, &request.attention);
    metrics::counter!("kiro_frames_processed_total").increment(1);
    if let Some(tier) = analysis.trigger_tier {
        metrics::counter!("kiro_interventions_total", "tier" => tier.as_str()).increment(1);
    }

    Ok(Json(analysis))
}

pub async fn get_stats(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatsResponse>, ApiError> {
    let state = state.read().await;
    let session = state.session(&id)?;

    Ok(Json(SessionStatsResponse {
        session_id: id,
        created_at: session.created_at,
        stats: session.engine.session_stats(),
    }))
}

pub async fn get_diagnostics(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<EngineDiagnostics>, ApiError> {
    let state = state.read().await;
    Ok(Json(state.session(&id)?.engine.diagnostics()))
}

/// Apply a partial configuration; the old one stays on rejection
pub async fn update_config(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(patch): Json<EngineConfigPatch>,
) -> Result<Json<EngineConfig>, ApiError> {
    let mut state = state.write().await;
    let session = state.session_mut(&id)?;

    session.engine.configure(&patch)?;
    Ok(Json(session.engine.config().clone()))
}

pub async fn reset_session(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut state = state.write().await;
    state.session_mut(&id)?.engine.reset();
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_session(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut state = state.write().await;
    state
        .sessions
        .remove(&id)
        .ok_or_else(|| ApiError::SessionNotFound(id.clone()))?;
    info!(session_id = %id, active = state.sessions.len(), "Session closed");
    Ok(StatusCode::NO_CONTENT)
}
