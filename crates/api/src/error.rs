//! API error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kiro_engine::EngineError;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Handler errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] EngineError),

    #[error("Session limit reached ({0} active)")]
    TooManySessions(usize),

    #[error("Metrics recorder not installed")]
    MetricsUnavailable,
}

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidConfig(EngineError::Config(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::TooManySessions(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::MetricsUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(status = status.as_u16(), "{}", self);
        let body = ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}
