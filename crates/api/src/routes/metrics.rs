//! Prometheus exposition

use axum::extract::State;

use crate::error::ApiError;
use crate::SharedState;

/// Render the installed recorder in Prometheus text format
pub async fn get_metrics(State(state): State<SharedState>) -> Result<String, ApiError> {
    let state = state.read().await;
    state
        .prometheus
        .as_ref()
        .map(|handle| handle.render())
        .ok_or(ApiError::MetricsUnavailable)
}
