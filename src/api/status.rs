//! Status and metrics handlers.

use crate::api::AppState;
use crate::status::StatusSnapshot;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

/// GET /status - Probe, rule pair and announced status.
pub async fn handle(State(state): State<Arc<AppState>>) -> Json<StatusSnapshot> {
    Json(state.reporter.snapshot().await)
}

/// GET /metrics - Prometheus exposition format.
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let body = state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default();
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}
