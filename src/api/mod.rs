//! # Status API
//!
//! Read-only HTTP surface of the sentinel.
//!
//! ## Endpoints
//!
//! - `GET /` and `GET /status` - Current status snapshot (JSON)
//! - `GET /metrics` - Prometheus text format metrics

mod status;

use crate::metrics::PrometheusHandle;
use crate::status::StatusReporter;
use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Shared application state accessible to all handlers.
pub struct AppState {
    pub reporter: StatusReporter,
    /// Absent when no recorder was installed (tests, `status` command)
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(reporter: StatusReporter, metrics: Option<PrometheusHandle>) -> Self {
        Self { reporter, metrics }
    }
}

/// Create the router with all endpoints.
pub fn create_router(state: Arc<AppState>, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(status::handle))
        .route("/status", get(status::handle))
        .route("/metrics", get(status::metrics))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
