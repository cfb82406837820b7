//! API route definitions
//!
//! Organizes endpoints for the heat transfer dashboard:
//! - /api/v1/health - liveness and dataset shape
//! - /api/v1/status - refresh progress and telemetry availability
//! - /api/v1/limits - configured input ranges and defaults
//! - /api/v1/snapshot - latest render model
//! - /api/v1/live - most recent channel readings
//! - /api/v1/predict - on-demand prediction
//! - /api/v1/refresh - run a cycle immediately

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, DashboardState};

/// Create all API routes for the dashboard.
pub fn api_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/status", get(handlers::get_status))
        .route("/limits", get(handlers::get_limits))
        .route("/snapshot", get(handlers::get_snapshot))
        .route("/live", get(handlers::get_live))
        .route("/predict", post(handlers::post_predict))
        .route("/refresh", post(handlers::post_refresh))
        .with_state(state)
}

/// Legacy health endpoint at root level.
pub fn legacy_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/health", get(handlers::legacy_health_check))
        .with_state(state)
}
