//! API route handlers
//!
//! Request handling logic for the dashboard endpoints: service health,
//! refresh status, configured limits, the latest snapshot, live
//! readings, and on-demand prediction.

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::envelope::{ApiErrorResponse, ApiResponse};
use crate::config::AppConfig;
use crate::dataset::ReferenceDataset;
use crate::engine;
use crate::pipeline::{run_cycle, AppState};
use crate::types::{InputField, LiveReadings, QueryPoint, TelemetryStatus};

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers.
#[derive(Clone)]
pub struct DashboardState {
    /// Immutable service configuration
    pub config: Arc<AppConfig>,
    /// Immutable reference dataset (the model)
    pub dataset: Arc<ReferenceDataset>,
    /// Application state from the refresh pipeline
    pub app_state: Arc<RwLock<AppState>>,
}

impl DashboardState {
    pub fn new(
        config: Arc<AppConfig>,
        dataset: Arc<ReferenceDataset>,
        app_state: Arc<RwLock<AppState>>,
    ) -> Self {
        Self {
            config,
            dataset,
            app_state,
        }
    }
}

// ============================================================================
// Health & Status
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Rows in the loaded reference dataset
    pub dataset_rows: usize,
    pub uptime_secs: i64,
}

/// GET /api/v1/health — liveness plus dataset shape.
pub async fn get_health(State(state): State<DashboardState>) -> Response {
    let app_state = state.app_state.read().await;
    ApiResponse::ok(HealthResponse {
        status: "ok",
        dataset_rows: state.dataset.len(),
        uptime_secs: (Utc::now() - app_state.started_at).num_seconds(),
    })
}

/// GET /health — legacy root-level liveness probe.
pub async fn legacy_health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub started_at: DateTime<Utc>,
    pub cycles_completed: u64,
    pub telemetry: TelemetryStatus,
    pub refresh_secs: u64,
    pub last_refresh: Option<DateTime<Utc>>,
}

/// GET /api/v1/status — refresh-loop progress and telemetry availability.
pub async fn get_status(State(state): State<DashboardState>) -> Response {
    let app_state = state.app_state.read().await;
    ApiResponse::ok(StatusResponse {
        started_at: app_state.started_at,
        cycles_completed: app_state.cycles_completed,
        telemetry: app_state.telemetry.clone(),
        refresh_secs: state.config.telemetry.refresh_secs,
        last_refresh: app_state.latest.as_ref().map(|s| s.generated_at),
    })
}

// ============================================================================
// Limits
// ============================================================================

#[derive(Debug, Serialize)]
pub struct FieldLimitEntry {
    pub field: &'static str,
    pub unit: &'static str,
    pub min: f64,
    pub max: f64,
    /// Manual fallback value for this field
    pub default: f64,
}

/// GET /api/v1/limits — configured valid ranges and manual defaults.
pub async fn get_limits(State(state): State<DashboardState>) -> Response {
    let defaults = &state.config.defaults;
    let entries: Vec<FieldLimitEntry> = InputField::ALL
        .iter()
        .map(|&field| {
            let range = state.config.limits.range(field);
            let default = match field {
                InputField::ThermalCond => defaults.thermal_cond,
                InputField::BlockSize => defaults.block_size,
                InputField::SourceTemp => defaults.source_temp,
                InputField::AmbientTemp => defaults.ambient_temp,
            };
            FieldLimitEntry {
                field: field.name(),
                unit: field.unit(),
                min: range.min,
                max: range.max,
                default,
            }
        })
        .collect();
    ApiResponse::ok(entries)
}

// ============================================================================
// Snapshot & Live Readings
// ============================================================================

/// GET /api/v1/snapshot — latest refresh-loop render model.
pub async fn get_snapshot(State(state): State<DashboardState>) -> Response {
    let app_state = state.app_state.read().await;
    match &app_state.latest {
        Some(snapshot) => ApiResponse::ok(snapshot.clone()),
        None => ApiErrorResponse::not_found("No snapshot yet — first refresh cycle pending"),
    }
}

#[derive(Debug, Serialize)]
pub struct LiveResponse {
    pub readings: LiveReadings,
    pub telemetry: TelemetryStatus,
    /// Advisory notice when live data was not used
    pub notice: Option<String>,
}

/// GET /api/v1/live — most recent channel readings and fetch outcome.
pub async fn get_live(State(state): State<DashboardState>) -> Response {
    let app_state = state.app_state.read().await;
    ApiResponse::ok(LiveResponse {
        readings: app_state.last_readings,
        telemetry: app_state.telemetry.clone(),
        notice: app_state.telemetry.notice(),
    })
}

// ============================================================================
// On-Demand Prediction
// ============================================================================

/// Body of POST /api/v1/predict — the four query inputs.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub thermal_cond: f64,
    pub block_size: f64,
    pub source_temp: f64,
    pub ambient_temp: f64,
}

/// POST /api/v1/predict — validate and predict for caller-supplied inputs.
///
/// Responds 400 with one message per violation when any input is outside
/// its configured range; predictions are suppressed until resolved.
pub async fn post_predict(
    State(state): State<DashboardState>,
    Json(request): Json<PredictRequest>,
) -> Response {
    let query = QueryPoint {
        thermal_cond: request.thermal_cond,
        block_size: request.block_size,
        source_temp: request.source_temp,
        ambient_temp: request.ambient_temp,
    };

    for field in InputField::ALL {
        if !query.get(field).is_finite() {
            return ApiErrorResponse::bad_request(format!("{field} must be a finite number"));
        }
    }

    let violations = engine::validate(&query, &state.config.limits);
    if !violations.is_empty() {
        return ApiErrorResponse::out_of_range(
            violations.iter().map(ToString::to_string).collect(),
        );
    }

    match engine::predict(&query, &state.dataset) {
        Ok(result) => ApiResponse::ok(result),
        Err(e) => ApiErrorResponse::internal(e.to_string()),
    }
}

/// POST /api/v1/refresh — run one cycle immediately with current state.
///
/// The manual counterpart of the timer tick: reuses the last fetched
/// readings rather than issuing a new outbound call.
pub async fn post_refresh(State(state): State<DashboardState>) -> Response {
    let mut app_state = state.app_state.write().await;
    let cycle = app_state.cycles_completed + 1;
    let readings = app_state.last_readings;
    let status = app_state.telemetry.clone();
    let snapshot = run_cycle(&state.config, &state.dataset, &readings, status, cycle);
    app_state.latest = Some(snapshot.clone());
    app_state.cycles_completed = cycle;
    ApiResponse::ok(snapshot)
}
