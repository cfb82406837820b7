//! Refresh pipeline
//!
//! One explicit request handler invoked per event (timer tick or API
//! call) that receives the current input state and returns a render
//! model — the [`DashboardSnapshot`]. No global re-execution semantics:
//! the dataset and config are immutable inputs, and the only shared
//! mutable state is the latest snapshot behind an `RwLock`.

pub mod refresh;
pub mod resolve;

pub use refresh::{run_cycle, RefreshLoop};
pub use resolve::resolve_inputs;

use crate::types::{EffectiveInput, LiveReadings, PredictionResult, QueryPoint, TelemetryStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Effective inputs for one cycle, each tagged with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectiveInputs {
    pub thermal_cond: EffectiveInput,
    pub block_size: EffectiveInput,
    pub source_temp: EffectiveInput,
    pub ambient_temp: EffectiveInput,
}

impl EffectiveInputs {
    /// Strip provenance down to a prediction query.
    pub const fn to_query(self) -> QueryPoint {
        QueryPoint {
            thermal_cond: self.thermal_cond.value,
            block_size: self.block_size.value,
            source_temp: self.source_temp.value,
            ambient_temp: self.ambient_temp.value,
        }
    }
}

/// Render model produced by one refresh cycle.
///
/// Everything the user-facing surface needs: the effective inputs with
/// their sources, any range violations (which suppress the prediction),
/// the prediction itself, and the telemetry advisory notice.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub inputs: EffectiveInputs,
    /// Range violation messages; non-empty suppresses `prediction`
    pub violations: Vec<String>,
    pub prediction: Option<PredictionResult>,
    pub telemetry: TelemetryStatus,
    /// Advisory notice when live data was not used
    pub notice: Option<String>,
    pub generated_at: DateTime<Utc>,
    /// Monotonic cycle counter since startup
    pub cycle: u64,
}

/// Shared application state behind the API.
#[derive(Debug)]
pub struct AppState {
    /// Latest snapshot, absent until the first cycle completes
    pub latest: Option<DashboardSnapshot>,
    /// Raw readings from the most recent successful fetch
    pub last_readings: LiveReadings,
    /// Outcome of the most recent telemetry fetch
    pub telemetry: TelemetryStatus,
    /// Completed refresh cycles since startup
    pub cycles_completed: u64,
    pub started_at: DateTime<Utc>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            latest: None,
            last_readings: LiveReadings::default(),
            telemetry: TelemetryStatus::Disabled,
            cycles_completed: 0,
            started_at: Utc::now(),
        }
    }
}
