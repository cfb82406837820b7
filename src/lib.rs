//! Heatscope: Heat Transfer Analysis Dashboard
//!
//! Nearest-neighbor thermal prediction over a fixed reference dataset,
//! with optional live ambient/source readings from a remote telemetry
//! channel.
//!
//! ## Architecture
//!
//! - **Prediction Engine**: pure calculations (1-NN lookup, efficiency,
//!   coolant/material suggestion ladders, range validation)
//! - **Dataset**: immutable CSV-backed reference table loaded at startup
//! - **Telemetry**: bounded-timeout HTTP fetch of the latest two-field
//!   channel reading, degrading to manual defaults on failure
//! - **Pipeline**: periodic refresh loop publishing render-model snapshots
//! - **API**: Axum dashboard endpoints with a uniform response envelope

pub mod api;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod pipeline;
pub mod telemetry;
pub mod types;

// Re-export configuration
pub use config::AppConfig;

// Re-export commonly used types
pub use types::{
    CoolantSuggestion, InputField, InputLimits, LiveReadings, MaterialSuggestion,
    PredictionResult, QueryPoint, RangeViolation, ReferenceRow, TelemetryStatus,
};

// Re-export dataset and engine entry points
pub use dataset::{DatasetError, ReferenceDataset};
pub use engine::{
    coolant_suggestion, efficiency, material_suggestion, predict, validate, PredictError,
};

// Re-export pipeline surface
pub use pipeline::{run_cycle, AppState, DashboardSnapshot, RefreshLoop};

// Re-export telemetry components
pub use telemetry::{ChannelClient, ReadingProvider, TelemetryError};
