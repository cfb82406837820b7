//! Core types for the heat transfer analysis service
//!
//! Organized by concern:
//! - `query` — input fields, valid ranges, range violations
//! - `prediction` — reference rows, suggestion labels, prediction results
//! - `reading` — live telemetry readings and input provenance

pub mod prediction;
pub mod query;
pub mod reading;

pub use prediction::{CoolantSuggestion, MaterialSuggestion, PredictionResult, ReferenceRow};
pub use query::{FieldRange, InputField, InputLimits, QueryPoint, RangeViolation};
pub use reading::{EffectiveInput, LiveReadings, ReadingSource, TelemetryStatus};
