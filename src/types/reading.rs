//! Live telemetry readings and effective-input provenance

use serde::{Deserialize, Serialize};

/// Where an effective input value came from for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingSource {
    /// Manually configured default value
    Manual,
    /// Live value from the telemetry endpoint (clamped into range)
    Live,
}

/// One input value together with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectiveInput {
    pub value: f64,
    pub source: ReadingSource,
}

impl EffectiveInput {
    pub const fn manual(value: f64) -> Self {
        Self {
            value,
            source: ReadingSource::Manual,
        }
    }

    pub const fn live(value: f64) -> Self {
        Self {
            value,
            source: ReadingSource::Live,
        }
    }
}

/// The two optional readings the telemetry channel can provide.
///
/// A `None` field means the channel did not report a usable numeric value;
/// the pipeline falls back to the manual default for that field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LiveReadings {
    /// Field 1: ambient temperature (°C)
    pub ambient: Option<f64>,
    /// Field 2: source temperature (°C)
    pub source: Option<f64>,
}

impl LiveReadings {
    /// True when neither field carried a usable reading.
    pub const fn is_empty(&self) -> bool {
        self.ambient.is_none() && self.source.is_none()
    }
}

/// Outcome of the most recent telemetry fetch, for dashboard display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum TelemetryStatus {
    /// Telemetry disabled by configuration or CLI flag
    Disabled,
    /// Last fetch succeeded and returned at least one usable field
    Live,
    /// Last fetch succeeded but no usable fields were present
    NoData,
    /// Last fetch failed (network, timeout, bad status, bad body)
    Unavailable { message: String },
}

impl TelemetryStatus {
    /// Advisory notice for the user-facing surface, if any.
    pub fn notice(&self) -> Option<String> {
        match self {
            Self::Disabled | Self::Live => None,
            Self::NoData => Some(
                "Live telemetry returned no usable readings; using manual defaults".to_string(),
            ),
            Self::Unavailable { message } => Some(format!(
                "Live telemetry unavailable ({message}); using manual defaults"
            )),
        }
    }
}
