//! Live telemetry acquisition
//!
//! Fetches the latest two-field reading (ambient + source temperature)
//! from a ThingSpeak-compatible channel endpoint. The provider is an
//! optional collaborator: any failure degrades to manual defaults for
//! the current cycle and is retried implicitly on the next refresh tick.

mod client;

pub use client::{ChannelClient, TelemetryError};

use crate::types::LiveReadings;
use async_trait::async_trait;

/// Trait abstracting where live readings come from.
///
/// The refresh loop only sees this seam, so tests can substitute a
/// scripted provider without a network endpoint.
#[async_trait]
pub trait ReadingProvider: Send + Sync {
    /// Fetch the most recent channel readings.
    ///
    /// Missing or non-numeric fields are reported as `None` inside
    /// `LiveReadings`, not as errors; `Err` means the fetch itself
    /// failed (network, timeout, bad status, undecodable body).
    async fn latest(&self) -> Result<LiveReadings, TelemetryError>;

    /// Human-readable name for logging.
    fn provider_name(&self) -> &str;
}
