//! Service Configuration
//!
//! All tunable values as operator-editable TOML, with built-in defaults
//! matching the reference deployment.
//!
//! ## Loading Order
//!
//! 1. `HEATSCOPE_CONFIG` environment variable (path to TOML file)
//! 2. `heatscope.toml` in the current working directory
//! 3. Built-in defaults
//!
//! The loaded config is passed explicitly into the pipeline and API —
//! there is no global singleton, so each prediction is a pure function
//! of the dataset, the config, and the current inputs.

use crate::types::InputLimits;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Root configuration for a dashboard deployment.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Valid ranges for the four query inputs
    #[serde(default)]
    pub limits: InputLimits,

    /// Manual fallback values used when no live reading is available
    #[serde(default)]
    pub defaults: ManualDefaults,

    /// Live telemetry endpoint settings
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Reference dataset location
    #[serde(default)]
    pub dataset: DatasetConfig,
}

/// Manual input defaults, used whenever the corresponding live reading
/// is absent or unusable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ManualDefaults {
    /// Thermal conductivity (W/m·K)
    #[serde(default = "default_thermal_cond")]
    pub thermal_cond: f64,
    /// Block thickness (mm)
    #[serde(default = "default_block_size")]
    pub block_size: f64,
    /// Source temperature (°C)
    #[serde(default = "default_source_temp")]
    pub source_temp: f64,
    /// Ambient temperature (°C)
    #[serde(default = "default_ambient_temp")]
    pub ambient_temp: f64,
}

fn default_thermal_cond() -> f64 {
    100.0
}
fn default_block_size() -> f64 {
    10.0
}
fn default_source_temp() -> f64 {
    60.0
}
fn default_ambient_temp() -> f64 {
    25.0
}

impl Default for ManualDefaults {
    fn default() -> Self {
        Self {
            thermal_cond: default_thermal_cond(),
            block_size: default_block_size(),
            source_temp: default_source_temp(),
            ambient_temp: default_ambient_temp(),
        }
    }
}

/// Live-reading provider settings (ThingSpeak-compatible channel).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Master switch; when false the service runs on manual defaults only
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Base URL of the provider API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Channel identifier
    #[serde(default)]
    pub channel_id: String,
    /// Read API key appended to the feed request
    #[serde(default)]
    pub read_api_key: String,
    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Refresh cycle period (seconds)
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

fn default_true() -> bool {
    true
}
fn default_base_url() -> String {
    "https://api.thingspeak.com".to_string()
}
fn default_timeout_secs() -> u64 {
    8
}
fn default_refresh_secs() -> u64 {
    20
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            base_url: default_base_url(),
            channel_id: String::new(),
            read_api_key: String::new(),
            timeout_secs: default_timeout_secs(),
            refresh_secs: default_refresh_secs(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_addr")]
    pub addr: String,
}

fn default_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
        }
    }
}

/// Reference dataset location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path to the seven-column CSV file
    #[serde(default = "default_dataset_path")]
    pub path: PathBuf,
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("data/heat_transfer_dataset.csv")
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
        }
    }
}

impl AppConfig {
    /// Load configuration using the standard search order:
    /// 1. `HEATSCOPE_CONFIG` environment variable
    /// 2. `./heatscope.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("HEATSCOPE_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded config from HEATSCOPE_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from HEATSCOPE_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "HEATSCOPE_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from("heatscope.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded config from ./heatscope.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./heatscope.toml, using defaults");
                }
            }
        }

        info!("Using built-in default configuration");
        Self::default()
    }

    /// Load and parse a specific TOML file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Validate the configuration, returning readable messages for every
    /// problem found. An empty result means the config is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        for field in crate::types::InputField::ALL {
            let range = self.limits.range(field);
            if !range.min.is_finite() || !range.max.is_finite() {
                issues.push(format!("limits.{field}: bounds must be finite"));
            } else if range.min >= range.max {
                issues.push(format!(
                    "limits.{field}: min ({}) must be below max ({})",
                    range.min, range.max
                ));
            }
        }

        if self.telemetry.enabled {
            if self.telemetry.base_url.is_empty() {
                issues.push(
                    "telemetry.base_url must not be empty when telemetry is enabled".to_string(),
                );
            }
            if self.telemetry.timeout_secs == 0 {
                issues.push("telemetry.timeout_secs must be at least 1".to_string());
            }
            if self.telemetry.refresh_secs == 0 {
                issues.push("telemetry.refresh_secs must be at least 1".to_string());
            }
        }

        if self.server.addr.parse::<std::net::SocketAddr>().is_err() {
            issues.push(format!(
                "server.addr '{}' is not a valid socket address",
                self.server.addr
            ));
        }

        issues
    }
}
