//! Prediction-side types: reference rows, suggestion labels, results

use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the reference dataset.
///
/// Four input dimensions plus the three measured temperature outputs.
/// All values are finite by construction (enforced at load time).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRow {
    /// Thermal conductivity (W/m·K)
    pub thermal_cond: f64,
    /// Block thickness (mm)
    pub block_size: f64,
    /// Hot-side temperature (°C)
    pub source_temp: f64,
    /// Cold-side temperature (°C)
    pub ambient_temp: f64,
    /// Measured average block temperature (°C)
    pub avg_temp: f64,
    /// Measured maximum block temperature (°C)
    pub max_temp: f64,
    /// Measured center temperature (°C)
    pub center_temp: f64,
}

/// Coolant recommendation tiers, hottest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoolantSuggestion {
    #[serde(rename = "Liquid Nitrogen")]
    LiquidNitrogen,
    #[serde(rename = "Water Cooling")]
    WaterCooling,
    #[serde(rename = "Oil Cooling")]
    OilCooling,
    #[serde(rename = "Air Cooling")]
    AirCooling,
}

impl CoolantSuggestion {
    pub const fn label(self) -> &'static str {
        match self {
            Self::LiquidNitrogen => "Liquid Nitrogen",
            Self::WaterCooling => "Water Cooling",
            Self::OilCooling => "Oil Cooling",
            Self::AirCooling => "Air Cooling",
        }
    }
}

impl fmt::Display for CoolantSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Block material recommendation tiers, most conductive first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialSuggestion {
    Copper,
    Aluminium,
    Steel,
    Ceramic,
}

impl MaterialSuggestion {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Copper => "Copper",
            Self::Aluminium => "Aluminium",
            Self::Steel => "Steel",
            Self::Ceramic => "Ceramic",
        }
    }
}

impl fmt::Display for MaterialSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Full result of one prediction: nearest-row temperatures plus derived
/// efficiency and suggestion labels.
///
/// Transient — created per calculation, discarded after display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Predicted average temperature (°C), from the nearest row
    pub avg_temp: f64,
    /// Predicted maximum temperature (°C), from the nearest row
    pub max_temp: f64,
    /// Predicted center temperature (°C), from the nearest row
    pub center_temp: f64,
    /// Dimensionless efficiency ratio (can fall outside [0, 1])
    pub efficiency: f64,
    pub coolant: CoolantSuggestion,
    pub material: MaterialSuggestion,
    /// The full nearest matching reference row, for display
    pub nearest: ReferenceRow,
    /// Zero-based index of the nearest row in dataset order
    pub nearest_index: usize,
}
