//! Query-side types: input fields, ranges, and range violations

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four input dimensions of a prediction query.
///
/// Order matters: range violations are reported in this enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputField {
    ThermalCond,
    BlockSize,
    SourceTemp,
    AmbientTemp,
}

impl InputField {
    /// All fields in reporting order.
    pub const ALL: [Self; 4] = [
        Self::ThermalCond,
        Self::BlockSize,
        Self::SourceTemp,
        Self::AmbientTemp,
    ];

    /// Column / message name of the field.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ThermalCond => "ThermalCond",
            Self::BlockSize => "BlockSize",
            Self::SourceTemp => "SourceTemp",
            Self::AmbientTemp => "AmbientTemp",
        }
    }

    /// Engineering unit of the field.
    pub const fn unit(self) -> &'static str {
        match self {
            Self::ThermalCond => "W/m·K",
            Self::BlockSize => "mm",
            Self::SourceTemp => "°C",
            Self::AmbientTemp => "°C",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single prediction query in the four-dimensional input space.
///
/// Transient — constructed fresh per prediction request, no identity
/// beyond the call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryPoint {
    /// Thermal conductivity (W/m·K)
    pub thermal_cond: f64,
    /// Block thickness (mm)
    pub block_size: f64,
    /// Hot-side temperature (°C)
    pub source_temp: f64,
    /// Cold-side temperature (°C)
    pub ambient_temp: f64,
}

impl QueryPoint {
    /// Value of the given input field.
    pub const fn get(&self, field: InputField) -> f64 {
        match field {
            InputField::ThermalCond => self.thermal_cond,
            InputField::BlockSize => self.block_size,
            InputField::SourceTemp => self.source_temp,
            InputField::AmbientTemp => self.ambient_temp,
        }
    }
}

/// Inclusive `[min, max]` range for one input field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
}

impl FieldRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Inclusive containment check — boundary values are valid.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp a value into the range.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Operator-tunable valid ranges for the four query inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputLimits {
    #[serde(default = "default_thermal_cond_range")]
    pub thermal_cond: FieldRange,
    #[serde(default = "default_block_size_range")]
    pub block_size: FieldRange,
    #[serde(default = "default_source_temp_range")]
    pub source_temp: FieldRange,
    #[serde(default = "default_ambient_temp_range")]
    pub ambient_temp: FieldRange,
}

fn default_thermal_cond_range() -> FieldRange {
    FieldRange::new(50.0, 500.0)
}

fn default_block_size_range() -> FieldRange {
    FieldRange::new(5.0, 50.0)
}

fn default_source_temp_range() -> FieldRange {
    FieldRange::new(30.0, 150.0)
}

fn default_ambient_temp_range() -> FieldRange {
    FieldRange::new(0.0, 50.0)
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            thermal_cond: default_thermal_cond_range(),
            block_size: default_block_size_range(),
            source_temp: default_source_temp_range(),
            ambient_temp: default_ambient_temp_range(),
        }
    }
}

impl InputLimits {
    /// Range for the given input field.
    pub const fn range(&self, field: InputField) -> FieldRange {
        match field {
            InputField::ThermalCond => self.thermal_cond,
            InputField::BlockSize => self.block_size,
            InputField::SourceTemp => self.source_temp,
            InputField::AmbientTemp => self.ambient_temp,
        }
    }
}

/// One input value found outside its configured range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeViolation {
    pub field: InputField,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

impl fmt::Display for RangeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} should be between {} and {}",
            self.field, self.min, self.max
        )
    }
}
