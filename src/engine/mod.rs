//! Prediction Engine
//!
//! Deterministic calculations for the heat transfer dashboard. All math
//! here is pure — no state, no I/O:
//!
//! - `validate()` — inclusive range checks against configured limits
//! - `predict()` — 1-nearest-neighbor lookup over the reference dataset
//! - `efficiency()` — normalized avg-to-ambient spread ratio
//! - `coolant_suggestion()` / `material_suggestion()` — threshold ladders
//!
//! The reference dataset itself is the model; there is no training phase.

pub mod thresholds;

use crate::dataset::ReferenceDataset;
use crate::types::{
    CoolantSuggestion, InputField, InputLimits, MaterialSuggestion, PredictionResult, QueryPoint,
    RangeViolation, ReferenceRow,
};

/// Errors raised by prediction.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("reference dataset contains no rows")]
    EmptyDataset,
}

/// Check each query field against its configured inclusive range.
///
/// Returns one violation per out-of-range field, in the fixed field
/// enumeration order (ThermalCond, BlockSize, SourceTemp, AmbientTemp).
/// Boundary values are valid. An empty result means the query may be
/// predicted.
pub fn validate(query: &QueryPoint, limits: &InputLimits) -> Vec<RangeViolation> {
    let mut violations = Vec::new();
    for field in InputField::ALL {
        let range = limits.range(field);
        let value = query.get(field);
        if !range.contains(value) {
            violations.push(RangeViolation {
                field,
                value,
                min: range.min,
                max: range.max,
            });
        }
    }
    violations
}

/// Squared Euclidean distance in the four-dimensional input space.
///
/// Unweighted and unnormalized — dimensions are compared in their raw
/// engineering units, matching the reference model.
fn squared_distance(query: &QueryPoint, row: &ReferenceRow) -> f64 {
    let dt = query.thermal_cond - row.thermal_cond;
    let db = query.block_size - row.block_size;
    let ds = query.source_temp - row.source_temp;
    let da = query.ambient_temp - row.ambient_temp;
    dt * dt + db * db + ds * ds + da * da
}

/// 1-nearest-neighbor prediction against the reference dataset.
///
/// Selects the row minimizing squared Euclidean distance to the query;
/// ties break to the first row in dataset order, so identical inputs
/// always produce identical results. Output temperatures are copied
/// verbatim from the winning row; efficiency uses the query's ambient
/// temperature and the suggestions derive from the predicted average
/// temperature and the query's thermal conductivity.
pub fn predict(
    query: &QueryPoint,
    dataset: &ReferenceDataset,
) -> Result<PredictionResult, PredictError> {
    let rows = dataset.rows();

    let mut best_index = 0usize;
    let mut best_d2 = f64::INFINITY;
    for (index, row) in rows.iter().enumerate() {
        let d2 = squared_distance(query, row);
        // Strict less-than keeps the first row on ties.
        if d2 < best_d2 {
            best_d2 = d2;
            best_index = index;
        }
    }

    let nearest = *rows.get(best_index).ok_or(PredictError::EmptyDataset)?;

    Ok(PredictionResult {
        avg_temp: nearest.avg_temp,
        max_temp: nearest.max_temp,
        center_temp: nearest.center_temp,
        efficiency: efficiency(nearest.max_temp, nearest.avg_temp, query.ambient_temp),
        coolant: coolant_suggestion(nearest.avg_temp),
        material: material_suggestion(query.thermal_cond),
        nearest,
        nearest_index: best_index,
    })
}

/// Efficiency ratio: `(max − avg) / (max − ambient)`.
///
/// Returns `0.0` when the denominator is zero so a degenerate input
/// never surfaces NaN or infinity on the dashboard. The result is not
/// clamped and can fall outside [0, 1] when avg lies outside
/// [ambient, max].
pub fn efficiency(max_temp: f64, avg_temp: f64, ambient_temp: f64) -> f64 {
    let denom = max_temp - ambient_temp;
    if denom == 0.0 {
        return 0.0;
    }
    (max_temp - avg_temp) / denom
}

/// Coolant recommendation from the predicted average temperature (°C).
pub fn coolant_suggestion(avg_temp: f64) -> CoolantSuggestion {
    if avg_temp > thresholds::COOLANT_LIQUID_NITROGEN {
        CoolantSuggestion::LiquidNitrogen
    } else if avg_temp > thresholds::COOLANT_WATER {
        CoolantSuggestion::WaterCooling
    } else if avg_temp > thresholds::COOLANT_OIL {
        CoolantSuggestion::OilCooling
    } else {
        CoolantSuggestion::AirCooling
    }
}

/// Material recommendation from the query's thermal conductivity (W/m·K).
pub fn material_suggestion(thermal_cond: f64) -> MaterialSuggestion {
    if thermal_cond > thresholds::MATERIAL_COPPER {
        MaterialSuggestion::Copper
    } else if thermal_cond > thresholds::MATERIAL_ALUMINIUM {
        MaterialSuggestion::Aluminium
    } else if thermal_cond > thresholds::MATERIAL_STEEL {
        MaterialSuggestion::Steel
    } else {
        MaterialSuggestion::Ceramic
    }
}
