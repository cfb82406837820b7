//! Suggestion ladder thresholds
//!
//! All comparisons are strictly greater-than: a value exactly at a
//! threshold falls to the next lower tier.

// === Coolant ladder (°C, predicted average temperature) ===
/// Above this, recommend liquid nitrogen
pub const COOLANT_LIQUID_NITROGEN: f64 = 80.0;
/// Above this, recommend water cooling
pub const COOLANT_WATER: f64 = 60.0;
/// Above this, recommend oil cooling; at or below, air cooling suffices
pub const COOLANT_OIL: f64 = 40.0;

// === Material ladder (W/m·K, thermal conductivity) ===
/// Above this, copper-class conductivity
pub const MATERIAL_COPPER: f64 = 300.0;
/// Above this, aluminium-class conductivity
pub const MATERIAL_ALUMINIUM: f64 = 150.0;
/// Above this, steel-class conductivity; at or below, ceramic
pub const MATERIAL_STEEL: f64 = 80.0;
