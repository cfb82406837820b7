//! Effective input resolution
//!
//! Live readings override the manual defaults for the two temperature
//! fields, clamped into the configured valid range so a sensor spike
//! can never push the query outside the model's domain. Material and
//! geometry are always manual — the channel has no sensors for them.

use super::EffectiveInputs;
use crate::config::ManualDefaults;
use crate::types::{EffectiveInput, InputLimits, LiveReadings};

/// Combine manual defaults and live readings into one effective input
/// set for a cycle.
pub fn resolve_inputs(
    defaults: &ManualDefaults,
    live: &LiveReadings,
    limits: &InputLimits,
) -> EffectiveInputs {
    let ambient_temp = match live.ambient {
        Some(value) => EffectiveInput::live(limits.ambient_temp.clamp(value)),
        None => EffectiveInput::manual(defaults.ambient_temp),
    };
    let source_temp = match live.source {
        Some(value) => EffectiveInput::live(limits.source_temp.clamp(value)),
        None => EffectiveInput::manual(defaults.source_temp),
    };

    EffectiveInputs {
        thermal_cond: EffectiveInput::manual(defaults.thermal_cond),
        block_size: EffectiveInput::manual(defaults.block_size),
        source_temp,
        ambient_temp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReadingSource;

    #[test]
    fn test_no_live_data_uses_manual_defaults() {
        let inputs = resolve_inputs(
            &ManualDefaults::default(),
            &LiveReadings::default(),
            &InputLimits::default(),
        );

        assert_eq!(inputs.ambient_temp.value, 25.0);
        assert_eq!(inputs.ambient_temp.source, ReadingSource::Manual);
        assert_eq!(inputs.source_temp.value, 60.0);
        assert_eq!(inputs.source_temp.source, ReadingSource::Manual);
        assert_eq!(inputs.thermal_cond.value, 100.0);
        assert_eq!(inputs.block_size.value, 10.0);
    }

    #[test]
    fn test_live_readings_override_defaults() {
        let live = LiveReadings {
            ambient: Some(22.5),
            source: Some(65.0),
        };
        let inputs = resolve_inputs(
            &ManualDefaults::default(),
            &live,
            &InputLimits::default(),
        );

        assert_eq!(inputs.ambient_temp.value, 22.5);
        assert_eq!(inputs.ambient_temp.source, ReadingSource::Live);
        assert_eq!(inputs.source_temp.value, 65.0);
        assert_eq!(inputs.source_temp.source, ReadingSource::Live);
    }

    #[test]
    fn test_live_readings_clamped_into_range() {
        // Ambient valid range [0, 50], source [30, 150].
        let live = LiveReadings {
            ambient: Some(71.3),
            source: Some(12.0),
        };
        let inputs = resolve_inputs(
            &ManualDefaults::default(),
            &live,
            &InputLimits::default(),
        );

        assert_eq!(inputs.ambient_temp.value, 50.0);
        assert_eq!(inputs.source_temp.value, 30.0);
        // Clamped values still count as live data.
        assert_eq!(inputs.ambient_temp.source, ReadingSource::Live);
    }

    #[test]
    fn test_partial_live_data_mixes_sources() {
        let live = LiveReadings {
            ambient: Some(18.0),
            source: None,
        };
        let inputs = resolve_inputs(
            &ManualDefaults::default(),
            &live,
            &InputLimits::default(),
        );

        assert_eq!(inputs.ambient_temp.source, ReadingSource::Live);
        assert_eq!(inputs.source_temp.source, ReadingSource::Manual);
        assert_eq!(inputs.source_temp.value, 60.0);
    }

    #[test]
    fn test_material_and_geometry_always_manual() {
        let live = LiveReadings {
            ambient: Some(20.0),
            source: Some(70.0),
        };
        let inputs = resolve_inputs(
            &ManualDefaults::default(),
            &live,
            &InputLimits::default(),
        );

        assert_eq!(inputs.thermal_cond.source, ReadingSource::Manual);
        assert_eq!(inputs.block_size.source, ReadingSource::Manual);
    }
}
