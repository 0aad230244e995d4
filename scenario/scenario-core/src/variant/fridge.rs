//! Putting an object inside a fridge.

use scenario_types::{ConfigError, ScenarioConfig};

use super::{require_statics, CopyState, ScenarioVariant};

/// Success when the manipulated object's footprint lies inside the fridge
/// (the first static slot), it has not dropped below the fridge floor, and
/// the fridge has not moved.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fridge;

impl Fridge {
    /// Scenario type tag.
    pub const TAG: &'static str = "fridge";
}

impl ScenarioVariant for Fridge {
    fn kind(&self) -> &'static str {
        Self::TAG
    }

    fn validate(&self, config: &ScenarioConfig) -> Result<(), ConfigError> {
        require_statics(config, Self::TAG, 1)
    }

    fn participating_slots(&self, state: &CopyState<'_>) -> Vec<usize> {
        let mut slots = vec![state.manipulated()];
        slots.extend(state.static_slots(1).first());
        slots
    }

    fn is_successful(&self, state: &CopyState<'_>) -> bool {
        let Some(&fridge_slot) = state.static_slots(1).first() else {
            return false;
        };
        let (Some(object), Some(fridge)) =
            (state.current(state.manipulated()), state.current(fridge_slot))
        else {
            return false;
        };
        let tol = state.tolerances.translation_tolerance;
        fridge.bbox.contains_xy(&object.bbox)
            && object.bbox.bottom() >= fridge.bbox.bottom() - tol
            && state.unmoved(fridge_slot)
    }
}
