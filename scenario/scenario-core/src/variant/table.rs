//! Setting an object down on a table.

use scenario_types::{ConfigError, ScenarioConfig};

use super::{require_statics, CopyState, ScenarioVariant};

/// Success when the manipulated object rests on the table top (the first
/// static slot) with its centre over the table, and the table has not moved.
#[derive(Debug, Clone, Copy, Default)]
pub struct Table;

impl Table {
    /// Scenario type tag.
    pub const TAG: &'static str = "table";
}

impl ScenarioVariant for Table {
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
        let Some(&table_slot) = state.static_slots(1).first() else {
            return false;
        };
        let (Some(object), Some(table)) =
            (state.current(state.manipulated()), state.current(table_slot))
        else {
            return false;
        };
        let center = object.bbox.center();
        let over = (table.bbox.min.x..=table.bbox.max.x).contains(&center.x)
            && (table.bbox.min.y..=table.bbox.max.y).contains(&center.y);
        let resting =
            (object.bbox.bottom() - table.bbox.top()).abs() <= state.tolerances.translation_epsilon;
        over && resting && state.unmoved(table_slot)
    }
}
