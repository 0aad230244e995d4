//! Stacking cubes one on top of the other.

use scenario_types::{ConfigError, ScenarioConfig};

use super::{ChainStep, CopyState, ScenarioVariant};

/// Success when the manipulated cube rests on its support and the support
/// has not moved.
///
/// The first chain cube stacks on the base cube, the first static slot after
/// it. With several manipulable cubes the tower is built bottom-up: each
/// later cube stacks on the slot just before it, and must succeed before the
/// next one is tried. Knocking over a cube that was already stacked starts
/// the tower over.
#[derive(Debug, Clone, Copy, Default)]
pub struct CubeTower;

impl CubeTower {
    /// Scenario type tag.
    pub const TAG: &'static str = "cube_tower";

    /// Slot the manipulated cube should rest on.
    #[must_use]
    pub fn support(state: &CopyState<'_>) -> Option<usize> {
        let manipulated = state.manipulated();
        if state.chain.position() == 0 {
            state.static_slots(manipulated + 1).first().copied()
        } else {
            manipulated.checked_sub(1)
        }
    }
}

impl ScenarioVariant for CubeTower {
    fn kind(&self) -> &'static str {
        Self::TAG
    }

    fn validate(&self, config: &ScenarioConfig) -> Result<(), ConfigError> {
        let chain = config.manipulable_slots();
        let first = chain.first().copied().unwrap_or(0);
        let has_base = (first + 1..config.models.len()).any(|slot| !chain.contains(&slot));
        if !has_base {
            return Err(ConfigError::invalid_models(format!(
                "{} needs a static base cube after slot {first}",
                Self::TAG
            )));
        }
        Ok(())
    }

    fn participating_slots(&self, state: &CopyState<'_>) -> Vec<usize> {
        let mut slots = vec![state.manipulated()];
        slots.extend(Self::support(state));
        slots
    }

    fn is_successful(&self, state: &CopyState<'_>) -> bool {
        let Some(support) = Self::support(state) else {
            return false;
        };
        let (Some(cube), Some(below)) = (state.current(state.manipulated()), state.current(support))
        else {
            return false;
        };
        let gap = (cube.bbox.bottom() - below.bbox.top()).abs();
        gap <= state.tolerances.translation_epsilon && state.unmoved(support)
    }

    fn evaluate_step(&self, state: &CopyState<'_>) -> ChainStep {
        if self.step_succeeded(state) {
            return if state.chain.is_last() {
                ChainStep::Complete
            } else {
                ChainStep::Advance
            };
        }
        match Self::support(state) {
            Some(support) if state.chain.is_passed(support) && !state.unmoved(support) => {
                ChainStep::Restart
            }
            _ => ChainStep::Retry,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::test_support::boxed;
    use super::*;
    use crate::instance::ManipulationChain;
    use nalgebra::Vector3;
    use scenario_optim::ObjectState;
    use scenario_types::{ModelConfig, ObjectKind, Pose, SimulationMode, Tolerances};

    // Table top at z = 0, chain cubes of size 2 at `levels`, then the base
    // cube resting on the table.
    fn tower(levels: &[f64]) -> Vec<ObjectState> {
        let mut slots = vec![boxed(0.0, 0.0, -1.0, 1.0)];
        slots.extend(levels.iter().map(|&z| boxed(0.0, 0.0, z, 1.0)));
        slots.push(boxed(0.0, 0.0, 1.0, 1.0));
        slots
    }

    fn evaluate(
        current: Vec<ObjectState>,
        initial: &[ObjectState],
        chain: &ManipulationChain,
    ) -> (bool, ChainStep) {
        let tol = Tolerances::default();
        let state = CopyState {
            copy: 0,
            current,
            initial,
            chain,
            tolerances: &tol,
        };
        (CubeTower.is_successful(&state), CubeTower.evaluate_step(&state))
    }

    #[test]
    fn first_cube_stacks_on_base() {
        let slots = tower(&[3.0]);
        let chain = ManipulationChain::new(vec![1]).unwrap();
        assert_eq!(evaluate(slots.clone(), &slots, &chain), (true, ChainStep::Complete));
    }

    #[test]
    fn cube_on_table_is_not_stacked() {
        let slots = tower(&[1.0]);
        let chain = ManipulationChain::new(vec![1]).unwrap();
        assert_eq!(evaluate(slots.clone(), &slots, &chain), (false, ChainStep::Retry));
    }

    #[test]
    fn learning_record_labels_cube_on_base() {
        let slots = tower(&[3.0]);
        let chain = ManipulationChain::new(vec![1]).unwrap();
        let tol = Tolerances::default();
        let state = CopyState {
            copy: 0,
            current: slots.clone(),
            initial: &slots,
            chain: &chain,
            tolerances: &tol,
        };
        let success = CubeTower.is_successful(&state);
        let record = CubeTower.extract_delta_record(&state, success);
        assert!(record.success);
        let recorded: Vec<usize> = record.slots.iter().map(|d| d.slot).collect();
        assert_eq!(recorded, vec![1, 2]);
        assert!(record.to_line().ends_with(" 1"));
    }

    #[test]
    fn gap_within_epsilon_counts() {
        let slots = tower(&[3.4]);
        let chain = ManipulationChain::new(vec![1]).unwrap();
        assert!(evaluate(slots.clone(), &slots, &chain).0);

        let slots = tower(&[3.6]);
        assert_eq!(evaluate(slots.clone(), &slots, &chain), (false, ChainStep::Retry));
    }

    #[test]
    fn moved_base_fails_without_restart() {
        let initial = tower(&[3.0]);
        let mut current = initial.clone();
        current[2].pose = current[2].pose.translated(&Vector3::new(4.0, 0.0, 0.0));
        let chain = ManipulationChain::new(vec![1]).unwrap();
        assert_eq!(evaluate(current, &initial, &chain), (false, ChainStep::Retry));
    }

    #[test]
    fn intermediate_success_advances() {
        let slots = tower(&[3.0, 7.0, 11.0]);
        let chain = ManipulationChain::new(vec![1, 2, 3]).unwrap();
        assert_eq!(evaluate(slots.clone(), &slots, &chain).1, ChainStep::Advance);
    }

    #[test]
    fn disturbed_lower_cube_restarts() {
        let initial = tower(&[3.0, 5.0, 11.0]);
        let mut chain = ManipulationChain::new(vec![1, 2, 3]).unwrap();
        chain.advance().unwrap();
        chain.advance().unwrap();

        // Cube 2 was knocked sideways while cube 3 fell short.
        let mut current = initial.clone();
        current[2].pose = current[2].pose.translated(&Vector3::new(4.0, 0.0, 0.0));
        assert_eq!(evaluate(current, &initial, &chain), (false, ChainStep::Restart));

        // Same miss with an intact support only retries.
        assert_eq!(
            evaluate(initial.clone(), &initial, &chain),
            (false, ChainStep::Retry)
        );
    }

    #[test]
    fn later_cubes_pair_with_previous_slot() {
        let slots = tower(&[3.0, 5.0]);
        let tol = Tolerances::default();
        let participating = |chain: &ManipulationChain| {
            let state = CopyState {
                copy: 0,
                current: slots.clone(),
                initial: &slots,
                chain,
                tolerances: &tol,
            };
            CubeTower.participating_slots(&state)
        };

        let mut chain = ManipulationChain::new(vec![1, 2]).unwrap();
        assert_eq!(participating(&chain), vec![1, 3]);
        chain.advance().unwrap();
        assert_eq!(participating(&chain), vec![2, 1]);
    }

    #[test]
    fn validate_requires_base_after_chain() {
        let cube = |name: &str| ModelConfig::new(name, ObjectKind::Cube, Pose::default());
        let without_base = ScenarioConfig::new(CubeTower::TAG, SimulationMode::Random)
            .with_model(cube("table"))
            .with_model(cube("manipulated_cube"));
        assert!(CubeTower.validate(&without_base).is_err());

        let with_base = without_base.with_model(cube("base_cube"));
        assert!(CubeTower.validate(&with_base).is_ok());
    }
}
