//! Placing an object between two others on a shelf.

use scenario_types::{ConfigError, ScenarioConfig};

use super::{require_statics, static_pair, CopyState, ScenarioVariant};

/// Success when the manipulated object ends up between two static objects
/// along X, level with the second one, without pushing either away.
///
/// The learning-data label uses the first two static slots. Trials accept
/// any ordered pair of static slots from slot 2 on.
#[derive(Debug, Clone, Copy, Default)]
pub struct Container;

impl Container {
    /// Scenario type tag.
    pub const TAG: &'static str = "container";

    /// Whether `manipulated` sits between `first` and `second`.
    ///
    /// The left neighbour is the one whose box ends first along X.
    #[must_use]
    pub fn placed_between(
        state: &CopyState<'_>,
        manipulated: usize,
        first: usize,
        second: usize,
    ) -> bool {
        let (Some(m), Some(a), Some(b)) = (
            state.current(manipulated),
            state.current(first),
            state.current(second),
        ) else {
            return false;
        };
        let tol = state.tolerances.translation_tolerance;

        let level = (m.bbox.bottom() - b.bbox.bottom()).abs() <= tol;
        let (left, right) = if a.bbox.max.x <= b.bbox.max.x {
            (a, b)
        } else {
            (b, a)
        };
        let between = m.bbox.min.x > left.bbox.max.x - tol && m.bbox.max.x < right.bbox.min.x + tol;

        level && between && state.unmoved(first) && state.unmoved(second)
    }
}

impl ScenarioVariant for Container {
    fn kind(&self) -> &'static str {
        Self::TAG
    }

    fn validate(&self, config: &ScenarioConfig) -> Result<(), ConfigError> {
        require_statics(config, Self::TAG, 2)
    }

    fn participating_slots(&self, state: &CopyState<'_>) -> Vec<usize> {
        let mut slots = vec![state.manipulated()];
        if let Some((a, b)) = static_pair(state, 1) {
            slots.extend([a, b]);
        }
        slots
    }

    fn is_successful(&self, state: &CopyState<'_>) -> bool {
        static_pair(state, 1)
            .is_some_and(|(a, b)| Self::placed_between(state, state.manipulated(), a, b))
    }

    fn step_succeeded(&self, state: &CopyState<'_>) -> bool {
        let m = state.manipulated();
        let statics = state.static_slots(2);
        statics.iter().enumerate().any(|(i, &a)| {
            statics[i + 1..]
                .iter()
                .any(|&b| Self::placed_between(state, m, a, b))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::test_support::boxed;
    use super::*;
    use crate::instance::ManipulationChain;
    use crate::variant::ChainStep;
    use nalgebra::Vector3;
    use scenario_optim::ObjectState;
    use scenario_types::Tolerances;

    // Slot 0 shelf, slot 1 manipulated, slots 2 and 3 books either side.
    fn shelf(manipulated_x: f64) -> Vec<ObjectState> {
        vec![
            boxed(0.0, 0.0, -10.0, 10.0),
            boxed(manipulated_x, 0.0, 1.0, 1.0),
            boxed(-5.0, 0.0, 1.0, 1.0),
            boxed(5.0, 0.0, 1.0, 1.0),
        ]
    }

    fn state<'a>(
        current: Vec<ObjectState>,
        initial: &'a [ObjectState],
        chain: &'a ManipulationChain,
        tolerances: &'a Tolerances,
    ) -> CopyState<'a> {
        CopyState {
            copy: 0,
            current,
            initial,
            chain,
            tolerances,
        }
    }

    #[test]
    fn object_between_unmoved_statics_succeeds() {
        let initial = shelf(0.0);
        let chain = ManipulationChain::new(vec![1]).unwrap();
        let tol = Tolerances::default();
        let s = state(initial.clone(), &initial, &chain, &tol);

        assert!(Container.is_successful(&s));
        assert!(Container.step_succeeded(&s));
        assert_eq!(Container.evaluate_step(&s), ChainStep::Complete);
        assert_eq!(Container.participating_slots(&s), vec![1, 2, 3]);
    }

    #[test]
    fn moved_static_fails() {
        let initial = shelf(0.0);
        let mut current = initial.clone();
        current[2].pose = current[2].pose.translated(&Vector3::new(-2.0, 0.0, 0.0));
        let chain = ManipulationChain::new(vec![1]).unwrap();
        let tol = Tolerances::default();
        let s = state(current, &initial, &chain, &tol);

        assert!(!Container.is_successful(&s));
        assert_eq!(Container.evaluate_step(&s), ChainStep::Retry);
    }

    #[test]
    fn zero_tolerance_compares_inclusively() {
        let initial = shelf(0.0);
        let chain = ManipulationChain::new(vec![1]).unwrap();
        let tol = Tolerances::new(0.0, 0.0, 0.0);

        let s = state(initial.clone(), &initial, &chain, &tol);
        assert!(Container.is_successful(&s));

        let mut current = initial.clone();
        current[2].pose = current[2].pose.translated(&Vector3::new(0.01, 0.0, 0.0));
        let s = state(current, &initial, &chain, &tol);
        assert!(!Container.is_successful(&s));
    }

    #[test]
    fn object_outside_pair_fails() {
        let initial = shelf(8.0);
        let chain = ManipulationChain::new(vec![1]).unwrap();
        let tol = Tolerances::default();
        let s = state(initial.clone(), &initial, &chain, &tol);
        assert!(!Container.is_successful(&s));
    }

    #[test]
    fn object_above_pair_fails() {
        let mut initial = shelf(0.0);
        initial[1] = boxed(0.0, 0.0, 6.0, 1.0);
        let chain = ManipulationChain::new(vec![1]).unwrap();
        let tol = Tolerances::default();
        let s = state(initial.clone(), &initial, &chain, &tol);
        assert!(!Container.is_successful(&s));
    }

    #[test]
    fn trials_accept_any_pair_after_slot_one() {
        // Slots 2 and 3 are on one side; slot 4 on the other.
        let mut initial = shelf(0.0);
        initial[3] = boxed(-8.0, 0.0, 1.0, 1.0);
        initial.push(boxed(5.0, 0.0, 1.0, 1.0));
        let chain = ManipulationChain::new(vec![1]).unwrap();
        let tol = Tolerances::default();
        let s = state(initial.clone(), &initial, &chain, &tol);

        assert!(!Container.is_successful(&s));
        assert!(Container.step_succeeded(&s));
    }

    #[test]
    fn validate_needs_two_statics() {
        use scenario_types::{ModelConfig, ObjectKind, Pose, SimulationMode};
        let config = ScenarioConfig::new(Container::TAG, SimulationMode::Random)
            .with_model(ModelConfig::new("shelf", ObjectKind::Bookshelf, Pose::default()))
            .with_model(ModelConfig::new("manipulated_book", ObjectKind::Book, Pose::default()))
            .with_model(ModelConfig::new("book", ObjectKind::Book, Pose::default()));
        assert!(matches!(
            Container.validate(&config),
            Err(ConfigError::InvalidModels(_))
        ));
    }
}
