//! Scenario variants: success predicates and chain verdicts per scenario type.
//!
//! A variant is chosen once per run from the [`VariantRegistry`] by the
//! scenario type tag. It sees one copy at a time through a [`CopyState`]:
//! the current scene state of every slot next to the snapshot taken when
//! the step began.

mod container;
mod cube_tower;
mod fridge;
mod table;

use std::fmt;

use hashbrown::HashMap;
use scenario_optim::ObjectState;
use scenario_types::{ConfigError, ScenarioConfig, Tolerances};

use crate::instance::ManipulationChain;
use crate::record::{DeltaRecord, SlotDelta};

pub use container::Container;
pub use cube_tower::CubeTower;
pub use fridge::Fridge;
pub use table::Table;

/// Read-only view of one copy for predicate evaluation.
#[derive(Debug, Clone)]
pub struct CopyState<'a> {
    /// Copy index.
    pub copy: usize,
    /// Current pose and bounding box of every slot.
    pub current: Vec<ObjectState>,
    /// Snapshot of every slot from the start of the step.
    pub initial: &'a [ObjectState],
    /// Manipulation chain of the copy.
    pub chain: &'a ManipulationChain,
    /// Success thresholds.
    pub tolerances: &'a Tolerances,
}

impl CopyState<'_> {
    /// Slot under the chain cursor.
    #[must_use]
    pub fn manipulated(&self) -> usize {
        self.chain.current()
    }

    /// Current state of `slot`.
    #[must_use]
    pub fn current(&self, slot: usize) -> Option<&ObjectState> {
        self.current.get(slot)
    }

    /// Start-of-step state of `slot`.
    #[must_use]
    pub fn initial(&self, slot: usize) -> Option<&ObjectState> {
        self.initial.get(slot)
    }

    /// Whether `slot` is still within translation tolerance of its snapshot.
    ///
    /// Unknown slots count as moved.
    #[must_use]
    pub fn unmoved(&self, slot: usize) -> bool {
        match (self.current(slot), self.initial(slot)) {
            (Some(now), Some(before)) => now
                .pose
                .same_position(&before.pose, self.tolerances.translation_tolerance),
            _ => false,
        }
    }

    /// Non-chain slots from `first` on, in slot order.
    #[must_use]
    pub fn static_slots(&self, first: usize) -> Vec<usize> {
        (first..self.current.len())
            .filter(|&slot| !self.chain.contains(slot))
            .collect()
    }

    /// Delta of `slot` between snapshot and current state.
    #[must_use]
    pub fn delta(&self, slot: usize) -> Option<SlotDelta> {
        Some(SlotDelta {
            slot,
            initial: *self.initial(slot)?,
            current: *self.current(slot)?,
        })
    }
}

/// What the trial scheduler should do with a copy after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainStep {
    /// The whole chain succeeded; the trial is a success.
    Complete,
    /// The current slot succeeded; move on to the next chain slot.
    Advance,
    /// The current slot failed; try it again.
    Retry,
    /// The current slot failed and an earlier chain slot was disturbed;
    /// start the chain over.
    Restart,
}

impl ChainStep {
    /// Whether the step counts as a failed attempt.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Retry | Self::Restart)
    }
}

/// Scenario-type policy.
pub trait ScenarioVariant: fmt::Debug {
    /// Scenario type tag.
    fn kind(&self) -> &'static str;

    /// Check that the model list fits this variant.
    fn validate(&self, _config: &ScenarioConfig) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Slots written to a delta record, in record order.
    fn participating_slots(&self, state: &CopyState<'_>) -> Vec<usize>;

    /// Success label for the learning-data record.
    fn is_successful(&self, state: &CopyState<'_>) -> bool;

    /// Success of the current chain slot for trial scheduling.
    fn step_succeeded(&self, state: &CopyState<'_>) -> bool {
        self.is_successful(state)
    }

    /// Build the delta record for a copy.
    fn extract_delta_record(&self, state: &CopyState<'_>, success: bool) -> DeltaRecord {
        DeltaRecord {
            copy: state.copy,
            slots: self
                .participating_slots(state)
                .into_iter()
                .filter_map(|slot| state.delta(slot))
                .collect(),
            success,
        }
    }

    /// Per-step trial verdict.
    fn evaluate_step(&self, state: &CopyState<'_>) -> ChainStep {
        match (self.step_succeeded(state), state.chain.is_last()) {
            (true, true) => ChainStep::Complete,
            (true, false) => ChainStep::Advance,
            (false, _) => ChainStep::Retry,
        }
    }
}

/// Constructor stored in a [`VariantRegistry`].
pub type VariantFactory = fn() -> Box<dyn ScenarioVariant>;

/// Scenario type tag to variant constructor.
#[derive(Clone, Default)]
pub struct VariantRegistry {
    factories: HashMap<String, VariantFactory>,
}

impl fmt::Debug for VariantRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

impl VariantRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `container`, `cube_tower`, `fridge` and `table`.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Container::TAG, || Box::new(Container));
        registry.register(CubeTower::TAG, || Box::new(CubeTower));
        registry.register(Fridge::TAG, || Box::new(Fridge));
        registry.register(Table::TAG, || Box::new(Table));
        registry
    }

    /// Register `factory` under `tag`, replacing any previous entry.
    pub fn register(&mut self, tag: impl Into<String>, factory: VariantFactory) {
        self.factories.insert(tag.into().to_ascii_lowercase(), factory);
    }

    /// Whether `tag` is registered.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(&tag.to_ascii_lowercase())
    }

    /// Registered tags, sorted.
    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Build the variant registered under `tag` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownScenarioType`] for unregistered tags.
    pub fn create(&self, tag: &str) -> Result<Box<dyn ScenarioVariant>, ConfigError> {
        self.factories
            .get(&tag.to_ascii_lowercase())
            .map(|factory| factory())
            .ok_or_else(|| ConfigError::UnknownScenarioType(tag.to_string()))
    }
}

/// First two non-chain slots from `first` on.
pub(crate) fn static_pair(state: &CopyState<'_>, first: usize) -> Option<(usize, usize)> {
    let statics = state.static_slots(first);
    Some((*statics.first()?, *statics.get(1)?))
}

/// Error unless the model list has `needed` non-chain slots after slot 0.
pub(crate) fn require_statics(
    config: &ScenarioConfig,
    kind: &str,
    needed: usize,
) -> Result<(), ConfigError> {
    let chain = config.manipulable_slots();
    let statics = (1..config.models.len())
        .filter(|slot| !chain.contains(slot))
        .count();
    if statics < needed {
        return Err(ConfigError::invalid_models(format!(
            "{kind} needs {needed} static objects besides slot 0, found {statics}"
        )));
    }
    Ok(())
}
