//! Per-copy state: slots, snapshots and the manipulation chain.

use nalgebra::Vector3;
use scenario_optim::{ObjectState, PoseCache};

use crate::actor::ActorId;
use crate::error::{Result, ScenarioError};
use crate::layout::GridCell;

/// Ordered manipulable slots with a cursor on the one being manipulated.
///
/// The cursor only moves forward one slot at a time, or back to the start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManipulationChain {
    slots: Vec<usize>,
    position: usize,
}

impl ManipulationChain {
    /// Create a chain over `slots`, cursor on the first.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::ChainIndex`] for an empty slot list.
    pub fn new(slots: Vec<usize>) -> Result<Self> {
        if slots.is_empty() {
            return Err(ScenarioError::ChainIndex { position: 0, len: 0 });
        }
        Ok(Self { slots, position: 0 })
    }

    /// Slot under the cursor.
    #[must_use]
    pub fn current(&self) -> usize {
        self.slots[self.position]
    }

    /// Cursor position within the chain.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// First slot of the chain.
    #[must_use]
    pub fn first(&self) -> usize {
        self.slots[0]
    }

    /// All chain slots in order.
    #[must_use]
    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    /// Number of chain slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always false; a chain holds at least one slot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether the cursor is on the final slot.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.position + 1 == self.slots.len()
    }

    /// Whether `slot` belongs to the chain.
    #[must_use]
    pub fn contains(&self, slot: usize) -> bool {
        self.slots.contains(&slot)
    }

    /// Whether `slot` is a chain slot the cursor has not reached yet.
    #[must_use]
    pub fn is_pending(&self, slot: usize) -> bool {
        self.slots[self.position + 1..].contains(&slot)
    }

    /// Whether `slot` is a chain slot the cursor has already passed.
    #[must_use]
    pub fn is_passed(&self, slot: usize) -> bool {
        self.slots[..self.position].contains(&slot)
    }

    /// Move the cursor to the next slot and return it.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::ChainIndex`] when already on the last slot.
    pub fn advance(&mut self) -> Result<usize> {
        let next = self.position + 1;
        if next >= self.slots.len() {
            return Err(ScenarioError::ChainIndex {
                position: next,
                len: self.slots.len(),
            });
        }
        self.position = next;
        Ok(self.current())
    }

    /// Put the cursor back on the first slot.
    pub fn rewind(&mut self) {
        self.position = 0;
    }
}

/// One parallel copy of the scenario.
#[derive(Debug, Clone)]
pub struct ScenarioInstance {
    pub(crate) copy: usize,
    pub(crate) cell: GridCell,
    pub(crate) offset: Vector3<f64>,
    pub(crate) actors: Vec<ActorId>,
    pub(crate) snapshots: Vec<ObjectState>,
    pub(crate) chain: ManipulationChain,
    pub(crate) cache: PoseCache,
}

impl ScenarioInstance {
    pub(crate) fn new(
        copy: usize,
        cell: GridCell,
        offset: Vector3<f64>,
        actors: Vec<ActorId>,
        snapshots: Vec<ObjectState>,
        chain: ManipulationChain,
    ) -> Self {
        Self {
            copy,
            cell,
            offset,
            actors,
            snapshots,
            chain,
            cache: PoseCache::new(),
        }
    }

    /// Copy index.
    #[must_use]
    pub const fn copy(&self) -> usize {
        self.copy
    }

    /// Grid cell.
    #[must_use]
    pub const fn cell(&self) -> GridCell {
        self.cell
    }

    /// World offset applied to template poses.
    #[must_use]
    pub const fn offset(&self) -> Vector3<f64> {
        self.offset
    }

    /// Actor handles in slot order.
    #[must_use]
    pub fn actors(&self) -> &[ActorId] {
        &self.actors
    }

    /// Actor in `slot`.
    #[must_use]
    pub fn actor(&self, slot: usize) -> Option<ActorId> {
        self.actors.get(slot).copied()
    }

    /// Pose and bounding box of every slot as of the start of the step.
    #[must_use]
    pub fn snapshots(&self) -> &[ObjectState] {
        &self.snapshots
    }

    /// Start-of-step snapshot of `slot`.
    #[must_use]
    pub fn snapshot(&self, slot: usize) -> Option<&ObjectState> {
        self.snapshots.get(slot)
    }

    /// Manipulation chain.
    #[must_use]
    pub const fn chain(&self) -> &ManipulationChain {
        &self.chain
    }

    /// Slot currently manipulated.
    #[must_use]
    pub fn manipulated_slot(&self) -> usize {
        self.chain.current()
    }

    /// Optimizer pose cache.
    #[must_use]
    pub const fn cache(&self) -> &PoseCache {
        &self.cache
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn chain_advances_to_end() {
        let mut chain = ManipulationChain::new(vec![1, 3, 4]).unwrap();
        assert_eq!(chain.current(), 1);
        assert!(chain.is_pending(3));
        assert!(chain.is_pending(4));
        assert!(!chain.is_pending(2));

        assert_eq!(chain.advance().unwrap(), 3);
        assert!(chain.is_passed(1));
        assert!(!chain.is_pending(3));
        assert_eq!(chain.advance().unwrap(), 4);
        assert!(chain.is_last());
        assert_eq!(
            chain.advance(),
            Err(ScenarioError::ChainIndex { position: 3, len: 3 })
        );
        assert_eq!(chain.current(), 4);
    }

    #[test]
    fn chain_rewinds_to_first() {
        let mut chain = ManipulationChain::new(vec![2, 5]).unwrap();
        chain.advance().unwrap();
        chain.rewind();
        assert_eq!(chain.current(), 2);
        assert_eq!(chain.first(), 2);
        assert_eq!(chain.position(), 0);
    }

    #[test]
    fn empty_chain_rejected() {
        assert!(matches!(
            ManipulationChain::new(Vec::new()),
            Err(ScenarioError::ChainIndex { len: 0, .. })
        ));
    }
}
