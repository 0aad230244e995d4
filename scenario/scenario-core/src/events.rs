//! Progress notifications for observers.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use tracing::{debug, info};

/// Something observers may want to show or record.
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioEvent {
    /// Every copy has been built.
    Instantiated {
        /// Copies built.
        copies: usize,
        /// Slots per copy.
        slots: usize,
        /// Floors spawned.
        floors: usize,
    },
    /// A copy's pose cache was refilled by the optimizer.
    CacheRefilled {
        /// Copy index.
        copy: usize,
        /// Poses received.
        poses: usize,
    },
    /// Learning-data records were appended to the log.
    RecordsSaved {
        /// Records written.
        count: usize,
        /// Log file.
        path: PathBuf,
    },
    /// A trial reached its verdict.
    TrialCompleted {
        /// Trial id.
        trial: usize,
        /// Copy that ran it.
        copy: usize,
        /// Verdict.
        success: bool,
        /// Attempts used.
        attempts: usize,
    },
    /// Every trial is complete and the result file has been written.
    TrialsFinished {
        /// Trial count.
        total: usize,
        /// Successful trials.
        succeeded: usize,
        /// Result file.
        path: PathBuf,
    },
}

/// Receives [`ScenarioEvent`]s.
pub trait EventSink {
    /// Handle one event.
    fn emit(&mut self, event: &ScenarioEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: &ScenarioEvent) {
        match event {
            ScenarioEvent::Instantiated {
                copies,
                slots,
                floors,
            } => info!(copies, slots, floors, "Scenario instantiated"),
            ScenarioEvent::CacheRefilled { copy, poses } => {
                debug!(copy, poses, "Pose cache refilled");
            }
            ScenarioEvent::RecordsSaved { count, path } => {
                debug!(count, path = %path.display(), "Delta records saved");
            }
            ScenarioEvent::TrialCompleted {
                trial,
                copy,
                success,
                attempts,
            } => info!(trial, copy, success, attempts, "Trial completed"),
            ScenarioEvent::TrialsFinished {
                total,
                succeeded,
                path,
            } => info!(total, succeeded, path = %path.display(), "All trials finished"),
        }
    }
}

/// Keeps every event in memory; clones share the same buffer.
///
/// ```
/// use scenario_core::{EventSink, MemorySink, ScenarioEvent};
///
/// let sink = MemorySink::new();
/// let mut writer = sink.clone();
/// writer.emit(&ScenarioEvent::CacheRefilled { copy: 0, poses: 8 });
/// assert_eq!(sink.events().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Rc<RefCell<Vec<ScenarioEvent>>>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far.
    #[must_use]
    pub fn events(&self) -> Vec<ScenarioEvent> {
        self.events.borrow().clone()
    }
}

impl EventSink for MemorySink {
    fn emit(&mut self, event: &ScenarioEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
