//! Repeated-attempt trial bookkeeping.

use std::fmt::Write as _;
use std::fs;

use scenario_types::{ConfigError, TrialParams};
use tracing::{debug, info};

use crate::actor::Scene;
use crate::error::Result;
use crate::events::ScenarioEvent;
use crate::orchestrator::ScenarioOrchestrator;
use crate::variant::ChainStep;

/// Outcome of one logical trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialRecord {
    /// Whether the trial succeeded. Meaningful once completed.
    pub success: bool,
    /// Whether the trial has reached a verdict.
    pub completed: bool,
    /// Attempts used so far, starting at 1.
    pub attempts: usize,
}

impl Default for TrialRecord {
    fn default() -> Self {
        Self {
            success: false,
            completed: false,
            attempts: 1,
        }
    }
}

/// Assigns trials to copies and tracks their attempts.
///
/// Copy `i` starts on trial `i`. A copy whose trial completes moves on to the
/// next unused trial id; once ids run out the copy idles. When every trial
/// is complete the result file gets one `1`/`0` line per trial and further
/// updates do nothing.
#[derive(Debug, Clone)]
pub struct TrialScheduler {
    params: TrialParams,
    records: Vec<TrialRecord>,
    assignments: Vec<usize>,
    next_trial: usize,
    finished: bool,
}

impl TrialScheduler {
    /// Create a scheduler for `copies` copies.
    pub fn new(params: TrialParams, copies: usize) -> std::result::Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            records: vec![TrialRecord::default(); params.number_of_trials],
            assignments: (0..copies).collect(),
            next_trial: copies,
            finished: false,
            params,
        })
    }

    /// Trial parameters.
    #[must_use]
    pub const fn params(&self) -> &TrialParams {
        &self.params
    }

    /// Number of trials.
    #[must_use]
    pub fn total(&self) -> usize {
        self.records.len()
    }

    /// Record of trial `trial`.
    #[must_use]
    pub fn record(&self, trial: usize) -> Option<&TrialRecord> {
        self.records.get(trial)
    }

    /// All records in trial-id order.
    #[must_use]
    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    /// Trial currently run by `copy`, `None` when the copy idles.
    #[must_use]
    pub fn trial_for_copy(&self, copy: usize) -> Option<usize> {
        self.assignments
            .get(copy)
            .copied()
            .filter(|&trial| trial < self.records.len())
    }

    /// Trials with a verdict.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.records.iter().filter(|r| r.completed).count()
    }

    /// Successful trials.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.completed && r.success)
            .count()
    }

    /// Whether every trial is complete.
    #[must_use]
    pub fn all_completed(&self) -> bool {
        self.records.iter().all(|r| r.completed)
    }

    /// Whether the result file has been written.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Evaluate every live copy once and update trial state.
    ///
    /// Returns `true` once every trial is complete; the result file is
    /// written on the call that completes the last trial.
    pub fn update<S: Scene>(&mut self, orchestrator: &mut ScenarioOrchestrator<S>) -> Result<bool> {
        if self.finished {
            return Ok(true);
        }

        for copy in 0..orchestrator.len() {
            let Some(trial) = self.trial_for_copy(copy) else {
                continue;
            };
            let step = orchestrator.evaluate_step(copy)?;
            if step.is_failure() {
                if step == ChainStep::Restart {
                    debug!(copy, trial, "Chain disturbed, restarting");
                    orchestrator.rewind_cursor(copy)?;
                }
                if self.records[trial].attempts >= self.params.attempts_per_trial {
                    self.complete(orchestrator, copy, trial, false)?;
                } else {
                    self.records[trial].attempts += 1;
                }
            } else if step == ChainStep::Complete {
                self.complete(orchestrator, copy, trial, true)?;
            } else {
                let slot = orchestrator.advance_cursor(copy)?;
                debug!(copy, trial, slot, "Chain slot placed, moving on");
            }
        }

        if self.all_completed() {
            self.finish(orchestrator)?;
        }
        Ok(self.finished)
    }

    /// The result file contents: one `1`/`0` line per trial.
    #[must_use]
    pub fn results_text(&self) -> String {
        let mut text = String::with_capacity(self.records.len() * 2);
        for record in &self.records {
            let _ = writeln!(text, "{}", u8::from(record.success));
        }
        text
    }

    fn complete<S: Scene>(
        &mut self,
        orchestrator: &mut ScenarioOrchestrator<S>,
        copy: usize,
        trial: usize,
        success: bool,
    ) -> Result<()> {
        let record = &mut self.records[trial];
        record.success = success;
        record.completed = true;
        let attempts = record.attempts;

        self.assignments[copy] = self.next_trial;
        self.next_trial += 1;
        orchestrator.reset_cursor(copy)?;

        orchestrator.emit(&ScenarioEvent::TrialCompleted {
            trial,
            copy,
            success,
            attempts,
        });
        Ok(())
    }

    fn finish<S: Scene>(&mut self, orchestrator: &mut ScenarioOrchestrator<S>) -> Result<()> {
        fs::write(&self.params.result_file, self.results_text())?;
        self.finished = true;

        info!(
            total = self.total(),
            succeeded = self.success_count(),
            path = %self.params.result_file.display(),
            "Trials finished"
        );
        orchestrator.emit(&ScenarioEvent::TrialsFinished {
            total: self.total(),
            succeeded: self.success_count(),
            path: self.params.result_file.clone(),
        });
        Ok(())
    }
}
