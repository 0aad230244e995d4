//! Tick-paced episode loop.

use tracing::debug;

use crate::actor::Scene;
use crate::error::Result;
use crate::orchestrator::ScenarioOrchestrator;
use crate::trials::TrialScheduler;

/// Drives an orchestrator from the host's frame ticks.
///
/// Time accumulates across [`tick`](Self::tick) calls; once it exceeds the
/// configured settle duration one control [`step`](Self::step) runs. A step
/// first consumes the settled scene, either as learning-data records (random
/// and rotation-optimised modes) or as trial verdicts, then re-poses every
/// copy. The runner halts when the last trial completes.
pub struct EpisodeRunner<S: Scene> {
    orchestrator: ScenarioOrchestrator<S>,
    scheduler: Option<TrialScheduler>,
    elapsed: f64,
    halted: bool,
    steps: usize,
    records_written: usize,
}

impl<S: Scene> EpisodeRunner<S> {
    /// Wrap `orchestrator`, scheduling trials when the scenario defines them.
    pub fn new(orchestrator: ScenarioOrchestrator<S>) -> Result<Self> {
        let scheduler = orchestrator
            .scenario()
            .trials
            .clone()
            .map(|params| TrialScheduler::new(params, orchestrator.len()))
            .transpose()?;
        Ok(Self {
            orchestrator,
            scheduler,
            elapsed: 0.0,
            halted: false,
            steps: 0,
            records_written: 0,
        })
    }

    /// Advance the clock by `dt` seconds, stepping when the settle time has
    /// passed.
    ///
    /// Returns whether a step ran.
    pub fn tick(&mut self, dt: f64) -> Result<bool> {
        if self.halted {
            return Ok(false);
        }
        self.elapsed += dt;
        if self.elapsed <= self.orchestrator.config().settle_duration {
            return Ok(false);
        }
        self.elapsed = 0.0;
        self.step()?;
        Ok(true)
    }

    /// Run one control step immediately.
    pub fn step(&mut self) -> Result<()> {
        if self.halted {
            return Ok(());
        }

        if self.orchestrator.scenario().simulation_mode.records_learning_data() {
            self.records_written += self.orchestrator.save_learning_data()?;
        } else if let Some(scheduler) = self.scheduler.as_mut() {
            if scheduler.update(&mut self.orchestrator)? {
                self.halted = true;
            }
        }

        if !self.halted {
            self.orchestrator.update()?;
        }
        self.steps += 1;
        debug!(step = self.steps, halted = self.halted, "Control step");
        Ok(())
    }

    /// The orchestrator.
    #[must_use]
    pub const fn orchestrator(&self) -> &ScenarioOrchestrator<S> {
        &self.orchestrator
    }

    /// Mutable orchestrator access, e.g. to let a backend settle the scene.
    pub fn orchestrator_mut(&mut self) -> &mut ScenarioOrchestrator<S> {
        &mut self.orchestrator
    }

    /// Trial scheduler, when trials are configured.
    #[must_use]
    pub const fn scheduler(&self) -> Option<&TrialScheduler> {
        self.scheduler.as_ref()
    }

    /// Whether every trial has completed.
    #[must_use]
    pub const fn is_halted(&self) -> bool {
        self.halted
    }

    /// Control steps run.
    #[must_use]
    pub const fn steps(&self) -> usize {
        self.steps
    }

    /// Learning-data records appended so far.
    #[must_use]
    pub const fn records_written(&self) -> usize {
        self.records_written
    }

    /// Give back the orchestrator.
    #[must_use]
    pub fn into_inner(self) -> ScenarioOrchestrator<S> {
        self.orchestrator
    }
}
