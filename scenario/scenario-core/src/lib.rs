//! Multi-copy scenario orchestration for manipulation episode generation.
//!
//! Builds many copies of a manipulation scene side by side, re-poses each
//! copy's manipulated object every control step, and turns the settled
//! result into either labeled before/after records or trial verdicts.
//!
//! - [`Scene`] - capability port to the world hosting the copies
//! - [`KinematicScene`] - headless reference backend without dynamics
//! - [`ScenarioOrchestrator`] - layout, re-posing and record extraction
//! - [`ScenarioVariant`] - per-scenario-type success predicate, with
//!   [`Container`], [`CubeTower`], [`Fridge`] and [`Table`] built in
//! - [`TrialScheduler`] - attempt counting and trial reassignment
//! - [`EpisodeRunner`] - tick-paced loop tying the above together
//!
//! # Step
//!
//! One step runs in this order for every copy:
//!
//! 1. The settled scene is compared with the snapshot taken at the start of
//!    the previous step, producing a delta record or a trial verdict.
//! 2. Slot 0 and every slot from the manipulated one on return to their
//!    template pose plus the copy's grid offset.
//! 3. The manipulated object receives a new pose from the sampler or the
//!    optimizer, and its snapshot is refreshed.
//!
//! # Layer 0
//!
//! No physics or rendering dependencies. A real simulator plugs in by
//! implementing [`Scene`]; the optimizer plugs in through
//! [`scenario_optim::PoseOptimizer`].
//!
//! # Example
//!
//! ```
//! use scenario_core::{EpisodeRunner, KinematicScene, OrchestratorBuilder};
//! use scenario_types::{
//!     AxisRange, ModelConfig, ObjectKind, Pose, PoseBounds, RunConfig, ScenarioConfig,
//!     SimulationMode, TrialParams,
//! };
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut bounds = PoseBounds::default();
//! bounds.z = AxisRange::new(50.0, 60.0);
//!
//! let scenario = ScenarioConfig::new("cube_tower", SimulationMode::Default)
//!     .with_bounds(bounds)
//!     .with_model(ModelConfig::new("table", ObjectKind::Cube, Pose::default()))
//!     .with_model(ModelConfig::new("manipulated_cube", ObjectKind::Cube, Pose::default()))
//!     .with_model(ModelConfig::new("base_cube", ObjectKind::Cube, Pose::default()))
//!     .with_trials(TrialParams::new(2, 3, dir.path().join("results.txt")));
//! let config = RunConfig::new(2, dir.path().join("delta.log"), scenario);
//!
//! let orchestrator = OrchestratorBuilder::new(config).build(KinematicScene::new()).unwrap();
//! let mut runner = EpisodeRunner::new(orchestrator).unwrap();
//!
//! // Nothing settles in a kinematic scene, so every attempt misses.
//! while !runner.is_halted() {
//!     runner.step().unwrap();
//! }
//! let scheduler = runner.scheduler().unwrap();
//! assert_eq!(scheduler.completed_count(), 2);
//! assert_eq!(scheduler.success_count(), 0);
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(clippy::missing_errors_doc, clippy::cast_precision_loss)]

mod actor;
mod error;
mod events;
mod instance;
mod kinematic;
mod layout;
mod orchestrator;
mod record;
mod runner;
mod trials;
mod variant;

pub use actor::{ActorId, Scene};
pub use error::{Result, ScenarioError};
pub use events::{EventSink, MemorySink, ScenarioEvent, TracingSink};
pub use instance::{ManipulationChain, ScenarioInstance};
pub use kinematic::KinematicScene;
pub use layout::{floor_origin, GridCell};
pub use orchestrator::{OrchestratorBuilder, ScenarioOrchestrator};
pub use record::{append_records, DeltaRecord, SlotDelta};
pub use runner::EpisodeRunner;
pub use trials::{TrialRecord, TrialScheduler};
pub use variant::{
    ChainStep, Container, CopyState, CubeTower, Fridge, ScenarioVariant, Table, VariantFactory,
    VariantRegistry,
};
