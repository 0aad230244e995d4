//! Building and stepping every parallel copy of a scenario.

use nalgebra::Vector3;
use scenario_optim::{
    ObjectState, OptimizationRequest, PoseOptimizer, PoseSampler, ScriptOptimizer,
};
use scenario_types::{
    ConfigError, ModelConfig, ObjectKind, Pose, RunConfig, ScenarioConfig, SimulationMode,
};
use tracing::{debug, info};

use crate::actor::{ActorId, Scene};
use crate::error::{Result, ScenarioError};
use crate::events::{EventSink, ScenarioEvent};
use crate::instance::{ManipulationChain, ScenarioInstance};
use crate::layout::{floor_origin, GridCell};
use crate::record::{append_records, DeltaRecord};
use crate::variant::{ChainStep, CopyState, ScenarioVariant, VariantRegistry};

/// Collects the collaborators of a [`ScenarioOrchestrator`].
///
/// When the simulation mode needs an optimizer and none is supplied, a
/// [`ScriptOptimizer`] is built from the scenario's optimizer parameters.
pub struct OrchestratorBuilder {
    config: RunConfig,
    optimizer: Option<Box<dyn PoseOptimizer>>,
    sink: Option<Box<dyn EventSink>>,
    registry: VariantRegistry,
}

impl OrchestratorBuilder {
    /// Start from a run configuration.
    #[must_use]
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            optimizer: None,
            sink: None,
            registry: VariantRegistry::with_builtins(),
        }
    }

    /// Use `optimizer` instead of the configured script.
    #[must_use]
    pub fn with_optimizer(mut self, optimizer: impl PoseOptimizer + 'static) -> Self {
        self.optimizer = Some(Box::new(optimizer));
        self
    }

    /// Send progress events to `sink`.
    #[must_use]
    pub fn with_event_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Resolve scenario types against `registry` instead of the built-ins.
    #[must_use]
    pub fn with_registry(mut self, registry: VariantRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Override the sampler seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Validate the configuration, spawn every copy into `scene` and place
    /// each copy's manipulated object.
    pub fn build<S: Scene>(self, scene: S) -> Result<ScenarioOrchestrator<S>> {
        let Self {
            config,
            optimizer,
            sink,
            registry,
        } = self;

        config.validate()?;
        let scenario = &config.scenario;
        let variant = registry.create(&scenario.kind)?;
        variant.validate(scenario)?;

        let kinds = scenario
            .models
            .iter()
            .map(ModelConfig::object_kind)
            .collect::<std::result::Result<Vec<_>, ConfigError>>()?;
        let sampler = PoseSampler::from_seed_option(scenario.bounds, config.seed)?;
        let optimizer = match optimizer {
            Some(optimizer) => Some(optimizer),
            None if scenario.simulation_mode.uses_optimizer() => scenario
                .optimizer
                .clone()
                .map(|params| Box::new(ScriptOptimizer::new(params)) as Box<dyn PoseOptimizer>),
            None => None,
        };

        let mut orchestrator = ScenarioOrchestrator {
            config,
            scene,
            variant,
            sampler,
            optimizer,
            sink,
            instances: Vec::new(),
            floors: Vec::new(),
            steps: 0,
        };
        orchestrator.instantiate(&kinds)?;
        Ok(orchestrator)
    }
}

/// Owns the scene and every [`ScenarioInstance`] laid out in it.
///
/// # Example
///
/// ```
/// use scenario_core::{KinematicScene, OrchestratorBuilder};
/// use scenario_types::{
///     AxisRange, ModelConfig, ObjectKind, Pose, PoseBounds, RunConfig, ScenarioConfig,
///     SimulationMode,
/// };
///
/// let mut bounds = PoseBounds::default();
/// bounds.z = AxisRange::new(20.0, 30.0);
/// let scenario = ScenarioConfig::new("table", SimulationMode::Random)
///     .with_bounds(bounds)
///     .with_model(ModelConfig::new("floor", ObjectKind::Floor, Pose::default()))
///     .with_model(ModelConfig::new("manipulated_cup", ObjectKind::Cup, Pose::default()))
///     .with_model(ModelConfig::new("table", ObjectKind::Cube, Pose::default()));
/// let config = RunConfig::new(4, "delta.log", scenario).with_seed(1);
///
/// let mut orchestrator = OrchestratorBuilder::new(config)
///     .build(KinematicScene::new())
///     .unwrap();
/// orchestrator.update().unwrap();
/// assert_eq!(orchestrator.len(), 4);
/// assert_eq!(orchestrator.steps(), 1);
/// ```
pub struct ScenarioOrchestrator<S: Scene> {
    config: RunConfig,
    scene: S,
    variant: Box<dyn ScenarioVariant>,
    sampler: PoseSampler,
    optimizer: Option<Box<dyn PoseOptimizer>>,
    sink: Option<Box<dyn EventSink>>,
    instances: Vec<ScenarioInstance>,
    floors: Vec<ActorId>,
    steps: usize,
}

impl<S: Scene> ScenarioOrchestrator<S> {
    // ==================== Accessors ====================

    /// Run configuration.
    #[must_use]
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Scenario configuration.
    #[must_use]
    pub const fn scenario(&self) -> &ScenarioConfig {
        &self.config.scenario
    }

    /// Active variant.
    #[must_use]
    pub fn variant(&self) -> &dyn ScenarioVariant {
        self.variant.as_ref()
    }

    /// The scene.
    #[must_use]
    pub const fn scene(&self) -> &S {
        &self.scene
    }

    /// Mutable scene access, for backends that settle between steps.
    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    /// Number of copies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether there are no copies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Copy `copy`, if it exists.
    #[must_use]
    pub fn instance(&self, copy: usize) -> Option<&ScenarioInstance> {
        self.instances.get(copy)
    }

    /// All copies in index order.
    #[must_use]
    pub fn instances(&self) -> &[ScenarioInstance] {
        &self.instances
    }

    /// Floor actors, lowest first.
    #[must_use]
    pub fn floors(&self) -> &[ActorId] {
        &self.floors
    }

    /// Completed [`update`](Self::update) calls.
    #[must_use]
    pub const fn steps(&self) -> usize {
        self.steps
    }

    // ==================== Stepping ====================

    /// Re-pose every copy for the next step.
    ///
    /// Slot 0 and every slot from the manipulated one on go back to their
    /// template pose. Chain slots already behind the cursor keep their
    /// settled state. Then the manipulated slot is placed by the simulation
    /// mode.
    pub fn update(&mut self) -> Result<()> {
        for copy in 0..self.instances.len() {
            let manipulated = self.instances[copy].manipulated_slot();
            let slots = self.instances[copy].actors.len();
            self.reset_slot(copy, 0)?;
            for slot in manipulated.max(1)..slots {
                self.reset_slot(copy, slot)?;
            }
            self.place_manipulated(copy)?;
        }
        self.steps += 1;
        Ok(())
    }

    /// Current and start-of-step state of one copy.
    pub fn copy_state(&self, copy: usize) -> Result<CopyState<'_>> {
        let instance = self
            .instances
            .get(copy)
            .ok_or(ScenarioError::UnknownCopy(copy))?;
        let current = instance
            .actors
            .iter()
            .map(|&id| self.object_state(id))
            .collect::<Result<Vec<_>>>()?;
        Ok(CopyState {
            copy,
            current,
            initial: &instance.snapshots,
            chain: &instance.chain,
            tolerances: &self.config.tolerances,
        })
    }

    /// Labeled delta record of every copy.
    pub fn delta_records(&self) -> Result<Vec<DeltaRecord>> {
        (0..self.instances.len())
            .map(|copy| {
                let state = self.copy_state(copy)?;
                let success = self.variant.is_successful(&state);
                Ok(self.variant.extract_delta_record(&state, success))
            })
            .collect()
    }

    /// Append every copy's delta record to the configured log file.
    ///
    /// Returns the number of records written.
    pub fn save_learning_data(&mut self) -> Result<usize> {
        let records = self.delta_records()?;
        append_records(&self.config.log_file, &records)?;
        let event = ScenarioEvent::RecordsSaved {
            count: records.len(),
            path: self.config.log_file.clone(),
        };
        self.emit(&event);
        Ok(records.len())
    }

    /// The variant's trial verdict for one copy.
    pub fn evaluate_step(&self, copy: usize) -> Result<ChainStep> {
        let state = self.copy_state(copy)?;
        Ok(self.variant.evaluate_step(&state))
    }

    // ==================== Chain Cursor ====================

    /// Keep the manipulated slot where it settled and move to the next
    /// chain slot.
    pub fn advance_cursor(&mut self, copy: usize) -> Result<usize> {
        let slot = self.instance_ref(copy)?.manipulated_slot();
        let id = self.actor(copy, slot)?;
        let settled = self.object_state(id)?;
        let instance = &mut self.instances[copy];
        instance.snapshots[slot] = settled;
        instance.chain.advance()
    }

    /// Return the cursor to the first chain slot after a collapse.
    pub fn rewind_cursor(&mut self, copy: usize) -> Result<()> {
        self.instance_mut(copy)?.chain.rewind();
        Ok(())
    }

    /// Return the cursor to the first chain slot for a fresh trial.
    ///
    /// Passed chain slots are reset on the next [`update`](Self::update)
    /// since they are then at or after the cursor.
    pub fn reset_cursor(&mut self, copy: usize) -> Result<()> {
        self.rewind_cursor(copy)
    }

    pub(crate) fn emit(&mut self, event: &ScenarioEvent) {
        if let Some(sink) = self.sink.as_mut() {
            sink.emit(event);
        }
    }

    // ==================== Internals ====================

    fn instantiate(&mut self, kinds: &[ObjectKind]) -> Result<()> {
        let copies = self.config.copies;
        let display = self.config.display;
        let chain_slots = self.config.scenario.manipulable_slots();

        for floor in 0..display.floor_count(copies) {
            let id = self.scene.instantiate(ObjectKind::Floor);
            self.scene
                .set_pose(id, Pose::from_position(floor_origin(floor, &display)))?;
            self.floors.push(id);
        }

        for copy in 0..copies {
            let cell = GridCell::for_copy(copy, &display);
            let offset = cell.offset(&display);
            let mut actors = Vec::with_capacity(kinds.len());
            let mut snapshots = Vec::with_capacity(kinds.len());

            for (model, &kind) in self.config.scenario.models.iter().zip(kinds) {
                let id = self.scene.instantiate(kind);
                if let Some(scale) = model.scale {
                    self.scene.set_scale(id, scale)?;
                }
                self.scene.set_mass_scale(id, model.mass_scale)?;
                self.scene.set_com_offset(id, model.com_offset)?;
                self.scene.set_physics_enabled(id, model.physics)?;
                self.scene.set_pose(id, model.pose.translated(&offset))?;
                snapshots.push(self.object_state(id)?);
                actors.push(id);
            }

            let chain = ManipulationChain::new(chain_slots.clone())?;
            self.instances.push(ScenarioInstance::new(
                copy, cell, offset, actors, snapshots, chain,
            ));
            self.place_manipulated(copy)?;
        }

        info!(
            copies,
            slots = kinds.len(),
            floors = self.floors.len(),
            scenario = self.variant.kind(),
            mode = %self.config.scenario.simulation_mode,
            "Scenario instantiated"
        );
        let event = ScenarioEvent::Instantiated {
            copies,
            slots: kinds.len(),
            floors: self.floors.len(),
        };
        self.emit(&event);
        Ok(())
    }

    fn reset_slot(&mut self, copy: usize, slot: usize) -> Result<()> {
        let template = self.config.scenario.models[slot].pose;
        let offset = self.instances[copy].offset;
        let id = self.actor(copy, slot)?;
        self.scene.set_pose(id, template.translated(&offset))?;
        self.instances[copy].snapshots[slot] = self.object_state(id)?;
        Ok(())
    }

    fn place_manipulated(&mut self, copy: usize) -> Result<()> {
        let slot = self.instance_ref(copy)?.manipulated_slot();
        let id = self.actor(copy, slot)?;
        let offset = self.instances[copy].offset;

        let sampled = self.sampler.generate_pose().translated(&offset);
        self.scene.set_pose(id, sampled)?;

        let applied = match self.config.scenario.simulation_mode {
            SimulationMode::Default => sampled,
            SimulationMode::Random => self.resample_until_clear(copy, slot, offset, sampled)?,
            SimulationMode::Optimised => {
                let pose = self.next_optimised_pose(copy, slot)?;
                self.scene.set_pose(id, pose)?;
                pose
            }
            SimulationMode::RotationOptimised => {
                let pose = self.next_optimised_pose(copy, slot)?;
                self.scene.set_rotation(id, pose.rotation)?;
                self.scene.pose(id)?
            }
        };

        let bbox = self.scene.bounding_box(id)?;
        self.instances[copy].snapshots[slot] = ObjectState::new(applied, bbox);
        Ok(())
    }

    fn resample_until_clear(
        &mut self,
        copy: usize,
        slot: usize,
        offset: Vector3<f64>,
        first: Pose,
    ) -> Result<Pose> {
        let id = self.actor(copy, slot)?;
        let cap = self.config.scenario.max_placement_attempts;
        let mut pose = first;
        let mut attempts = 1;

        while self.overlaps_others(copy, slot)? {
            if cap.is_some_and(|cap| attempts >= cap) {
                return Err(ScenarioError::Placement { copy, attempts });
            }
            pose = self.sampler.generate_pose().translated(&offset);
            self.scene.set_pose(id, pose)?;
            attempts += 1;
        }

        if attempts > 1 {
            debug!(copy, slot, attempts, "Placed manipulated object after retries");
        }
        Ok(pose)
    }

    // Slot 0 is the support surface and never counts as an obstacle.
    fn overlaps_others(&self, copy: usize, slot: usize) -> Result<bool> {
        let actors = &self.instances[copy].actors;
        let bbox = self.scene.bounding_box(actors[slot])?;
        for (other, &id) in actors.iter().enumerate().skip(1) {
            if other != slot && bbox.intersects(&self.scene.bounding_box(id)?) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn next_optimised_pose(&mut self, copy: usize, slot: usize) -> Result<Pose> {
        let request = self.optimization_request(copy, slot)?;
        let optimizer = self.optimizer.as_mut().ok_or_else(|| {
            ConfigError::invalid(format!(
                "simulation mode '{}' has no optimizer",
                self.config.scenario.simulation_mode
            ))
        })?;
        let instance = &mut self.instances[copy];
        let refill = instance.cache.is_exhausted();
        let pose = instance
            .cache
            .next_pose(|| optimizer.optimise(&request))?;

        if refill {
            let event = ScenarioEvent::CacheRefilled {
                copy,
                poses: self.instances[copy].cache.len(),
            };
            self.emit(&event);
        }
        Ok(pose)
    }

    // Static objects exclude the support surface and chain slots not reached yet.
    fn optimization_request(&self, copy: usize, slot: usize) -> Result<OptimizationRequest> {
        let instance = &self.instances[copy];
        let manipulated = self.object_state(self.actor(copy, slot)?)?;
        let statics = instance
            .actors
            .iter()
            .enumerate()
            .skip(1)
            .filter(|&(other, _)| other != slot && !instance.chain.is_pending(other))
            .map(|(_, &id)| self.object_state(id))
            .collect::<Result<Vec<_>>>()?;
        Ok(OptimizationRequest::new(manipulated, statics))
    }

    fn object_state(&self, id: ActorId) -> Result<ObjectState> {
        Ok(ObjectState::new(
            self.scene.pose(id)?,
            self.scene.bounding_box(id)?,
        ))
    }

    fn actor(&self, copy: usize, slot: usize) -> Result<ActorId> {
        self.instance_ref(copy)?
            .actor(slot)
            .ok_or(ScenarioError::ChainIndex {
                position: slot,
                len: self.instances[copy].actors.len(),
            })
    }

    fn instance_ref(&self, copy: usize) -> Result<&ScenarioInstance> {
        self.instances
            .get(copy)
            .ok_or(ScenarioError::UnknownCopy(copy))
    }

    fn instance_mut(&mut self, copy: usize) -> Result<&mut ScenarioInstance> {
        self.instances
            .get_mut(copy)
            .ok_or(ScenarioError::UnknownCopy(copy))
    }
}

impl<S: Scene + std::fmt::Debug> std::fmt::Debug for ScenarioOrchestrator<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioOrchestrator")
            .field("variant", &self.variant.kind())
            .field("copies", &self.instances.len())
            .field("steps", &self.steps)
            .field("scene", &self.scene)
            .finish_non_exhaustive()
    }
}
