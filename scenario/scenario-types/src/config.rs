//! Configuration types for scenario generation.
//!
//! The shapes here mirror what a run needs: the scenario description (object
//! templates, sampling bounds, optimizer and trial parameters), the grid
//! layout used to place copies side by side, and the run-level settings.
//! Everything is plain data with `serde` support; [`RunConfig::load`] reads
//! and validates a JSON document in one call.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::pose::{EulerAngles, Pose};

/// Substring that marks a model as part of the manipulation chain.
pub const MANIPULATED_MARKER: &str = "manipulated";

/// Default cap on random placement retries.
pub const DEFAULT_PLACEMENT_ATTEMPTS: usize = 10_000;

/// Known object types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Ground plane placed under every floor of copies.
    Floor,
    /// Bookshelf.
    Bookshelf,
    /// Fridge.
    Fridge,
    /// Book.
    Book,
    /// Bottle.
    Bottle,
    /// Cup.
    Cup,
    /// Glass.
    Glass,
    /// Cylinder.
    Cylinder,
    /// Cube.
    Cube,
}

impl ObjectKind {
    /// Every known kind.
    pub const ALL: [Self; 9] = [
        Self::Floor,
        Self::Bookshelf,
        Self::Fridge,
        Self::Book,
        Self::Bottle,
        Self::Cup,
        Self::Glass,
        Self::Cylinder,
        Self::Cube,
    ];

    /// The configuration tag for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Floor => "floor",
            Self::Bookshelf => "bookshelf",
            Self::Fridge => "fridge",
            Self::Book => "book",
            Self::Bottle => "bottle",
            Self::Cup => "cup",
            Self::Glass => "glass",
            Self::Cylinder => "cylinder",
            Self::Cube => "cube",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownObjectType(s.to_string()))
    }
}

/// How the manipulated object is re-posed each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationMode {
    /// Sample poses until the object does not overlap any other slot.
    Random,
    /// Apply full poses proposed by the external optimizer.
    Optimised,
    /// Apply only the optimizer's orientation; position settles physically.
    RotationOptimised,
    /// Apply one sampled pose without overlap checks.
    #[default]
    Default,
}

impl SimulationMode {
    /// The configuration tag for this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Optimised => "optimised",
            Self::RotationOptimised => "rotation_optimised",
            Self::Default => "default",
        }
    }

    /// Whether this mode draws poses from the optimizer cache.
    #[must_use]
    pub const fn uses_optimizer(self) -> bool {
        matches!(self, Self::Optimised | Self::RotationOptimised)
    }

    /// Whether steps in this mode produce learning-data records.
    ///
    /// The remaining modes drive trials instead.
    #[must_use]
    pub const fn records_learning_data(self) -> bool {
        matches!(self, Self::Random | Self::RotationOptimised)
    }
}

impl fmt::Display for SimulationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimulationMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "random" => Ok(Self::Random),
            "optimised" => Ok(Self::Optimised),
            "rotation_optimised" => Ok(Self::RotationOptimised),
            "default" => Ok(Self::Default),
            other => Err(ConfigError::UnknownSimulationMode(other.to_string())),
        }
    }
}

/// Closed interval for one sampling axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisRange {
    /// Lower bound (inclusive).
    pub min: f64,
    /// Upper bound (inclusive).
    pub max: f64,
}

impl AxisRange {
    /// Create a range.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Degenerate range holding a single value.
    #[must_use]
    pub const fn fixed(value: f64) -> Self {
        Self::new(value, value)
    }

    /// Whether `value` lies in the range.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, axis: &'static str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(ConfigError::InvalidBounds {
                axis,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Per-axis sampling bounds for the manipulated object's pose.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseBounds {
    /// X position range.
    pub x: AxisRange,
    /// Y position range.
    pub y: AxisRange,
    /// Z position range.
    pub z: AxisRange,
    /// Roll range (degrees).
    pub roll: AxisRange,
    /// Pitch range (degrees).
    pub pitch: AxisRange,
    /// Yaw range (degrees).
    pub yaw: AxisRange,
}

impl PoseBounds {
    /// Bounds from position min/max corners and rotation min/max angles.
    #[must_use]
    pub fn from_corners(
        position_min: Point3<f64>,
        position_max: Point3<f64>,
        rotation_min: EulerAngles,
        rotation_max: EulerAngles,
    ) -> Self {
        Self {
            x: AxisRange::new(position_min.x, position_max.x),
            y: AxisRange::new(position_min.y, position_max.y),
            z: AxisRange::new(position_min.z, position_max.z),
            roll: AxisRange::new(rotation_min.roll, rotation_max.roll),
            pitch: AxisRange::new(rotation_min.pitch, rotation_max.pitch),
            yaw: AxisRange::new(rotation_min.yaw, rotation_max.yaw),
        }
    }

    /// The ranges in protocol order `x y z roll pitch yaw`.
    #[must_use]
    pub const fn axes(&self) -> [AxisRange; 6] {
        [self.x, self.y, self.z, self.roll, self.pitch, self.yaw]
    }

    /// Whether every component of `pose` lies inside its range.
    #[must_use]
    pub fn contains(&self, pose: &Pose) -> bool {
        self.axes()
            .iter()
            .zip(pose.to_components())
            .all(|(range, value)| range.contains(value))
    }

    /// Validate every axis.
    pub fn validate(&self) -> Result<()> {
        const NAMES: [&str; 6] = ["x", "y", "z", "roll", "pitch", "yaw"];
        for (range, axis) in self.axes().iter().zip(NAMES) {
            range.validate(axis)?;
        }
        Ok(())
    }
}

/// Template for one object slot, instantiated once per copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model name. Names containing `manipulated` form the manipulation chain.
    pub name: String,
    /// Object type tag (see [`ObjectKind`]).
    #[serde(rename = "type")]
    pub kind: String,
    /// Mass multiplier.
    #[serde(default = "default_mass_scale")]
    pub mass_scale: f64,
    /// Whether the object is physically simulated.
    #[serde(default = "default_true")]
    pub physics: bool,
    /// Optional non-uniform scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vector3<f64>>,
    /// Center-of-mass offset.
    #[serde(default = "zero_offset")]
    pub com_offset: Vector3<f64>,
    /// Pose before the per-copy grid offset is applied.
    #[serde(default)]
    pub pose: Pose,
}

fn default_mass_scale() -> f64 {
    1.0
}

const fn default_true() -> bool {
    true
}

fn zero_offset() -> Vector3<f64> {
    Vector3::zeros()
}

impl ModelConfig {
    /// Create a model template with default physical parameters.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ObjectKind, pose: Pose) -> Self {
        Self {
            name: name.into(),
            kind: kind.as_str().to_string(),
            mass_scale: 1.0,
            physics: true,
            scale: None,
            com_offset: Vector3::zeros(),
            pose,
        }
    }

    /// Sets the scale.
    #[must_use]
    pub const fn with_scale(mut self, scale: Vector3<f64>) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Sets the mass scale.
    #[must_use]
    pub const fn with_mass_scale(mut self, mass_scale: f64) -> Self {
        self.mass_scale = mass_scale;
        self
    }

    /// Sets the center-of-mass offset.
    #[must_use]
    pub const fn with_com_offset(mut self, offset: Vector3<f64>) -> Self {
        self.com_offset = offset;
        self
    }

    /// Disables physics for this object.
    #[must_use]
    pub const fn without_physics(mut self) -> Self {
        self.physics = false;
        self
    }

    /// Resolve the type tag.
    pub fn object_kind(&self) -> Result<ObjectKind> {
        self.kind.parse()
    }

    /// Whether this model belongs to the manipulation chain.
    #[must_use]
    pub fn is_manipulated(&self) -> bool {
        self.name.contains(MANIPULATED_MARKER)
    }
}

/// Files and command used to reach the external pose optimizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizerParams {
    /// Request file written before each call.
    pub request_file: PathBuf,
    /// Response file read after each call.
    pub response_file: PathBuf,
    /// Hyperparameter file written before each call.
    pub keys_file: PathBuf,
    /// Optimizer script.
    pub script: PathBuf,
    /// Program used to run the script; the script is executed directly when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<String>,
    /// Hyperparameter text; literal `\n` sequences become newlines when written.
    #[serde(default)]
    pub hyperparameters: String,
}

impl OptimizerParams {
    /// Create optimizer parameters with no interpreter and no hyperparameters.
    #[must_use]
    pub fn new(
        script: impl Into<PathBuf>,
        request_file: impl Into<PathBuf>,
        response_file: impl Into<PathBuf>,
        keys_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            request_file: request_file.into(),
            response_file: response_file.into(),
            keys_file: keys_file.into(),
            script: script.into(),
            interpreter: None,
            hyperparameters: String::new(),
        }
    }

    /// Sets the interpreter.
    #[must_use]
    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = Some(interpreter.into());
        self
    }

    /// Sets the hyperparameter text.
    #[must_use]
    pub fn with_hyperparameters(mut self, text: impl Into<String>) -> Self {
        self.hyperparameters = text.into();
        self
    }
}

/// Repeated-attempt trial parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialParams {
    /// Number of logical trials to complete.
    pub number_of_trials: usize,
    /// Attempts allowed per trial before it is recorded as a failure.
    pub attempts_per_trial: usize,
    /// File receiving one `1`/`0` line per trial once all are completed.
    pub result_file: PathBuf,
}

impl TrialParams {
    /// Create trial parameters.
    #[must_use]
    pub fn new(
        number_of_trials: usize,
        attempts_per_trial: usize,
        result_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            number_of_trials,
            attempts_per_trial,
            result_file: result_file.into(),
        }
    }

    /// Validate the parameters.
    pub fn validate(&self) -> Result<()> {
        if self.number_of_trials == 0 {
            return Err(ConfigError::invalid_trials("number_of_trials must be > 0"));
        }
        if self.attempts_per_trial == 0 {
            return Err(ConfigError::invalid_trials("attempts_per_trial must be > 0"));
        }
        if self.result_file.as_os_str().is_empty() {
            return Err(ConfigError::invalid_trials("result_file is empty"));
        }
        Ok(())
    }
}

/// Scenario description: what to build and how to perturb it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Scenario type tag (`container`, `cube_tower`, `fridge`, `table`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Re-posing strategy.
    #[serde(default)]
    pub simulation_mode: SimulationMode,
    /// Sampling bounds for the manipulated object.
    #[serde(default)]
    pub bounds: PoseBounds,
    /// Ordered object templates; slot index = position in this list.
    pub models: Vec<ModelConfig>,
    /// External optimizer parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimizer: Option<OptimizerParams>,
    /// Trial parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trials: Option<TrialParams>,
    /// Cap on random placement retries; `None` retries forever.
    #[serde(default = "default_placement_attempts")]
    pub max_placement_attempts: Option<usize>,
}

#[allow(clippy::unnecessary_wraps)]
const fn default_placement_attempts() -> Option<usize> {
    Some(DEFAULT_PLACEMENT_ATTEMPTS)
}

impl ScenarioConfig {
    /// Create a scenario with no models.
    #[must_use]
    pub fn new(kind: impl Into<String>, simulation_mode: SimulationMode) -> Self {
        Self {
            kind: kind.into(),
            simulation_mode,
            bounds: PoseBounds::default(),
            models: Vec::new(),
            optimizer: None,
            trials: None,
            max_placement_attempts: default_placement_attempts(),
        }
    }

    /// Appends a model template.
    #[must_use]
    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.models.push(model);
        self
    }

    /// Sets the sampling bounds.
    #[must_use]
    pub const fn with_bounds(mut self, bounds: PoseBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Sets the optimizer parameters.
    #[must_use]
    pub fn with_optimizer(mut self, params: OptimizerParams) -> Self {
        self.optimizer = Some(params);
        self
    }

    /// Sets the trial parameters.
    #[must_use]
    pub fn with_trials(mut self, trials: TrialParams) -> Self {
        self.trials = Some(trials);
        self
    }

    /// Sets the placement retry cap.
    #[must_use]
    pub const fn with_max_placement_attempts(mut self, cap: Option<usize>) -> Self {
        self.max_placement_attempts = cap;
        self
    }

    /// Slots forming the manipulation chain, in template order.
    ///
    /// Slot 1 alone when no model is marked.
    #[must_use]
    pub fn manipulable_slots(&self) -> Vec<usize> {
        let marked: Vec<usize> = self
            .models
            .iter()
            .enumerate()
            .filter(|(_, model)| model.is_manipulated())
            .map(|(slot, _)| slot)
            .collect();
        if marked.is_empty() { vec![1] } else { marked }
    }

    /// Validate the scenario description.
    ///
    /// The scenario type tag is resolved later against the variant registry.
    pub fn validate(&self) -> Result<()> {
        if self.models.len() < 2 {
            return Err(ConfigError::invalid_models(format!(
                "need at least 2 models, got {}",
                self.models.len()
            )));
        }
        for model in &self.models {
            model.object_kind()?;
            if !model.mass_scale.is_finite() || model.mass_scale <= 0.0 {
                return Err(ConfigError::invalid_models(format!(
                    "model '{}' has mass scale {}",
                    model.name, model.mass_scale
                )));
            }
        }
        if self.models[0].is_manipulated() {
            return Err(ConfigError::invalid_models(
                "slot 0 is layout-fixed and cannot be manipulated",
            ));
        }
        self.bounds.validate()?;
        if self.simulation_mode.uses_optimizer() && self.optimizer.is_none() {
            return Err(ConfigError::invalid(format!(
                "simulation mode '{}' needs optimizer parameters",
                self.simulation_mode
            )));
        }
        if let Some(trials) = &self.trials {
            trials.validate()?;
        }
        if self.max_placement_attempts == Some(0) {
            return Err(ConfigError::invalid("max_placement_attempts must be > 0"));
        }
        Ok(())
    }
}

/// Grid layout placing copies side by side without overlap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Copies per grid column.
    pub display_rows: usize,
    /// Y offset between rows.
    pub row_offset: f64,
    /// X offset between columns.
    pub column_offset: f64,
    /// Z offset between floors.
    pub floor_offset: f64,
    /// Copies sharing one floor.
    pub copies_per_floor: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            display_rows: 1,
            row_offset: 0.0,
            column_offset: 0.0,
            floor_offset: 0.0,
            copies_per_floor: usize::MAX,
        }
    }
}

impl DisplayConfig {
    /// Create a grid layout.
    #[must_use]
    pub const fn new(
        display_rows: usize,
        row_offset: f64,
        column_offset: f64,
        floor_offset: f64,
        copies_per_floor: usize,
    ) -> Self {
        Self {
            display_rows,
            row_offset,
            column_offset,
            floor_offset,
            copies_per_floor,
        }
    }

    /// Number of floors needed for `copies` copies.
    #[must_use]
    pub fn floor_count(&self, copies: usize) -> usize {
        if copies == 0 {
            0
        } else {
            (copies - 1) / self.copies_per_floor.max(1) + 1
        }
    }

    /// Validate the layout.
    pub fn validate(&self) -> Result<()> {
        if self.display_rows == 0 {
            return Err(ConfigError::invalid_layout("display_rows must be > 0"));
        }
        if self.copies_per_floor == 0 {
            return Err(ConfigError::invalid_layout("copies_per_floor must be > 0"));
        }
        let offsets = [self.row_offset, self.column_offset, self.floor_offset];
        if offsets.iter().any(|o| !o.is_finite()) {
            return Err(ConfigError::invalid_layout("offsets must be finite"));
        }
        Ok(())
    }
}

/// Thresholds used by success predicates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    /// Maximum position drift for an object to count as unmoved.
    pub translation_tolerance: f64,
    /// Maximum orientation drift (degrees); carried for custom variants.
    pub rotation_tolerance: f64,
    /// Maximum gap for a resting contact between two boxes.
    pub translation_epsilon: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            translation_tolerance: 1.0,
            rotation_tolerance: 5.0,
            translation_epsilon: 0.5,
        }
    }
}

impl Tolerances {
    /// Create tolerances.
    #[must_use]
    pub const fn new(
        translation_tolerance: f64,
        rotation_tolerance: f64,
        translation_epsilon: f64,
    ) -> Self {
        Self {
            translation_tolerance,
            rotation_tolerance,
            translation_epsilon,
        }
    }

    /// Validate the tolerances.
    pub fn validate(&self) -> Result<()> {
        let values = [
            self.translation_tolerance,
            self.rotation_tolerance,
            self.translation_epsilon,
        ];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ConfigError::invalid("tolerances must be finite and >= 0"));
        }
        Ok(())
    }
}

/// Top-level run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of parallel scenario copies.
    pub copies: usize,
    /// Accumulated tick time (seconds) between control steps.
    #[serde(default = "default_settle_duration")]
    pub settle_duration: f64,
    /// Success thresholds.
    #[serde(default)]
    pub tolerances: Tolerances,
    /// Append-only learning-data log.
    pub log_file: PathBuf,
    /// Grid layout.
    #[serde(default)]
    pub display: DisplayConfig,
    /// Scenario description.
    pub scenario: ScenarioConfig,
    /// Seed for the pose sampler; entropy when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_settle_duration() -> f64 {
    2.0
}

impl RunConfig {
    /// Create a run configuration with default tolerances and layout.
    #[must_use]
    pub fn new(copies: usize, log_file: impl Into<PathBuf>, scenario: ScenarioConfig) -> Self {
        Self {
            copies,
            settle_duration: default_settle_duration(),
            tolerances: Tolerances::default(),
            log_file: log_file.into(),
            display: DisplayConfig::default(),
            scenario,
            seed: None,
        }
    }

    /// Sets the display layout.
    #[must_use]
    pub const fn with_display(mut self, display: DisplayConfig) -> Self {
        self.display = display;
        self
    }

    /// Sets the tolerances.
    #[must_use]
    pub const fn with_tolerances(mut self, tolerances: Tolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    /// Sets the settle duration.
    #[must_use]
    pub const fn with_settle_duration(mut self, seconds: f64) -> Self {
        self.settle_duration = seconds;
        self
    }

    /// Sets the sampler seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the whole run configuration.
    pub fn validate(&self) -> Result<()> {
        if self.copies == 0 {
            return Err(ConfigError::invalid("copies must be > 0"));
        }
        if !self.settle_duration.is_finite() || self.settle_duration < 0.0 {
            return Err(ConfigError::invalid(format!(
                "settle_duration {} must be finite and >= 0",
                self.settle_duration
            )));
        }
        self.tolerances.validate()?;
        self.display.validate()?;
        self.scenario.validate()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn tower() -> ScenarioConfig {
        ScenarioConfig::new("cube_tower", SimulationMode::Optimised)
            .with_model(ModelConfig::new("table", ObjectKind::Cube, Pose::default()))
            .with_model(ModelConfig::new(
                "manipulated_cube_1",
                ObjectKind::Cube,
                Pose::default(),
            ))
            .with_model(ModelConfig::new("static_cube", ObjectKind::Cube, Pose::default()))
            .with_model(ModelConfig::new(
                "manipulated_cube_2",
                ObjectKind::Cube,
                Pose::default(),
            ))
            .with_optimizer(OptimizerParams::new(
                "optimise.py",
                "request.txt",
                "response.txt",
                "keys.txt",
            ))
    }

    #[test]
    fn object_kind_parses_known_tags() {
        for kind in ObjectKind::ALL {
            assert_eq!(kind.as_str().parse::<ObjectKind>().unwrap(), kind);
        }
        assert!(matches!(
            "teapot".parse::<ObjectKind>(),
            Err(ConfigError::UnknownObjectType(_))
        ));
    }

    #[test]
    fn simulation_mode_tags() {
        assert_eq!(
            "rotation_optimised".parse::<SimulationMode>().unwrap(),
            SimulationMode::RotationOptimised
        );
        assert!("annealed".parse::<SimulationMode>().is_err());
        assert!(SimulationMode::Optimised.uses_optimizer());
        assert!(!SimulationMode::Random.uses_optimizer());
        assert!(SimulationMode::Random.records_learning_data());
        assert!(!SimulationMode::Optimised.records_learning_data());
    }

    #[test]
    fn manipulable_slots_follow_names() {
        assert_eq!(tower().manipulable_slots(), vec![1, 3]);

        let unmarked = ScenarioConfig::new("container", SimulationMode::Random)
            .with_model(ModelConfig::new("floor", ObjectKind::Floor, Pose::default()))
            .with_model(ModelConfig::new("cup", ObjectKind::Cup, Pose::default()));
        assert_eq!(unmarked.manipulable_slots(), vec![1]);
    }

    #[test]
    fn validate_rejects_unknown_object_type() {
        let mut config = tower();
        config.models[2].kind = "teapot".into();
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnknownObjectType("teapot".into()))
        );
    }

    #[test]
    fn validate_rejects_inverted_bounds() {
        let mut config = tower();
        config.bounds.yaw = AxisRange::new(10.0, -10.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBounds { axis: "yaw", .. })
        ));
    }

    #[test]
    fn validate_rejects_manipulated_slot_zero() {
        let config = ScenarioConfig::new("container", SimulationMode::Random)
            .with_model(ModelConfig::new("manipulated", ObjectKind::Cup, Pose::default()))
            .with_model(ModelConfig::new("cup", ObjectKind::Cup, Pose::default()));
        assert!(matches!(config.validate(), Err(ConfigError::InvalidModels(_))));
    }

    #[test]
    fn validate_requires_optimizer_for_optimised_modes() {
        let mut config = tower();
        config.optimizer = None;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        config.simulation_mode = SimulationMode::Random;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn floor_count_rounds_up() {
        let display = DisplayConfig::new(2, 100.0, 100.0, 1000.0, 4);
        assert_eq!(display.floor_count(0), 0);
        assert_eq!(display.floor_count(4), 1);
        assert_eq!(display.floor_count(5), 2);
        assert_eq!(display.floor_count(8), 2);
    }

    #[test]
    fn run_config_json_defaults() {
        let json = r#"{
            "copies": 4,
            "log_file": "delta.log",
            "display": {
                "display_rows": 2,
                "row_offset": 150.0,
                "column_offset": 200.0,
                "floor_offset": 1000.0,
                "copies_per_floor": 16
            },
            "scenario": {
                "type": "cube_tower",
                "simulation_mode": "rotation_optimised",
                "optimizer": {
                    "request_file": "request.txt",
                    "response_file": "response.txt",
                    "keys_file": "keys.txt",
                    "script": "optimise.py",
                    "interpreter": "python"
                },
                "models": [
                    { "name": "table", "type": "cube", "physics": false },
                    { "name": "manipulated_cube", "type": "cube", "mass_scale": 0.5,
                      "pose": { "position": [0.0, 0.0, 10.0],
                                "rotation": { "roll": 0.0, "pitch": 0.0, "yaw": 45.0 } } }
                ]
            }
        }"#;
        let config = RunConfig::from_json_str(json).unwrap();
        assert_eq!(config.copies, 4);
        assert_eq!(config.settle_duration, 2.0);
        assert_eq!(config.scenario.models[1].mass_scale, 0.5);
        assert!(!config.scenario.models[0].physics);
        assert_eq!(config.scenario.models[1].pose.rotation.yaw, 45.0);
        let optimizer = config.scenario.optimizer.as_ref().unwrap();
        assert_eq!(optimizer.interpreter.as_deref(), Some("python"));
        assert!(optimizer.hyperparameters.is_empty());
        assert_eq!(
            config.scenario.max_placement_attempts,
            Some(DEFAULT_PLACEMENT_ATTEMPTS)
        );
    }

    #[test]
    fn run_config_json_round_trip() {
        let config = RunConfig::new(3, "out.log", tower())
            .with_display(DisplayConfig::new(3, 10.0, 20.0, 30.0, 9))
            .with_seed(7);
        let json = config.to_json_string().unwrap();
        assert_eq!(RunConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn run_config_rejects_zero_rows() {
        let config = RunConfig::new(3, "out.log", tower())
            .with_display(DisplayConfig::new(0, 10.0, 20.0, 30.0, 9));
        assert!(matches!(config.validate(), Err(ConfigError::InvalidLayout(_))));
    }
}
