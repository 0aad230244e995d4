//! Core types for manipulation episode generation.
//!
//! This crate provides the plain-data vocabulary shared by the sampler, the
//! optimizer bridge and the orchestrator:
//!
//! - [`Pose`] / [`EulerAngles`] - Object position plus roll/pitch/yaw
//! - [`Aabb`] - World-space bounding box
//! - [`ScenarioConfig`], [`ModelConfig`] - What to build in every copy
//! - [`DisplayConfig`] - Grid layout for parallel copies
//! - [`RunConfig`] - Top-level run settings, loadable from JSON
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with **zero engine dependencies**. Physics,
//! rendering and the optimizer itself live outside the workspace.
//!
//! # Coordinate System
//!
//! - X: right (layout axis for container scenarios)
//! - Y: forward
//! - Z: up
//! - Angles in degrees
//!
//! # Example
//!
//! ```
//! use scenario_types::{ModelConfig, ObjectKind, Pose, ScenarioConfig, SimulationMode};
//! use nalgebra::Point3;
//!
//! let config = ScenarioConfig::new("cube_tower", SimulationMode::Random)
//!     .with_model(ModelConfig::new("table", ObjectKind::Cube, Pose::default()))
//!     .with_model(ModelConfig::new(
//!         "manipulated_cube",
//!         ObjectKind::Cube,
//!         Pose::from_position(Point3::new(0.0, 0.0, 15.0)),
//!     ))
//!     .with_model(ModelConfig::new(
//!         "base_cube",
//!         ObjectKind::Cube,
//!         Pose::from_position(Point3::new(0.0, 0.0, 5.0)),
//!     ));
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.manipulable_slots(), vec![1]);
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn, // Many methods can't be const due to nalgebra
    clippy::missing_errors_doc,   // Error docs added where non-obvious
)]

mod bounds;
mod config;
mod error;
mod pose;

pub use bounds::Aabb;
pub use config::{
    AxisRange, DisplayConfig, ModelConfig, ObjectKind, OptimizerParams, PoseBounds, RunConfig,
    ScenarioConfig, SimulationMode, Tolerances, TrialParams, DEFAULT_PLACEMENT_ATTEMPTS,
    MANIPULATED_MARKER,
};
pub use error::{ConfigError, Result};
pub use pose::{EulerAngles, Pose};

// Re-export math types for convenience
pub use nalgebra::{Point3, Vector3};
