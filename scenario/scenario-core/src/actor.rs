//! Scene-actor capability port.

use std::fmt;

use nalgebra::Vector3;
use scenario_types::{Aabb, EulerAngles, ObjectKind, Pose};

use crate::error::Result;

/// Opaque handle to an object in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor #{}", self.0)
    }
}

/// What the orchestrator needs from the world hosting the copies.
///
/// Implemented by physics or rendering backends; [`KinematicScene`] is a
/// headless implementation with no dynamics. Every method taking an
/// [`ActorId`] fails with [`ScenarioError::UnknownActor`] for handles the
/// scene never issued.
///
/// [`KinematicScene`]: crate::KinematicScene
/// [`ScenarioError::UnknownActor`]: crate::ScenarioError::UnknownActor
pub trait Scene {
    /// Spawn an object of `kind` and return its handle.
    fn instantiate(&mut self, kind: ObjectKind) -> ActorId;

    /// Move an object to a full pose.
    fn set_pose(&mut self, id: ActorId, pose: Pose) -> Result<()>;

    /// Change only an object's orientation.
    fn set_rotation(&mut self, id: ActorId, rotation: EulerAngles) -> Result<()>;

    /// Current pose.
    fn pose(&self, id: ActorId) -> Result<Pose>;

    /// Current world-space bounding box.
    fn bounding_box(&self, id: ActorId) -> Result<Aabb>;

    /// Enable or disable physical simulation of an object.
    fn set_physics_enabled(&mut self, id: ActorId, enabled: bool) -> Result<()>;

    /// Scale an object's mass.
    fn set_mass_scale(&mut self, id: ActorId, scale: f64) -> Result<()>;

    /// Offset an object's center of mass.
    fn set_com_offset(&mut self, id: ActorId, offset: Vector3<f64>) -> Result<()>;

    /// Scale an object's geometry.
    fn set_scale(&mut self, id: ActorId, scale: Vector3<f64>) -> Result<()>;
}
