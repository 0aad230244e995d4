//! Headless scene backend without dynamics.
//!
//! Objects are axis-aligned boxes in their own frame, sized by a per-kind
//! nominal half extent times their scale. They stay exactly where they are
//! put: there is no gravity, no contact and no settling. Tests emulate
//! settling or disturbance with [`KinematicScene::displace`].

use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};
use scenario_types::{Aabb, EulerAngles, ObjectKind, Pose};

use crate::actor::{ActorId, Scene};
use crate::error::{Result, ScenarioError};

#[derive(Debug, Clone)]
struct KinematicActor {
    kind: ObjectKind,
    pose: Pose,
    scale: Vector3<f64>,
    physics: bool,
    mass_scale: f64,
    com_offset: Vector3<f64>,
}

/// Reference [`Scene`] that only tracks poses and box extents.
///
/// # Example
///
/// ```
/// use scenario_core::{KinematicScene, Scene};
/// use scenario_types::{ObjectKind, Pose, Vector3};
///
/// let mut scene = KinematicScene::new()
///     .with_half_extents(ObjectKind::Cube, Vector3::new(1.0, 1.0, 1.0));
/// let cube = scene.instantiate(ObjectKind::Cube);
/// scene.set_pose(cube, Pose::from_components(0.0, 0.0, 1.0, 0.0, 0.0, 0.0)).unwrap();
///
/// let bbox = scene.bounding_box(cube).unwrap();
/// assert_eq!(bbox.bottom(), 0.0);
/// assert_eq!(bbox.top(), 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct KinematicScene {
    actors: HashMap<ActorId, KinematicActor>,
    extents: HashMap<ObjectKind, Vector3<f64>>,
    next_id: u64,
}

impl Default for KinematicScene {
    fn default() -> Self {
        Self::new()
    }
}

impl KinematicScene {
    /// Create an empty scene with nominal extents for every known kind.
    #[must_use]
    pub fn new() -> Self {
        let extents = ObjectKind::ALL
            .iter()
            .map(|&kind| (kind, nominal_half_extents(kind)))
            .collect();
        Self {
            actors: HashMap::new(),
            extents,
            next_id: 0,
        }
    }

    /// Override the unscaled half extents used for `kind`.
    #[must_use]
    pub fn with_half_extents(mut self, kind: ObjectKind, half_extents: Vector3<f64>) -> Self {
        self.extents.insert(kind, half_extents.abs());
        self
    }

    /// Unscaled half extents for `kind`.
    #[must_use]
    pub fn half_extents(&self, kind: ObjectKind) -> Vector3<f64> {
        self.extents
            .get(&kind)
            .copied()
            .unwrap_or_else(|| nominal_half_extents(kind))
    }

    /// Number of actors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Whether no actor has been spawned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Kind of an actor.
    pub fn kind(&self, id: ActorId) -> Result<ObjectKind> {
        self.actor(id).map(|a| a.kind)
    }

    /// Whether physics is enabled for an actor.
    pub fn physics_enabled(&self, id: ActorId) -> Result<bool> {
        self.actor(id).map(|a| a.physics)
    }

    /// Mass scale of an actor.
    pub fn mass_scale(&self, id: ActorId) -> Result<f64> {
        self.actor(id).map(|a| a.mass_scale)
    }

    /// Center-of-mass offset of an actor.
    pub fn com_offset(&self, id: ActorId) -> Result<Vector3<f64>> {
        self.actor(id).map(|a| a.com_offset)
    }

    /// Geometry scale of an actor.
    pub fn scale(&self, id: ActorId) -> Result<Vector3<f64>> {
        self.actor(id).map(|a| a.scale)
    }

    /// Shift an actor's position, keeping its orientation.
    pub fn displace(&mut self, id: ActorId, offset: Vector3<f64>) -> Result<()> {
        let actor = self.actor_mut(id)?;
        actor.pose = actor.pose.translated(&offset);
        Ok(())
    }

    fn actor(&self, id: ActorId) -> Result<&KinematicActor> {
        self.actors.get(&id).ok_or(ScenarioError::UnknownActor(id))
    }

    fn actor_mut(&mut self, id: ActorId) -> Result<&mut KinematicActor> {
        self.actors
            .get_mut(&id)
            .ok_or(ScenarioError::UnknownActor(id))
    }
}

impl Scene for KinematicScene {
    fn instantiate(&mut self, kind: ObjectKind) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id += 1;
        self.actors.insert(
            id,
            KinematicActor {
                kind,
                pose: Pose::default(),
                scale: Vector3::new(1.0, 1.0, 1.0),
                physics: true,
                mass_scale: 1.0,
                com_offset: Vector3::zeros(),
            },
        );
        id
    }

    fn set_pose(&mut self, id: ActorId, pose: Pose) -> Result<()> {
        self.actor_mut(id)?.pose = pose;
        Ok(())
    }

    fn set_rotation(&mut self, id: ActorId, rotation: EulerAngles) -> Result<()> {
        let actor = self.actor_mut(id)?;
        actor.pose = actor.pose.with_rotation(rotation);
        Ok(())
    }

    fn pose(&self, id: ActorId) -> Result<Pose> {
        self.actor(id).map(|a| a.pose)
    }

    fn bounding_box(&self, id: ActorId) -> Result<Aabb> {
        let actor = self.actor(id)?;
        let h = self.half_extents(actor.kind).component_mul(&actor.scale.abs());
        let iso = actor.pose.to_isometry();
        let corners = [-1.0, 1.0].into_iter().flat_map(|sx| {
            [-1.0, 1.0].into_iter().flat_map(move |sy| {
                [-1.0, 1.0]
                    .into_iter()
                    .map(move |sz| iso * Point3::new(sx * h.x, sy * h.y, sz * h.z))
            })
        });
        Ok(Aabb::from_points(corners).unwrap_or_else(|| Aabb::from_point(actor.pose.position)))
    }

    fn set_physics_enabled(&mut self, id: ActorId, enabled: bool) -> Result<()> {
        self.actor_mut(id)?.physics = enabled;
        Ok(())
    }

    fn set_mass_scale(&mut self, id: ActorId, scale: f64) -> Result<()> {
        self.actor_mut(id)?.mass_scale = scale;
        Ok(())
    }

    fn set_com_offset(&mut self, id: ActorId, offset: Vector3<f64>) -> Result<()> {
        self.actor_mut(id)?.com_offset = offset;
        Ok(())
    }

    fn set_scale(&mut self, id: ActorId, scale: Vector3<f64>) -> Result<()> {
        self.actor_mut(id)?.scale = scale;
        Ok(())
    }
}

/// Unscaled half extents (cm) of each object kind.
fn nominal_half_extents(kind: ObjectKind) -> Vector3<f64> {
    match kind {
        ObjectKind::Floor => Vector3::new(1000.0, 1000.0, 0.5),
        ObjectKind::Bookshelf => Vector3::new(40.0, 15.0, 90.0),
        ObjectKind::Fridge => Vector3::new(40.0, 35.0, 90.0),
        ObjectKind::Book => Vector3::new(10.0, 2.0, 14.0),
        ObjectKind::Bottle => Vector3::new(4.0, 4.0, 12.0),
        ObjectKind::Cup => Vector3::new(4.0, 4.0, 5.0),
        ObjectKind::Glass => Vector3::new(3.5, 3.5, 6.0),
        ObjectKind::Cylinder => Vector3::new(5.0, 5.0, 10.0),
        ObjectKind::Cube => Vector3::new(5.0, 5.0, 5.0),
    }
}
