//! Object pose types.
//!
//! Poses are stored the way the optimizer protocol and the learning-data log
//! exchange them: a position plus roll/pitch/yaw angles in degrees. Geometry
//! that needs a proper rotation goes through [`Pose::to_isometry`].

use nalgebra::{Isometry3, Point3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Orientation as roll/pitch/yaw angles in degrees.
///
/// Roll rotates about X, pitch about Y, yaw about Z.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EulerAngles {
    /// Rotation about the X axis (degrees).
    pub roll: f64,
    /// Rotation about the Y axis (degrees).
    pub pitch: f64,
    /// Rotation about the Z axis (degrees).
    pub yaw: f64,
}

impl EulerAngles {
    /// Create angles from roll, pitch and yaw in degrees.
    #[must_use]
    pub const fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self { roll, pitch, yaw }
    }

    /// Zero rotation.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Convert to a unit quaternion.
    #[must_use]
    pub fn to_quaternion(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_euler_angles(
            self.roll.to_radians(),
            self.pitch.to_radians(),
            self.yaw.to_radians(),
        )
    }

    /// The angles as `[roll, pitch, yaw]`.
    #[must_use]
    pub const fn to_array(&self) -> [f64; 3] {
        [self.roll, self.pitch, self.yaw]
    }
}

/// Position and orientation of an object.
///
/// # Example
///
/// ```
/// use scenario_types::{EulerAngles, Pose};
/// use nalgebra::{Point3, Vector3};
///
/// let pose = Pose::new(Point3::new(1.0, 2.0, 3.0), EulerAngles::new(0.0, 0.0, 90.0));
/// let shifted = pose.translated(&Vector3::new(10.0, 0.0, 0.0));
///
/// assert_eq!(shifted.position.x, 11.0);
/// assert_eq!(shifted.rotation.yaw, 90.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Position in world coordinates.
    pub position: Point3<f64>,
    /// Orientation.
    pub rotation: EulerAngles,
}

impl Default for Pose {
    fn default() -> Self {
        Self::from_position(Point3::origin())
    }
}

impl Pose {
    /// Create a pose from position and rotation.
    #[must_use]
    pub const fn new(position: Point3<f64>, rotation: EulerAngles) -> Self {
        Self { position, rotation }
    }

    /// Create a pose from the six protocol values `x y z roll pitch yaw`.
    #[must_use]
    pub fn from_components(x: f64, y: f64, z: f64, roll: f64, pitch: f64, yaw: f64) -> Self {
        Self {
            position: Point3::new(x, y, z),
            rotation: EulerAngles::new(roll, pitch, yaw),
        }
    }

    /// Create a pose at `position` with zero rotation.
    #[must_use]
    pub fn from_position(position: Point3<f64>) -> Self {
        Self::new(position, EulerAngles::zero())
    }

    /// The six protocol values `[x, y, z, roll, pitch, yaw]`.
    #[must_use]
    pub fn to_components(&self) -> [f64; 6] {
        [
            self.position.x,
            self.position.y,
            self.position.z,
            self.rotation.roll,
            self.rotation.pitch,
            self.rotation.yaw,
        ]
    }

    /// Same rotation, position shifted by `offset`.
    #[must_use]
    pub fn translated(&self, offset: &Vector3<f64>) -> Self {
        Self {
            position: self.position + offset,
            rotation: self.rotation,
        }
    }

    /// Same position, different rotation.
    #[must_use]
    pub const fn with_rotation(&self, rotation: EulerAngles) -> Self {
        Self {
            position: self.position,
            rotation,
        }
    }

    /// Convert to an isometry.
    #[must_use]
    pub fn to_isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(self.position.coords.into(), self.rotation.to_quaternion())
    }

    /// Euclidean distance between the positions of two poses.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        nalgebra::distance(&self.position, &other.position)
    }

    /// Whether both positions lie within `tolerance` of each other.
    ///
    /// Orientation is ignored.
    #[must_use]
    pub fn same_position(&self, other: &Self, tolerance: f64) -> bool {
        self.distance(other) <= tolerance
    }

    /// Check if the pose contains `NaN` or `Inf` values.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.to_components().iter().all(|v| v.is_finite())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn components_round_trip() {
        let pose = Pose::from_components(1.0, -2.0, 3.5, 10.0, 20.0, 30.0);
        assert_eq!(pose.to_components(), [1.0, -2.0, 3.5, 10.0, 20.0, 30.0]);
    }

    #[test]
    fn yaw_rotates_about_z() {
        let pose = Pose::new(Point3::origin(), EulerAngles::new(0.0, 0.0, 90.0));
        let p = pose.to_isometry() * Point3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-10);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn same_position_ignores_rotation() {
        let a = Pose::from_components(0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        let b = Pose::from_components(3.0, 4.0, 0.0, 45.0, 0.0, 0.0);
        assert_relative_eq!(a.distance(&b), 5.0, epsilon = 1e-12);
        assert!(a.same_position(&b, 5.0));
        assert!(!a.same_position(&b, 4.9));
    }

    #[test]
    fn non_finite_detected() {
        let pose = Pose::from_components(f64::NAN, 0.0, 0.0, 0.0, 0.0, 0.0);
        assert!(!pose.is_finite());
        assert!(Pose::default().is_finite());
    }
}
