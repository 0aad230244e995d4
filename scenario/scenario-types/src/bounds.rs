//! Axis-aligned bounding box.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box (AABB) in world coordinates.
///
/// # Example
///
/// ```
/// use scenario_types::Aabb;
/// use nalgebra::Point3;
///
/// let a = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 2.0, 2.0));
/// let b = Aabb::new(Point3::new(1.0, 1.0, 1.0), Point3::new(3.0, 3.0, 3.0));
///
/// assert!(a.intersects(&b));
/// assert_eq!(a.bottom(), 0.0);
/// assert_eq!(b.top(), 3.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner (smallest x, y, z values).
    pub min: Point3<f64>,
    /// Maximum corner (largest x, y, z values).
    pub max: Point3<f64>,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::from_point(Point3::origin())
    }
}

impl Aabb {
    /// Create a new AABB from minimum and maximum corners.
    ///
    /// The corners are reordered per axis if necessary.
    #[must_use]
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self {
            min: Point3::new(min.x.min(max.x), min.y.min(max.y), min.z.min(max.z)),
            max: Point3::new(min.x.max(max.x), min.y.max(max.y), min.z.max(max.z)),
        }
    }

    /// Create a zero-volume AABB at a single point.
    #[must_use]
    pub const fn from_point(point: Point3<f64>) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Create an AABB centred on `center` with the given half extents.
    #[must_use]
    pub fn from_center(center: Point3<f64>, half_extents: Vector3<f64>) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Smallest AABB enclosing all `points`.
    ///
    /// Returns `None` for an empty iterator.
    #[must_use]
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3<f64>>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut aabb = Self::from_point(first);
        for p in iter {
            aabb.min = aabb.min.inf(&p);
            aabb.max = aabb.max.sup(&p);
        }
        Some(aabb)
    }

    /// Whether two boxes overlap (touching counts as overlap).
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Lowest z value.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.min.z
    }

    /// Highest z value.
    #[must_use]
    pub fn top(&self) -> f64 {
        self.max.z
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Size along each axis.
    #[must_use]
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Box shifted by `offset`.
    #[must_use]
    pub fn translated(&self, offset: &Vector3<f64>) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Whether `other` lies inside `self` on the x and y axes.
    #[must_use]
    pub fn contains_xy(&self, other: &Self) -> bool {
        other.min.x >= self.min.x
            && other.max.x <= self.max.x
            && other.min.y >= self.min.y
            && other.max.y <= self.max.y
    }

    /// The six protocol values `[min x, min y, min z, max x, max y, max z]`.
    #[must_use]
    pub fn to_components(&self) -> [f64; 6] {
        [
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z,
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn unit_at(x: f64, y: f64, z: f64) -> Aabb {
        Aabb::from_center(Point3::new(x, y, z), Vector3::new(0.5, 0.5, 0.5))
    }

    #[test]
    fn new_reorders_corners() {
        let aabb = Aabb::new(Point3::new(1.0, 0.0, 5.0), Point3::new(0.0, 1.0, 2.0));
        assert_eq!(aabb.min, Point3::new(0.0, 0.0, 2.0));
        assert_eq!(aabb.max, Point3::new(1.0, 1.0, 5.0));
    }

    #[test]
    fn disjoint_boxes_do_not_intersect() {
        assert!(!unit_at(0.0, 0.0, 0.0).intersects(&unit_at(2.0, 0.0, 0.0)));
        assert!(!unit_at(0.0, 0.0, 0.0).intersects(&unit_at(0.0, 0.0, 1.5)));
    }

    #[test]
    fn touching_boxes_intersect() {
        assert!(unit_at(0.0, 0.0, 0.0).intersects(&unit_at(1.0, 0.0, 0.0)));
    }

    #[test]
    fn from_points_encloses_all() {
        let aabb = Aabb::from_points([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 5.0, 3.0),
            Point3::new(-2.0, 8.0, 1.0),
        ])
        .unwrap();
        assert_eq!(aabb.min, Point3::new(-2.0, 0.0, 0.0));
        assert_eq!(aabb.max, Point3::new(10.0, 8.0, 3.0));
        assert!(Aabb::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn contains_xy_ignores_height() {
        let shelf = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 10.0, 1.0));
        assert!(shelf.contains_xy(&unit_at(5.0, 5.0, 20.0)));
        assert!(!shelf.contains_xy(&unit_at(9.8, 5.0, 0.0)));
    }
}
