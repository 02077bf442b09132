//! Axis-aligned bounding volumes
//!
//! Closed-interval AABBs with a cached center. Touching boxes overlap.

use crate::foundation::math::{Point3, Transform, Vec3};

/// Axis-Aligned Bounding Box plus its center
///
/// An *empty* volume (no geometry) has `min = +inf` and `max = -inf` on every
/// axis; it never overlaps anything and its center is the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingVolume {
    min: Vec3,
    max: Vec3,
    center: Vec3,
}

impl Default for BoundingVolume {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoundingVolume {
    /// Create a volume from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min,
            max,
            center: (min + max) * 0.5,
        }
    }

    /// The volume of an entity without geometry
    pub fn empty() -> Self {
        Self {
            min: Vec3::repeat(f32::INFINITY),
            max: Vec3::repeat(f32::NEG_INFINITY),
            center: Vec3::zeros(),
        }
    }

    /// Smallest volume containing every point; empty for no points
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut min = Vec3::repeat(f32::INFINITY);
        let mut max = Vec3::repeat(f32::NEG_INFINITY);
        let mut any = false;
        for point in points {
            min = min.inf(&point);
            max = max.sup(&point);
            any = true;
        }
        if any {
            Self::new(min, max)
        } else {
            Self::empty()
        }
    }

    /// Minimum corner
    pub fn min(&self) -> Vec3 {
        self.min
    }

    /// Maximum corner
    pub fn max(&self) -> Vec3 {
        self.max
    }

    /// Center point
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Half-size along each axis; zero for the empty volume
    pub fn extents(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::zeros()
        } else {
            (self.max - self.min) * 0.5
        }
    }

    /// True if `min > max` on any axis
    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    /// Closed-interval overlap test; symmetric, and false if either side is empty
    pub fn overlaps(&self, other: &BoundingVolume) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// World-space AABB of this (model-space) volume under `transform`
    ///
    /// All eight corners are transformed and re-boxed, so rotated geometry
    /// grows to stay axis-aligned.
    pub fn transformed(&self, transform: &Transform) -> Self {
        if self.is_empty() {
            return Self::empty();
        }
        let matrix = transform.to_matrix();
        Self::from_points(self.corners().into_iter().map(|corner| {
            matrix.transform_point(&Point3::from(corner)).coords
        }))
    }

    /// Euclidean distance between this volume's center and a point
    pub fn center_distance(&self, point: Vec3) -> f32 {
        (self.center - point).magnitude()
    }

    fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }
}
