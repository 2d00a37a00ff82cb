#![warn(missing_docs)]

//! Math types for the octcad octree kernel.
//!
//! Thin wrappers around nalgebra providing domain-specific types for
//! octree spatial decomposition: points, vectors, axis-aligned boxes,
//! and the projection helper used by the separating-axis test.

use nalgebra::Vector3;

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Create an AABB from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an empty (inverted) AABB suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Expand this AABB to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Side lengths along each axis.
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Center point.
    pub fn center(&self) -> Point3 {
        self.min + self.extent() / 2.0
    }

    /// True if min exceeds max on any axis.
    pub fn is_inverted(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Test if two AABBs overlap (touching counts as overlap).
    pub fn overlaps(&self, other: &Aabb3) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// The point inside this box closest to `p` (clamp per axis).
    pub fn closest_point(&self, p: &Point3) -> Point3 {
        Point3::new(
            p.x.clamp(self.min.x, self.max.x),
            p.y.clamp(self.min.y, self.max.y),
            p.z.clamp(self.min.z, self.max.z),
        )
    }

    /// The 8 corners of the box.
    ///
    /// Ordered with x varying fastest, then y, then z.
    pub fn corners(&self) -> [Point3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Point3::new(lo.x, lo.y, lo.z),
            Point3::new(hi.x, lo.y, lo.z),
            Point3::new(lo.x, hi.y, lo.z),
            Point3::new(hi.x, hi.y, lo.z),
            Point3::new(lo.x, lo.y, hi.z),
            Point3::new(hi.x, lo.y, hi.z),
            Point3::new(lo.x, hi.y, hi.z),
            Point3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// The sub-box for octant `i` (0..8).
    ///
    /// Octant `i` sits at offset `(i % 2, (i / 2) % 2, i / 4)` in units of
    /// half the parent extent. Every component of the kernel that walks
    /// children (builder, codec, combinator) relies on this one ordering.
    pub fn octant(&self, i: usize) -> Aabb3 {
        let half = self.extent() / 2.0;
        let offset = Vec3::new((i % 2) as f64, ((i / 2) % 2) as f64, (i / 4) as f64);
        let min = self.min + offset.component_mul(&half);
        Aabb3::new(min, min + half)
    }

    /// Translate the box by `t`.
    pub fn translated(&self, t: &Vec3) -> Aabb3 {
        Aabb3::new(self.min + t, self.max + t)
    }

    /// Scale both corners about the origin by `s`.
    pub fn scaled(&self, s: f64) -> Aabb3 {
        Aabb3::new(self.min * s, self.max * s)
    }
}

/// Project a set of points onto an axis, returning the (min, max) extent.
///
/// The axis need not be normalized; separating-axis overlap tests are
/// scale-invariant. Returns `(0.0, 0.0)` for an empty point set.
pub fn project_extent(points: &[Point3], axis: &Vec3) -> (f64, f64) {
    let mut iter = points.iter();
    let first = match iter.next() {
        Some(p) => p.coords.dot(axis),
        None => return (0.0, 0.0),
    };
    let mut min = first;
    let mut max = first;
    for p in iter {
        let d = p.coords.dot(axis);
        min = min.min(d);
        max = max.max(d);
    }
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_octant_ordering() {
        let b = Aabb3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 2.0, 2.0));
        // Octant 0 is the min corner, octant 7 the max corner.
        assert_eq!(b.octant(0).min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(b.octant(0).max, Point3::new(1.0, 1.0, 1.0));
        assert_eq!(b.octant(1).min, Point3::new(1.0, 0.0, 0.0));
        assert_eq!(b.octant(2).min, Point3::new(0.0, 1.0, 0.0));
        assert_eq!(b.octant(4).min, Point3::new(0.0, 0.0, 1.0));
        assert_eq!(b.octant(7).max, Point3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_octants_partition_parent() {
        let b = Aabb3::new(Point3::new(-5.0, -5.0, -5.0), Point3::new(5.0, 5.0, 5.0));
        let total: f64 = (0..8)
            .map(|i| {
                let e = b.octant(i).extent();
                e.x * e.y * e.z
            })
            .sum();
        let e = b.extent();
        assert!((total - e.x * e.y * e.z).abs() < 1e-9);
    }

    #[test]
    fn test_overlaps_touching() {
        let a = Aabb3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let b = Aabb3::new(Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0));
        let c = Aabb3::new(Point3::new(3.0, 0.0, 0.0), Point3::new(4.0, 1.0, 1.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_closest_point_clamps() {
        let b = Aabb3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        assert_eq!(
            b.closest_point(&Point3::new(5.0, 0.5, -3.0)),
            Point3::new(1.0, 0.5, 0.0)
        );
        let inside = Point3::new(0.25, 0.5, 0.75);
        assert_eq!(b.closest_point(&inside), inside);
    }

    #[test]
    fn test_include_point_grows_empty_box() {
        let mut b = Aabb3::empty();
        b.include_point(&Point3::new(1.0, -2.0, 3.0));
        b.include_point(&Point3::new(-1.0, 2.0, 0.0));
        assert_eq!(b.min, Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(b.max, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_project_extent() {
        let pts = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(-1.0, 5.0, 0.0),
        ];
        let (min, max) = project_extent(&pts, &Vec3::x());
        assert_eq!((min, max), (-1.0, 2.0));
    }

    #[test]
    fn test_translated_and_scaled() {
        let b = Aabb3::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        let t = b.translated(&Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.min, Point3::new(0.0, 1.0, 2.0));
        let s = b.scaled(2.0);
        assert_eq!(s.max, Point3::new(2.0, 2.0, 2.0));
    }
}
