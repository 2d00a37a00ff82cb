//! Conservative box-vs-solid classification.
//!
//! Every test answers "could this box touch the solid?" against bounding
//! geometry, not exact membership, so the only possible answers are
//! `Empty` (certainly disjoint) and `Mixed` (possibly intersecting).
//! Leaves become `Solid` only in the builder, at the depth limit or by
//! collapse.

use octcad_kernel_math::{project_extent, Aabb3, Point3, Vec3};
use octcad_kernel_primitives::{Block, Cone, Cylinder, Primitive, Sphere, TriangleSoup};

use crate::node::Classification;

/// A solid that octree cells can be classified against.
pub trait ClassifySolid {
    /// Classify `bounds` against this solid: `Empty` or `Mixed`, never
    /// `Solid`.
    fn classify(&self, bounds: &Aabb3) -> Classification;
}

impl ClassifySolid for Sphere {
    fn classify(&self, bounds: &Aabb3) -> Classification {
        let closest = bounds.closest_point(&self.center);
        if (closest - self.center).norm_squared() <= self.radius * self.radius {
            Classification::Mixed
        } else {
            Classification::Empty
        }
    }
}

impl ClassifySolid for Block {
    fn classify(&self, bounds: &Aabb3) -> Classification {
        let half = self.extents / 2.0;
        let lo = self.center - half;
        let hi = self.center + half;
        if bounds.overlaps(&Aabb3::new(lo, hi)) {
            Classification::Mixed
        } else {
            Classification::Empty
        }
    }
}

impl ClassifySolid for Cylinder {
    fn classify(&self, bounds: &Aabb3) -> Classification {
        if radial_overlap(bounds, &self.center, self.radius)
            && z_overlap(bounds, self.center.z, self.height)
        {
            Classification::Mixed
        } else {
            Classification::Empty
        }
    }
}

impl ClassifySolid for Cone {
    fn classify(&self, bounds: &Aabb3) -> Classification {
        // Radius shrinks linearly from base to apex, evaluated at the
        // box's top Z. Not clamped at the apex; kept as-is because every
        // existing cone code depends on it.
        let effective = self.radius * (1.0 - (bounds.max.z - self.center.z) / self.height);
        if radial_overlap(bounds, &self.center, effective)
            && z_overlap(bounds, self.center.z, self.height)
        {
            Classification::Mixed
        } else {
            Classification::Empty
        }
    }
}

impl ClassifySolid for Primitive {
    fn classify(&self, bounds: &Aabb3) -> Classification {
        match self {
            Primitive::Sphere(s) => s.classify(bounds),
            Primitive::Block(b) => b.classify(bounds),
            Primitive::Cylinder(c) => c.classify(bounds),
            Primitive::Cone(c) => c.classify(bounds),
        }
    }
}

impl ClassifySolid for TriangleSoup {
    fn classify(&self, bounds: &Aabb3) -> Classification {
        let corners = bounds.corners();
        for face in &self.faces {
            let pts = self.face_points(face);
            if pts.len() < 3 {
                continue;
            }
            if face_intersects_box(&corners, &pts) {
                return Classification::Mixed;
            }
        }
        Classification::Empty
    }
}

/// 2D closest-point test in XY against a circle of `radius` around `axis`.
fn radial_overlap(bounds: &Aabb3, axis: &Point3, radius: f64) -> bool {
    let cx = axis.x.clamp(bounds.min.x, bounds.max.x);
    let cy = axis.y.clamp(bounds.min.y, bounds.max.y);
    let dx = cx - axis.x;
    let dy = cy - axis.y;
    dx * dx + dy * dy <= radius * radius
}

/// Z-interval overlap against `[base_z, base_z + height]`.
fn z_overlap(bounds: &Aabb3, base_z: f64, height: f64) -> bool {
    bounds.min.z <= base_z + height && bounds.max.z >= base_z
}

/// Separating-axis test between a box (given by its 8 corners) and one
/// face's vertex loop.
///
/// Candidate axes: the 3 box principal axes, the face normal, and the
/// cross product of each face edge with each box axis. Degenerate
/// (near-zero) axes are skipped; axes are not normalized because the
/// overlap test is scale-invariant.
pub(crate) fn face_intersects_box(corners: &[Point3; 8], face: &[Point3]) -> bool {
    let box_axes = [Vec3::x(), Vec3::y(), Vec3::z()];
    let normal = (face[1] - face[0]).cross(&(face[2] - face[0]));

    let separated_on = |axis: &Vec3| -> bool {
        if axis.norm_squared() < 1e-12 {
            return false;
        }
        let (box_min, box_max) = project_extent(corners, axis);
        let (face_min, face_max) = project_extent(face, axis);
        box_max < face_min || face_max < box_min
    };

    for axis in &box_axes {
        if separated_on(axis) {
            return false;
        }
    }
    if separated_on(&normal) {
        return false;
    }
    for i in 0..face.len() {
        let edge = face[(i + 1) % face.len()] - face[i];
        for box_axis in &box_axes {
            if separated_on(&edge.cross(box_axis)) {
                return false;
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(min: f64, max: f64) -> Aabb3 {
        Aabb3::new(Point3::new(min, min, min), Point3::new(max, max, max))
    }

    #[test]
    fn test_sphere_classify() {
        let s = Sphere {
            center: Point3::origin(),
            radius: 1.0,
        };
        assert_eq!(s.classify(&cube(-0.5, 0.5)), Classification::Mixed);
        assert_eq!(s.classify(&cube(2.0, 3.0)), Classification::Empty);
        // Touching counts as mixed.
        assert_eq!(
            s.classify(&Aabb3::new(
                Point3::new(1.0, -1.0, -1.0),
                Point3::new(2.0, 1.0, 1.0)
            )),
            Classification::Mixed
        );
    }

    #[test]
    fn test_block_classify() {
        let b = Block {
            center: Point3::origin(),
            extents: Vec3::new(2.0, 2.0, 2.0),
            orientation: Vec3::zeros(),
        };
        assert_eq!(b.classify(&cube(-0.5, 0.5)), Classification::Mixed);
        assert_eq!(b.classify(&cube(1.5, 2.5)), Classification::Empty);
    }

    #[test]
    fn test_cylinder_classify_respects_height() {
        let c = Cylinder {
            center: Point3::origin(),
            radius: 1.0,
            height: 2.0,
            orientation: Vec3::zeros(),
        };
        assert_eq!(c.classify(&cube(-0.5, 0.5)), Classification::Mixed);
        // Radially inside but above the cap.
        assert_eq!(
            c.classify(&Aabb3::new(
                Point3::new(-0.5, -0.5, 3.0),
                Point3::new(0.5, 0.5, 4.0)
            )),
            Classification::Empty
        );
        // Within the height band but radially out.
        assert_eq!(
            c.classify(&Aabb3::new(
                Point3::new(3.0, 3.0, 0.0),
                Point3::new(4.0, 4.0, 1.0)
            )),
            Classification::Empty
        );
    }

    #[test]
    fn test_cone_narrows_toward_apex() {
        let c = Cone {
            center: Point3::origin(),
            radius: 2.0,
            height: 4.0,
            orientation: Vec3::zeros(),
        };
        // Near the base a box at radius ~1.5 is touched.
        let near_base = Aabb3::new(Point3::new(1.4, -0.1, 0.0), Point3::new(1.6, 0.1, 0.1));
        assert_eq!(c.classify(&near_base), Classification::Mixed);
        // The same XY offset near the apex is outside the shrunken radius.
        let near_apex = Aabb3::new(Point3::new(1.4, -0.1, 3.8), Point3::new(1.6, 0.1, 3.9));
        assert_eq!(c.classify(&near_apex), Classification::Empty);
    }

    #[test]
    fn test_mesh_sat_single_triangle() {
        let soup = TriangleSoup {
            vertices: vec![
                Point3::new(0.0, 0.0, 0.5),
                Point3::new(1.0, 0.0, 0.5),
                Point3::new(0.0, 1.0, 0.5),
            ],
            faces: vec![vec![0, 1, 2]],
        };
        assert_eq!(soup.classify(&cube(0.0, 1.0)), Classification::Mixed);
        assert_eq!(soup.classify(&cube(2.0, 3.0)), Classification::Empty);
        // Box below the triangle's plane.
        assert_eq!(
            soup.classify(&Aabb3::new(
                Point3::new(0.0, 0.0, -1.0),
                Point3::new(1.0, 1.0, 0.2)
            )),
            Classification::Empty
        );
    }

    #[test]
    fn test_mesh_degenerate_faces_skipped() {
        let soup = TriangleSoup {
            vertices: vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)],
            faces: vec![vec![0, 1], vec![]],
        };
        assert_eq!(soup.classify(&cube(-1.0, 1.0)), Classification::Empty);
    }

    #[test]
    fn test_sat_degenerate_edge_axis_skipped() {
        // Triangle with an edge parallel to a box axis: edge × axis is
        // zero and must not separate anything.
        let soup = TriangleSoup {
            vertices: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.5, 1.0, 0.0),
            ],
            faces: vec![vec![0, 1, 2]],
        };
        assert_eq!(soup.classify(&cube(-0.1, 1.1)), Classification::Mixed);
    }

    #[test]
    fn test_quad_face_supported() {
        let soup = TriangleSoup {
            vertices: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
                Point3::new(2.0, 2.0, 0.0),
                Point3::new(0.0, 2.0, 0.0),
            ],
            faces: vec![vec![0, 1, 2, 3]],
        };
        let straddling = Aabb3::new(Point3::new(0.5, 0.5, -0.5), Point3::new(1.5, 1.5, 0.5));
        assert_eq!(soup.classify(&straddling), Classification::Mixed);
    }
}
