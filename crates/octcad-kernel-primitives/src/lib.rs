#![warn(missing_docs)]

//! Solid descriptors for the octcad octree kernel.
//!
//! Two families of input feed the octree builder: parametric primitives
//! (sphere, block, cylinder, cone) and triangle soups produced by a mesh
//! loader. This crate defines both, plus the initial bounding cube each
//! solid is decomposed inside of.
//!
//! Descriptors are serde-serializable so the CLI can persist them as
//! JSON scene files.

use octcad_kernel_math::{Aabb3, Point3, Vec3};
use serde::{Deserialize, Serialize};

/// Sphere given by center and radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    /// Center of the sphere.
    pub center: Point3,
    /// Radius of the sphere.
    pub radius: f64,
}

/// Axis-aligned rectangular block centered at `center`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Center of the block.
    pub center: Point3,
    /// Full side lengths along each axis.
    pub extents: Vec3,
    /// Orientation (inert: intersection math treats the block as
    /// axis-aligned regardless of this field).
    #[serde(default = "zero_vec")]
    pub orientation: Vec3,
}

/// Cylinder with its base disc at `center`, axis along +Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cylinder {
    /// Center of the base disc.
    pub center: Point3,
    /// Radius of the cylinder.
    pub radius: f64,
    /// Height along +Z.
    pub height: f64,
    /// Orientation (inert, see [`Block::orientation`]).
    #[serde(default = "zero_vec")]
    pub orientation: Vec3,
}

/// Cone with its base disc at `center`, apex at `center.z + height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cone {
    /// Center of the base disc.
    pub center: Point3,
    /// Radius of the base disc.
    pub radius: f64,
    /// Height along +Z.
    pub height: f64,
    /// Orientation (inert, see [`Block::orientation`]).
    #[serde(default = "zero_vec")]
    pub orientation: Vec3,
}

fn zero_vec() -> Vec3 {
    Vec3::zeros()
}

/// Any of the four parametric primitives, tagged for JSON scene files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Primitive {
    /// A [`Sphere`].
    Sphere(Sphere),
    /// A [`Block`].
    Block(Block),
    /// A [`Cylinder`].
    Cylinder(Cylinder),
    /// A [`Cone`].
    Cone(Cone),
}

impl Primitive {
    /// Initial region of space the solid is decomposed inside of.
    ///
    /// Sphere and block get a cube; cylinder and cone get the tight box
    /// around base circle and height (the root box is only cubic when the
    /// solid makes it so).
    pub fn bounding_box(&self) -> Aabb3 {
        match self {
            Primitive::Sphere(s) => {
                let r = Vec3::new(s.radius, s.radius, s.radius);
                Aabb3::new(s.center - r, s.center + r)
            }
            Primitive::Block(b) => {
                let side = b.extents.x.max(b.extents.y).max(b.extents.z);
                let half = Vec3::new(side, side, side) / 2.0;
                Aabb3::new(b.center - half, b.center + half)
            }
            Primitive::Cylinder(c) => radial_box(c.center, c.radius, c.height),
            Primitive::Cone(c) => radial_box(c.center, c.radius, c.height),
        }
    }
}

fn radial_box(base: Point3, radius: f64, height: f64) -> Aabb3 {
    Aabb3::new(
        Point3::new(base.x - radius, base.y - radius, base.z),
        Point3::new(base.x + radius, base.y + radius, base.z + height),
    )
}

/// A triangle soup: positions plus faces as ordered loops of vertex indices.
///
/// This is the entire mesh-ingestion contract: no normals, no materials,
/// no file-format knowledge. Faces may have more than 3 vertices; faces
/// with fewer than 3 are ignored by consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleSoup {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Faces, each an ordered loop of indices into `vertices`.
    pub faces: Vec<Vec<usize>>,
}

impl TriangleSoup {
    /// Positions of one face's vertex loop. Out-of-range indices are skipped.
    pub fn face_points(&self, face: &[usize]) -> Vec<Point3> {
        face.iter()
            .filter_map(|&i| self.vertices.get(i).copied())
            .collect()
    }

    /// Smallest cube containing every vertex, centered on the vertex
    /// bounding box and sized by its largest side.
    ///
    /// A cubic root keeps every octree cell cubic, which the surface-area
    /// metric relies on.
    pub fn bounding_cube(&self) -> Aabb3 {
        let mut tight = Aabb3::empty();
        for v in &self.vertices {
            tight.include_point(v);
        }
        if self.vertices.is_empty() {
            return Aabb3::new(Point3::origin(), Point3::origin());
        }
        let extent = tight.extent();
        let half = extent.x.max(extent.y).max(extent.z) / 2.0;
        let center = tight.center();
        let half = Vec3::new(half, half, half);
        Aabb3::new(center - half, center + half)
    }
}
