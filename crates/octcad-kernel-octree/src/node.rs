//! The spatial node model: one axis-aligned region of space per node,
//! with exclusive ownership of up to 8 octant children.

use octcad_kernel_math::Aabb3;

/// How a node's region relates to the solid being approximated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Classification {
    /// No solid material in this region.
    #[default]
    Empty,
    /// Region is entirely filled; always a leaf.
    Solid,
    /// Region straddles the solid boundary; owns 8 children.
    Mixed,
}

/// One node of the octree.
///
/// A `Solid` or `Empty` node never owns children. A `Mixed` node owns
/// exactly 8 children partitioning its box into equal octants (see
/// [`Aabb3::octant`] for the index convention); all-`None` children on a
/// `Mixed` node only occur transiently during subdivision.
#[derive(Debug, Clone, PartialEq)]
pub struct OctreeNode {
    /// Region of space this node covers.
    pub bounds: Aabb3,
    /// Classification of the region.
    pub class: Classification,
    /// Octant children, populated only when `class` is `Mixed`.
    pub children: [Option<Box<OctreeNode>>; 8],
}

/// Triangle order for the 12 triangles of a leaf cube, indexing the
/// corner layout emitted by [`OctreeNode::populate_mesh`].
const CUBE_INDICES: [u32; 36] = [
    0, 1, 2, 0, 2, 3, // bottom
    4, 5, 6, 4, 6, 7, // top
    0, 1, 5, 0, 5, 4, // front
    2, 3, 7, 2, 7, 6, // back
    0, 3, 7, 0, 7, 4, // left
    1, 2, 6, 1, 6, 5, // right
];

impl OctreeNode {
    /// Create an empty leaf covering `bounds`.
    pub fn new(bounds: Aabb3) -> Self {
        Self {
            bounds,
            class: Classification::Empty,
            children: std::array::from_fn(|_| None),
        }
    }

    /// Create a leaf with an explicit classification.
    pub fn leaf(bounds: Aabb3, class: Classification) -> Self {
        Self {
            bounds,
            class,
            ..Self::new(bounds)
        }
    }

    /// True if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(|c| c.is_none())
    }

    /// Allocate the 8 octant children of this node.
    ///
    /// Does not touch `class`; callers set it to `Mixed` themselves.
    pub fn subdivide(&mut self) {
        for (i, slot) in self.children.iter_mut().enumerate() {
            *slot = Some(Box::new(OctreeNode::new(self.bounds.octant(i))));
        }
    }

    /// Drop all children, turning this node back into a leaf.
    pub fn clear_children(&mut self) {
        for slot in &mut self.children {
            *slot = None;
        }
    }

    /// Collect references to every `Solid` leaf in prefix order.
    pub fn solid_leaves(&self) -> Vec<&OctreeNode> {
        let mut out = Vec::new();
        self.collect_solid_leaves(&mut out);
        out
    }

    fn collect_solid_leaves<'a>(&'a self, out: &mut Vec<&'a OctreeNode>) {
        match self.class {
            Classification::Empty => {}
            Classification::Solid => out.push(self),
            Classification::Mixed => {
                for child in self.children.iter().flatten() {
                    child.collect_solid_leaves(out);
                }
            }
        }
    }

    /// Append one cube per `Solid` leaf to flat render buffers.
    ///
    /// Each leaf contributes 8 vertices of 6 floats — position, then a
    /// color equal to the corner's relative position inside the leaf box —
    /// and 12 triangles. `next_index` is the running vertex counter the
    /// caller threads through so that successive calls (or successive
    /// leaves) never alias each other's vertices.
    pub fn populate_mesh(
        &self,
        vertices: &mut Vec<f32>,
        indices: &mut Vec<u32>,
        next_index: &mut u32,
    ) {
        match self.class {
            Classification::Empty => {}
            Classification::Solid => {
                let (lo, hi) = (self.bounds.min, self.bounds.max);
                let corners = [
                    [lo.x, lo.y, lo.z],
                    [hi.x, lo.y, lo.z],
                    [hi.x, hi.y, lo.z],
                    [lo.x, hi.y, lo.z],
                    [lo.x, lo.y, hi.z],
                    [hi.x, lo.y, hi.z],
                    [hi.x, hi.y, hi.z],
                    [lo.x, hi.y, hi.z],
                ];
                let extent = self.bounds.extent();
                for c in corners {
                    vertices.extend([c[0] as f32, c[1] as f32, c[2] as f32]);
                    // Relative position doubles as a per-corner color.
                    vertices.extend([
                        ((c[0] - lo.x) / extent.x) as f32,
                        ((c[1] - lo.y) / extent.y) as f32,
                        ((c[2] - lo.z) / extent.z) as f32,
                    ]);
                }
                indices.extend(CUBE_INDICES.iter().map(|&i| *next_index + i));
                *next_index += 8;
            }
            Classification::Mixed => {
                for child in self.children.iter().flatten() {
                    child.populate_mesh(vertices, indices, next_index);
                }
            }
        }
    }

    /// Convenience wrapper around [`populate_mesh`](Self::populate_mesh)
    /// producing a fresh mesh.
    pub fn to_mesh(&self) -> RenderMesh {
        let mut mesh = RenderMesh::default();
        let mut next_index = 0;
        self.populate_mesh(&mut mesh.vertices, &mut mesh.indices, &mut next_index);
        mesh
    }
}

/// Flat render mesh derived from an octree's solid leaves.
#[derive(Debug, Clone, Default)]
pub struct RenderMesh {
    /// Interleaved vertex data: `[x, y, z, r, g, b, ...]` (f32).
    pub vertices: Vec<f32>,
    /// Flat triangle indices: `[i0, i1, i2, ...]` (u32).
    pub indices: Vec<u32>,
}

impl RenderMesh {
    /// Number of vertices (6 floats each).
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 6
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use octcad_kernel_math::Point3;

    fn unit_box() -> Aabb3 {
        Aabb3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_subdivide_populates_all_octants() {
        let mut node = OctreeNode::new(unit_box());
        node.subdivide();
        assert!(node.children.iter().all(|c| c.is_some()));
        let child0 = node.children[0].as_ref().unwrap();
        assert_eq!(child0.bounds.max, Point3::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_solid_leaf_mesh_shape() {
        let node = OctreeNode::leaf(unit_box(), Classification::Solid);
        let mesh = node.to_mesh();
        assert_eq!(mesh.num_vertices(), 8);
        assert_eq!(mesh.num_triangles(), 12);
        // Min-corner color is black, max-corner color is white.
        assert_eq!(&mesh.vertices[3..6], &[0.0, 0.0, 0.0]);
        assert_eq!(&mesh.vertices[6 * 6 + 3..6 * 6 + 6], &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_empty_tree_mesh_is_empty() {
        let node = OctreeNode::new(unit_box());
        let mesh = node.to_mesh();
        assert_eq!(mesh.num_vertices(), 0);
        assert_eq!(mesh.num_triangles(), 0);
    }

    #[test]
    fn test_index_counter_threads_across_leaves() {
        let mut parent = OctreeNode::new(unit_box());
        parent.class = Classification::Mixed;
        parent.subdivide();
        for child in parent.children.iter_mut().flatten() {
            child.class = Classification::Solid;
        }
        let mesh = parent.to_mesh();
        assert_eq!(mesh.num_vertices(), 64);
        assert_eq!(mesh.num_triangles(), 96);
        // Indices of the last cube must reference the last 8 vertices.
        let max = *mesh.indices.iter().max().unwrap();
        assert_eq!(max, 63);
    }

    #[test]
    fn test_solid_leaves_walk() {
        let mut parent = OctreeNode::new(unit_box());
        parent.class = Classification::Mixed;
        parent.subdivide();
        for (i, child) in parent.children.iter_mut().flatten().enumerate() {
            child.class = if i % 2 == 0 {
                Classification::Solid
            } else {
                Classification::Empty
            };
        }
        assert_eq!(parent.solid_leaves().len(), 4);
    }
}
