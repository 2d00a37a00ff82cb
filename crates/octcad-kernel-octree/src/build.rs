//! Recursive octree construction with depth-bounded subdivision.
//!
//! The builder emits the linear code as a side effect of traversal, so a
//! freshly built tree always comes with its serialization for free.

use crate::classify::ClassifySolid;
use crate::node::{Classification, OctreeNode};
use octcad_kernel_math::Aabb3;

/// Build an octree for `solid` inside `bounds`, refined at most `depth`
/// levels. Returns the root node and its linear code.
pub fn build<S: ClassifySolid + ?Sized>(
    solid: &S,
    bounds: Aabb3,
    depth: u32,
) -> (OctreeNode, String) {
    let mut root = OctreeNode::new(bounds);
    let mut code = String::new();
    build_into(solid, &mut root, depth, &mut code);
    (root, code)
}

/// Classify and refine `node` in place, appending its code fragment.
///
/// - `Empty` regions become empty leaves (`W`).
/// - `Mixed` regions at the depth limit are forced to `Solid` (`B`): any
///   cell the solid touches at maximum resolution counts as filled, an
///   over-estimate bounded by the leaf cell volume.
/// - Otherwise the node subdivides into 8 octants and recurses. If all 8
///   children come back `Solid` the node collapses: children are dropped,
///   the node becomes a `Solid` leaf, and the emitted `(BBBBBBBB)`
///   fragment is rewritten to a single `B`. Collapse applies on every
///   build path, for primitives and meshes alike.
pub fn build_into<S: ClassifySolid + ?Sized>(
    solid: &S,
    node: &mut OctreeNode,
    depth: u32,
    code: &mut String,
) {
    node.class = solid.classify(&node.bounds);
    match node.class {
        Classification::Empty => code.push('W'),
        _ if depth == 0 => {
            node.class = Classification::Solid;
            code.push('B');
        }
        _ => {
            node.subdivide();
            let fragment_start = code.len();
            code.push('(');
            let mut all_solid = true;
            for child in node.children.iter_mut().flatten() {
                build_into(solid, child, depth - 1, code);
                if child.class != Classification::Solid {
                    all_solid = false;
                }
            }
            if all_solid {
                code.truncate(fragment_start);
                code.push('B');
                node.clear_children();
                node.class = Classification::Solid;
            } else {
                code.push(')');
            }
        }
    }
}
