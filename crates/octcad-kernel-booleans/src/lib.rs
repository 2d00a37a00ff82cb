#![warn(missing_docs)]

//! Boolean combination of two octree solids.
//!
//! [`combine`] merges two trees sharing the same outer bounds into a
//! fresh tree, inducing subdivision on demand — the inputs need not have
//! identical structure. The combinator emits the result's linear code as
//! it recurses but never collapses all-solid octants; callers wanting a
//! collapsed result re-run the code through decode and a rebuild pass.
//!
//! The two-leaf truth table carries a deliberate oddity: intersection
//! marks a region solid whenever both leaves agree, so two empty leaves
//! combine to solid. See the crate tests for the named behavior.

use thiserror::Error;

use octcad_kernel_octree::{Classification, OctreeNode};

/// Boolean operation over two octree solids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    /// Union: solid where either input is solid.
    Union,
    /// Intersection: solid where both leaves agree (including both
    /// empty — the documented truth-table oddity).
    Intersection,
    /// Difference: declared but without defined semantics; always
    /// rejected.
    Difference,
}

/// Errors from the boolean combinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BooleanError {
    /// The requested operation has no defined leaf rule.
    #[error("boolean operation {0:?} has no defined semantics")]
    UnsupportedOperation(BoolOp),
}

/// Combine two trees under `op`, producing the merged tree and its code.
///
/// Both trees are expected to share the same outer bounds; the result
/// takes its bounds from `a`.
pub fn combine(
    a: &OctreeNode,
    b: &OctreeNode,
    op: BoolOp,
) -> Result<(OctreeNode, String), BooleanError> {
    if op == BoolOp::Difference {
        return Err(BooleanError::UnsupportedOperation(op));
    }
    let mut dest = OctreeNode::new(a.bounds);
    let mut code = String::new();
    combine_into(Some(a), Some(b), &mut dest, op, &mut code);
    Ok((dest, code))
}

/// Merge one pair of corresponding regions into `dest`.
///
/// `None` marks a side synthesized from missing substructure: the pairing
/// walked past an edge of an asymmetric input tree. Union keeps whatever
/// the present side holds; intersection has nothing to match against and
/// degenerates to empty.
fn combine_into(
    a: Option<&OctreeNode>,
    b: Option<&OctreeNode>,
    dest: &mut OctreeNode,
    op: BoolOp,
    code: &mut String,
) {
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        (Some(present), None) | (None, Some(present)) => {
            match op {
                BoolOp::Union => copy_into(present, dest, code),
                _ => empty_leaf(dest, code),
            }
            return;
        }
        (None, None) => {
            empty_leaf(dest, code);
            return;
        }
    };

    match (a.class, b.class) {
        (Classification::Mixed, Classification::Mixed) => {
            recurse_children(a, b, dest, op, code);
        }
        (Classification::Mixed, leaf) => leaf_vs_mixed(leaf, a, dest, op, code),
        (leaf, Classification::Mixed) => leaf_vs_mixed(leaf, b, dest, op, code),
        (la, lb) => leaf_pair(la, lb, dest, op, code),
    }
}

/// Two-leaf truth table (`Empty` ≈ false, `Solid` ≈ true).
///
/// Union is the textbook OR. Intersection marks the region solid iff
/// the classifications are equal, which makes empty ∩ empty come out
/// solid.
fn leaf_pair(
    a: Classification,
    b: Classification,
    dest: &mut OctreeNode,
    op: BoolOp,
    code: &mut String,
) {
    let solid = match op {
        BoolOp::Union => a == Classification::Solid || b == Classification::Solid,
        BoolOp::Intersection => a == b,
        BoolOp::Difference => unreachable!("rejected before recursion"),
    };
    if solid {
        dest.class = Classification::Solid;
        code.push('B');
    } else {
        empty_leaf(dest, code);
    }
}

/// One side is a leaf, the other subdivided. The leaf behaves as 8
/// identical copies of itself without materializing them:
/// - solid ∪ anything = solid, so the union with a solid leaf terminates;
/// - empty ∪ X = X, so the union with an empty leaf copies the other side;
/// - solid ∩ X = X pointwise under the truth table, so the intersection
///   with a solid leaf copies the other side;
/// - empty ∩ X terminates empty.
fn leaf_vs_mixed(
    leaf: Classification,
    mixed: &OctreeNode,
    dest: &mut OctreeNode,
    op: BoolOp,
    code: &mut String,
) {
    match (op, leaf) {
        (BoolOp::Union, Classification::Solid) => {
            dest.class = Classification::Solid;
            code.push('B');
        }
        (BoolOp::Union, _) | (BoolOp::Intersection, Classification::Solid) => {
            copy_into(mixed, dest, code);
        }
        (BoolOp::Intersection, _) => empty_leaf(dest, code),
        (BoolOp::Difference, _) => unreachable!("rejected before recursion"),
    }
}

fn recurse_children(
    a: &OctreeNode,
    b: &OctreeNode,
    dest: &mut OctreeNode,
    op: BoolOp,
    code: &mut String,
) {
    dest.class = Classification::Mixed;
    dest.subdivide();
    code.push('(');
    for i in 0..8 {
        let child_a = a.children[i].as_deref();
        let child_b = b.children[i].as_deref();
        if let Some(child_dest) = dest.children[i].as_deref_mut() {
            combine_into(child_a, child_b, child_dest, op, code);
        }
    }
    code.push(')');
}

/// Copy `src`'s subtree verbatim into `dest`, emitting its code.
fn copy_into(src: &OctreeNode, dest: &mut OctreeNode, code: &mut String) {
    dest.class = src.class;
    match src.class {
        Classification::Solid => code.push('B'),
        Classification::Empty => code.push('W'),
        Classification::Mixed => {
            dest.subdivide();
            code.push('(');
            for i in 0..8 {
                if let Some(child_dest) = dest.children[i].as_deref_mut() {
                    match src.children[i].as_deref() {
                        Some(child_src) => copy_into(child_src, child_dest, code),
                        None => empty_leaf(child_dest, code),
                    }
                }
            }
            code.push(')');
        }
    }
}

fn empty_leaf(dest: &mut OctreeNode, code: &mut String) {
    dest.class = Classification::Empty;
    code.push('W');
}
