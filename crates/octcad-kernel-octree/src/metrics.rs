//! Scalar measures over a tree: enclosed volume and approximate surface
//! area of the solid leaves.

use std::collections::HashSet;

use thiserror::Error;

use crate::node::{Classification, OctreeNode};
use octcad_kernel_math::{Point3, Vec3};

/// Errors from metric computation over a malformed tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    /// A leaf's bounds are inverted (max < min on some axis).
    #[error("leaf bounds are inverted: min {min:?}, max {max:?}")]
    InvalidBounds {
        /// The leaf's min corner.
        min: Point3,
        /// The leaf's max corner.
        max: Point3,
    },
}

/// Total volume of the solid leaves.
///
/// `Empty` contributes 0, `Solid` the product of its side lengths, and
/// `Mixed` the sum over its children. A solid leaf with inverted bounds
/// is a malformed-tree condition and yields [`MetricsError::InvalidBounds`]
/// rather than a plausible-looking number.
pub fn volume(node: &OctreeNode) -> Result<f64, MetricsError> {
    match node.class {
        Classification::Empty => Ok(0.0),
        Classification::Solid => {
            if node.bounds.is_inverted() {
                return Err(MetricsError::InvalidBounds {
                    min: node.bounds.min,
                    max: node.bounds.max,
                });
            }
            let e = node.bounds.extent();
            Ok(e.x * e.y * e.z)
        }
        Classification::Mixed => node.children.iter().flatten().map(|c| volume(c)).sum(),
    }
}

/// Quantization scale for position keys: positions agreeing to 1e-6 of a
/// unit land on the same key.
const QUANT: f64 = 1e6;

fn position_key(p: &Point3, size: f64) -> (i64, i64, i64, i64) {
    (
        (p.x * QUANT).round() as i64,
        (p.y * QUANT).round() as i64,
        (p.z * QUANT).round() as i64,
        (size * QUANT).round() as i64,
    )
}

/// Approximate surface area of the solid region.
///
/// Each solid leaf exposes up to 6 faces; a face is interior (and skipped)
/// exactly when a solid leaf of identical size sits at the abutting
/// position. Neighbor lookup is O(1) against a set keyed by quantized min
/// corner and size. Assumes cubic leaves, which subdivision of a cubic
/// root guarantees; for a non-cubic root the x side length stands in for
/// all three.
pub fn surface_area(node: &OctreeNode) -> f64 {
    let leaves = node.solid_leaves();
    let index: HashSet<_> = leaves
        .iter()
        .map(|leaf| position_key(&leaf.bounds.min, leaf.bounds.extent().x))
        .collect();

    let directions = [
        Vec3::x(),
        -Vec3::x(),
        Vec3::y(),
        -Vec3::y(),
        Vec3::z(),
        -Vec3::z(),
    ];

    let mut total = 0.0;
    for leaf in &leaves {
        let size = leaf.bounds.extent().x;
        let face_area = size * size;
        for dir in &directions {
            let neighbor_min = leaf.bounds.min + dir * size;
            if !index.contains(&position_key(&neighbor_min, size)) {
                total += face_area;
            }
        }
    }
    total
}
