//! Linear-code codec: tree shape to and from `{B, W, (, )}` strings.
//!
//! The grammar is prefix and self-delimiting: `B` one solid leaf, `W` one
//! empty leaf, `(` a mixed node followed by exactly 8 child codes in
//! octant order and `)`. Decoding consumes exactly one grammar unit per
//! recursive call and never reads past the end of input.

use thiserror::Error;

use crate::node::{Classification, OctreeNode};
use octcad_kernel_math::Aabb3;

/// A code string that violates the linear-code grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedCode {
    /// A character outside `{B, W, (, )}`, or a `)` where a child was
    /// expected.
    #[error("unexpected character {found:?} at offset {offset}")]
    UnexpectedChar {
        /// The offending character.
        found: char,
        /// Byte offset into the code string.
        offset: usize,
    },
    /// The code ended before the tree was complete.
    #[error("unexpected end of code after {offset} bytes")]
    UnexpectedEnd {
        /// Length of the (truncated) input.
        offset: usize,
    },
    /// A complete tree was decoded but input remained.
    #[error("trailing input after complete tree at offset {offset}")]
    TrailingInput {
        /// Byte offset of the first unconsumed character.
        offset: usize,
    },
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Cursor<'_> {
    fn next(&mut self) -> Result<u8, MalformedCode> {
        match self.bytes.get(self.pos) {
            Some(&b) => {
                self.pos += 1;
                Ok(b)
            }
            None => Err(MalformedCode::UnexpectedEnd { offset: self.pos }),
        }
    }
}

/// Decode a linear code into a tree covering `bounds`.
///
/// Child boxes are derived with the same octant convention the builder
/// uses, so `decode(encode(t), t.bounds)` reproduces `t` exactly.
pub fn decode(code: &str, bounds: Aabb3) -> Result<OctreeNode, MalformedCode> {
    let mut cursor = Cursor {
        bytes: code.as_bytes(),
        pos: 0,
    };
    let mut root = OctreeNode::new(bounds);
    decode_into(&mut root, &mut cursor)?;
    if cursor.pos != cursor.bytes.len() {
        return Err(MalformedCode::TrailingInput { offset: cursor.pos });
    }
    Ok(root)
}

fn decode_into(node: &mut OctreeNode, cursor: &mut Cursor<'_>) -> Result<(), MalformedCode> {
    match cursor.next()? {
        b'B' => node.class = Classification::Solid,
        b'W' => node.class = Classification::Empty,
        b'(' => {
            node.class = Classification::Mixed;
            node.subdivide();
            for child in node.children.iter_mut().flatten() {
                decode_into(child, cursor)?;
            }
            match cursor.next()? {
                b')' => {}
                other => {
                    return Err(MalformedCode::UnexpectedChar {
                        found: other as char,
                        offset: cursor.pos - 1,
                    })
                }
            }
        }
        other => {
            return Err(MalformedCode::UnexpectedChar {
                found: other as char,
                offset: cursor.pos - 1,
            })
        }
    }
    Ok(())
}

/// Serialize a tree back into its linear code.
pub fn encode(node: &OctreeNode) -> String {
    let mut out = String::new();
    encode_into(node, &mut out);
    out
}

fn encode_into(node: &OctreeNode, out: &mut String) {
    match node.class {
        Classification::Solid => out.push('B'),
        Classification::Empty => out.push('W'),
        Classification::Mixed => {
            out.push('(');
            for slot in &node.children {
                match slot {
                    Some(child) => encode_into(child, out),
                    // Absent slots only occur mid-subdivision; an absent
                    // region holds no material.
                    None => out.push('W'),
                }
            }
            out.push(')');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::build;
    use crate::metrics::volume;
    use octcad_kernel_math::Point3;
    use octcad_kernel_primitives::Sphere;

    fn unit_bounds() -> Aabb3 {
        Aabb3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_decode_single_solid_leaf() {
        let root = decode("B", unit_bounds()).unwrap();
        assert_eq!(root.class, Classification::Solid);
        assert!(root.is_leaf());
        assert_eq!(volume(&root).unwrap(), 1.0);
    }

    #[test]
    fn test_decode_single_empty_leaf() {
        let root = decode("W", unit_bounds()).unwrap();
        assert_eq!(root.class, Classification::Empty);
        assert_eq!(volume(&root).unwrap(), 0.0);
    }

    #[test]
    fn test_decode_one_level() {
        let root = decode("(BWBWBWBW)", unit_bounds()).unwrap();
        assert_eq!(root.class, Classification::Mixed);
        let classes: Vec<_> = root
            .children
            .iter()
            .flatten()
            .map(|c| c.class)
            .collect();
        assert_eq!(classes.len(), 8);
        assert_eq!(classes[0], Classification::Solid);
        assert_eq!(classes[1], Classification::Empty);
        assert_eq!(volume(&root).unwrap(), 0.5);
    }

    #[test]
    fn test_decode_nested() {
        let root = decode("(B(WWWWWWWB)WWWWWW)", unit_bounds()).unwrap();
        let child1 = root.children[1].as_ref().unwrap();
        assert_eq!(child1.class, Classification::Mixed);
        let grandchild = child1.children[7].as_ref().unwrap();
        assert_eq!(grandchild.class, Classification::Solid);
        // One 0.5-cube plus one 0.25-cube.
        let expected = 0.125 + 0.015625;
        assert!((volume(&root).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_decode_rejects_unknown_char() {
        let err = decode("(BWGBWBWB)", unit_bounds()).unwrap_err();
        assert_eq!(
            err,
            MalformedCode::UnexpectedChar {
                found: 'G',
                offset: 3
            }
        );
    }

    #[test]
    fn test_decode_rejects_truncated_input() {
        let err = decode("(BWBW", unit_bounds()).unwrap_err();
        assert_eq!(err, MalformedCode::UnexpectedEnd { offset: 5 });
        let err = decode("", unit_bounds()).unwrap_err();
        assert_eq!(err, MalformedCode::UnexpectedEnd { offset: 0 });
    }

    #[test]
    fn test_decode_rejects_wrong_arity() {
        // 9 children before the close paren.
        let err = decode("(BBBBBBBBB)", unit_bounds()).unwrap_err();
        assert!(matches!(err, MalformedCode::UnexpectedChar { found: 'B', .. }));
    }

    #[test]
    fn test_decode_rejects_trailing_input() {
        let err = decode("BW", unit_bounds()).unwrap_err();
        assert_eq!(err, MalformedCode::TrailingInput { offset: 1 });
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let code = "(B(WWWWWWWB)WWBWW(WBWBWBWB))";
        let root = decode(code, unit_bounds()).unwrap();
        assert_eq!(encode(&root), code);
        let again = decode(&encode(&root), unit_bounds()).unwrap();
        assert_eq!(again, root);
    }

    #[test]
    fn test_built_tree_round_trips() {
        let sphere = Sphere {
            center: Point3::new(0.0, 0.0, 0.0),
            radius: 3.0,
        };
        let bounds = Aabb3::new(Point3::new(-5.0, -5.0, -5.0), Point3::new(5.0, 5.0, 5.0));
        let (root, code) = build(&sphere, bounds, 3);
        assert_eq!(encode(&root), code);
        let decoded = decode(&code, bounds).unwrap();
        assert_eq!(decoded, root);
    }

    #[test]
    fn test_decode_octant_bounds_match_builder_convention() {
        let root = decode("(WBWWWWWW)", unit_bounds()).unwrap();
        let solid = &root.children[1].as_ref().unwrap();
        // Octant 1 is offset (1, 0, 0) in half-extent units.
        assert_eq!(solid.bounds.min, Point3::new(0.5, 0.0, 0.0));
        assert_eq!(solid.bounds.max, Point3::new(1.0, 0.5, 0.5));
    }
}
