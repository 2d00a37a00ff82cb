//! Minimal OBJ-subset ingestion: `v` and `f` lines become a triangle
//! soup; every other line is ignored. Materials, normals, and texture
//! coordinates are out of scope.

use std::io::BufRead;

use anyhow::{bail, Context, Result};
use octcad_kernel_math::Point3;
use octcad_kernel_primitives::TriangleSoup;

/// Parse OBJ text into a triangle soup.
///
/// Face indices may carry `/texture/normal` suffixes (dropped) and may be
/// negative (relative to the vertices seen so far, per the OBJ spec).
pub fn parse_obj(reader: impl BufRead) -> Result<TriangleSoup> {
    let mut soup = TriangleSoup::default();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading OBJ line {}", line_no + 1))?;
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let mut coord = |axis: &str| -> Result<f64> {
                    tokens
                        .next()
                        .with_context(|| {
                            format!("line {}: vertex missing {axis} coordinate", line_no + 1)
                        })?
                        .parse::<f64>()
                        .with_context(|| format!("line {}: bad {axis} coordinate", line_no + 1))
                };
                let x = coord("x")?;
                let y = coord("y")?;
                let z = coord("z")?;
                soup.vertices.push(Point3::new(x, y, z));
            }
            Some("f") => {
                let mut face = Vec::new();
                for token in tokens {
                    let index_str = token.split('/').next().unwrap_or(token);
                    let raw: i64 = index_str
                        .parse()
                        .with_context(|| format!("line {}: bad face index {token:?}", line_no + 1))?;
                    let index = if raw < 0 {
                        soup.vertices.len() as i64 + raw
                    } else {
                        raw - 1
                    };
                    if index < 0 || index as usize >= soup.vertices.len() {
                        bail!(
                            "line {}: face index {raw} out of range (have {} vertices)",
                            line_no + 1,
                            soup.vertices.len()
                        );
                    }
                    face.push(index as usize);
                }
                if face.len() < 3 {
                    bail!("line {}: face with fewer than 3 vertices", line_no + 1);
                }
                soup.faces.push(face);
            }
            _ => {}
        }
    }

    Ok(soup)
}
