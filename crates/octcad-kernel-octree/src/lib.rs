#![warn(missing_docs)]

//! Octree approximation of 3D solids for the octcad kernel.
//!
//! A solid (parametric primitive or triangle soup) is decomposed into an
//! octree whose leaves are fully solid or fully empty. The pipeline:
//! 1. **Classification** — conservative box-vs-solid intersection tests
//! 2. **Construction** — depth-bounded subdivision with collapse of
//!    all-solid octants
//! 3. **Linear code** — prefix serialization over `{B, W, (, )}`
//! 4. **Metrics** — enclosed volume and approximate surface area
//!
//! Solid leaves also export directly to a flat vertex/index mesh for
//! rendering (see [`OctreeNode::populate_mesh`]).

mod build;
mod classify;
mod codec;
mod metrics;
mod node;

pub use build::{build, build_into};
pub use classify::ClassifySolid;
pub use codec::{decode, encode, MalformedCode};
pub use metrics::{surface_area, volume, MetricsError};
pub use node::{Classification, OctreeNode, RenderMesh};
