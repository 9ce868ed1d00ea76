//! CPU cubic surface extraction: converts a voxel volume into a blocky
//! triangle mesh with per-vertex ambient occlusion and optional greedy quad
//! merging.
#![forbid(unsafe_code)]

mod error;
mod extract;
mod face;
mod mesh;
mod quad;
mod slots;
mod vertex;

pub use error::ExtractError;
pub use extract::{extract_cubic_mesh, extract_cubic_mesh_custom, vertex_ambient_occlusion};
pub use face::Face;
pub use mesh::{Mesh, MeshIndex, MeshSink};
pub use quad::Quad;
pub use slots::MAX_VERTICES_PER_POSITION;
pub use vertex::{decode_position, decode_vertex, CubicVertex, Vertex};
