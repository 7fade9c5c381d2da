//! Mesh simplification to a vertex budget.
//!
//! Reconstructed surfaces routinely carry tens of thousands of vertices,
//! far more than a viewer or the resection simulator needs. This crate
//! reduces a mesh to at most a target vertex count by sampling vertices at a
//! uniform index stride.
//!
//! # Features
//!
//! - **Bounded output**: the result never has more vertices than the target
//! - **Valid faces**: a face survives only if all three of its vertices do;
//!   faces touching a dropped vertex are discarded, never partially remapped
//! - **Attribute preserving**: labels and colours travel with their vertices
//!
//! The method is lossy and does not preserve topology. It is meant for
//! approximate visualization and simulation, not exact geometry.
//!
//! # Example
//!
//! ```
//! use mesh_types::{IndexedMesh, Vertex, MeshTopology};
//! use mesh_decimate::{decimate_mesh, DecimateParams};
//!
//! let mut mesh = IndexedMesh::new();
//! for i in 0..10 {
//!     mesh.vertices.push(Vertex::from_coords(f64::from(i), 0.0, 0.0));
//! }
//! mesh.faces.push([0, 2, 4]);
//! mesh.faces.push([0, 1, 2]);
//!
//! let result = decimate_mesh(&mesh, &DecimateParams::with_target_vertices(5)).unwrap();
//! assert_eq!(result.mesh.vertex_count(), 5);
//! assert_eq!(result.mesh.faces, vec![[0, 1, 2]]);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod decimate;
mod error;
mod params;
mod result;

pub use decimate::{decimate_mesh, stride_sample};
pub use error::{DecimateError, DecimateResult};
pub use params::DecimateParams;
pub use result::DecimationResult;
