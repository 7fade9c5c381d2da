//! Core mesh types for NeuroSim.
//!
//! This crate provides the foundational surface types shared by the
//! reconstruction pipeline and the resection simulator:
//!
//! - [`Vertex`] - A point in 3D space with optional tissue attributes
//! - [`IndexedMesh`] - A triangle mesh with indexed vertices
//! - [`VertexColor`] - Floating point RGB display colour
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Labels and Colours
//!
//! Tissue labels and display colours are stored per vertex in
//! [`VertexAttributes`]. A mesh reports a label (or colour) array only when
//! every vertex carries one, so a reported array always has exactly one
//! entry per vertex.
//!
//! # Units
//!
//! All coordinates are `f64`. Reconstructed meshes are normalized so that
//! their largest bounding-box extent is 10 units; one unit corresponds to
//! one centimetre in the simulator's metrics.
//!
//! # Example
//!
//! ```
//! use mesh_types::{Vertex, IndexedMesh, Point3, MeshTopology};
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.vertices.push(Vertex::new(Point3::new(0.0, 0.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(1.0, 0.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(0.5, 1.0, 0.0)));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert!(mesh.has_valid_indices());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod bounds;
mod mesh;
mod traits;
mod vertex;

pub use bounds::Aabb;
pub use mesh::IndexedMesh;
pub use traits::{MeshBounds, MeshTopology};
pub use vertex::{Vertex, VertexAttributes, VertexColor};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
