//! Synthetic post-resection deformation.
//!
//! When a tissue region is removed, the surrounding tissue relaxes into the
//! cavity. This crate models that with a closed-form radial field rather
//! than a finite-element solve:
//!
//! ```text
//! c     = centroid of the removed region (or a fallback point)
//! d_i   = |p_i - c|
//! m_i   = m_max · exp(-d_i / λ)          (0 for skull)
//! p_i' = p_i + m_i · (c - p_i) / d_i
//! σ_i   = k · m_i                        (pseudo-stress, kPa)
//! ```
//!
//! The model is a visual approximation for planning discussions. It is not
//! a biomechanical solver and its numbers are not clinical measurements.
//!
//! # Example
//!
//! ```
//! use mesh_types::{IndexedMesh, Point3, Vertex};
//! use sim_resection::{simulate, SimulationParams};
//! use tissue_label::TissueClass;
//!
//! let mut mesh = IndexedMesh::new();
//! for (p, class) in [([0.0, 0.0, 0.0], TissueClass::Tumor), ([3.0, 0.0, 0.0], TissueClass::GreyMatter)] {
//!     mesh.vertices.push(Vertex::labeled(Point3::from(p), class.label(), class.color()));
//! }
//!
//! let result = simulate(&mesh, &SimulationParams::default()).unwrap();
//! assert!(result.mesh.vertices[1].position.x < 3.0);
//! assert_eq!(result.stress.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod metrics;
mod params;
mod simulate;

pub use error::{SimError, SimResult};
pub use metrics::{metrics_from_fields, SimulationMetrics};
pub use params::SimulationParams;
pub use simulate::{region_centroid, simulate, DeformationResult};
