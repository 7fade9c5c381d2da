//! Surgical planning pipeline: from an imaging study to a labelled brain
//! mesh, and from that mesh to a simulated post-resection deformation.
//!
//! # Stages
//!
//! | Stage | Crate |
//! |-------|-------|
//! | Load slices or extrude an image | `volume-io` |
//! | Tissue mask by intensity band | `volume-segment` |
//! | Surface extraction | `volume-surface` |
//! | Vertex budget | `mesh-decimate` |
//! | Tissue labels and colours | `tissue-label` |
//! | Collapse after resection | `sim-resection` |
//!
//! [`segment_case`] never fails. Missing input, unreadable studies and
//! masks without a surface all fall back to a synthetic phantom, and the
//! returned [`MeshSource`] says which path was taken.
//!
//! Region export ([`export_region_meshes`]) writes one STL per labelled
//! region and can run in the background through a [`JobRegistry`].
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use neurosim::{segment_case, PipelineParams, SegmentationOutput};
//!
//! let params = PipelineParams::default().with_phantom_seed(1);
//! let reconstruction = segment_case(Path::new("/no/such/case"), &params);
//! assert!(reconstruction.source.is_fallback());
//!
//! let output = SegmentationOutput::from(&reconstruction);
//! assert_eq!(output.source, "fallback");
//! assert_eq!(output.mesh_data.vertices.len(), 900);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

pub mod dto;
mod error;
mod export;
mod jobs;
mod params;
mod pipeline;

pub use dto::{label_names, MeshData, SegmentationOutput, SimulationOutput};
pub use error::{PipelineError, PipelineResult};
pub use export::{export_region_meshes, list_artifacts, ArtifactInfo, RegionArtifact, RegionExport};
pub use jobs::{ExportRequest, JobRegistry, JobStatus};
pub use params::PipelineParams;
pub use pipeline::{
    fallback, reconstruct_case, reconstruct_volume, segment_case, simulate_case, MeshSource,
    Reconstruction,
};

// Re-exported so callers can configure stages without naming every crate.
pub use mesh_types::IndexedMesh;
pub use sim_resection::{DeformationResult, SimulationMetrics, SimulationParams};
pub use tissue_label::TissueClass;
pub use volume_segment::{RegionSource, SegmentationBackend};
