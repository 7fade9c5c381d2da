//! Case reconstruction and simulation.
//!
//! ```text
//! case dir ─► load ─► segment ─► extract ─► decimate ─► label ─► mesh
//!                │         │          │
//!                └─────────┴──────────┴─► phantom (on any recoverable error)
//! ```

use std::path::Path;

use mesh_decimate::decimate_mesh;
use mesh_types::{IndexedMesh, MeshTopology, Point3};
use sim_resection::{simulate, DeformationResult, SimulationParams};
use tissue_label::{apply_labels, label, phantom, TissueClass};
use tracing::{info, warn};
use volume_io::{discover_case, load_case, SliceOrdering};
use volume_segment::segment;
use volume_surface::extract_surface;
use volume_types::ScalarVolume;

use crate::error::{PipelineError, PipelineResult};
use crate::params::PipelineParams;

/// Where a reconstruction's mesh came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshSource {
    /// Extracted from the case's imaging data.
    Reconstructed {
        /// How the slices were ordered.
        ordering: SliceOrdering,
    },
    /// The phantom mesh, with the reason reconstruction was abandoned.
    Fallback(String),
}

impl MeshSource {
    /// `"reconstructed"` or `"fallback"`.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Reconstructed { .. } => "reconstructed",
            Self::Fallback(_) => "fallback",
        }
    }

    /// Why the phantom was used, if it was.
    #[must_use]
    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            Self::Reconstructed { .. } => None,
            Self::Fallback(reason) => Some(reason),
        }
    }

    /// Whether this is the phantom.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// A labelled display mesh.
#[derive(Debug, Clone)]
pub struct Reconstruction {
    /// Mesh with a label and colour on every vertex.
    pub mesh: IndexedMesh,
    /// The labels, in vertex order.
    pub labels: Vec<TissueClass>,
    /// Provenance.
    pub source: MeshSource,
}

impl Reconstruction {
    /// Vertex count per tissue class, in label order.
    #[must_use]
    pub fn class_counts(&self) -> [usize; 4] {
        let mut counts = [0; 4];
        for class in &self.labels {
            counts[usize::from(class.label())] += 1;
        }
        counts
    }
}

/// Reconstruct the labelled surface of `volume`.
///
/// Segments the volume, extracts and decimates the tissue surface, then
/// labels each remaining vertex against the normalized intensity field the
/// surface was extracted from.
///
/// # Errors
///
/// - [`PipelineError::Surface`] when the tissue mask has no surface.
/// - [`PipelineError::Decimate`] for a zero vertex budget.
pub fn reconstruct_volume(
    volume: &ScalarVolume,
    params: &PipelineParams,
) -> PipelineResult<(IndexedMesh, Vec<TissueClass>)> {
    let segmentation = segment(volume, &params.classifier);
    let surface = extract_surface(&segmentation.normalized, &segmentation.mask, &params.surface)?;
    let mut mesh = decimate_mesh(&surface.mesh, &params.decimate)?.mesh;

    let positions: Vec<Point3<f64>> = mesh.positions().copied().collect();
    let labels = label(&positions, &surface.field);
    apply_labels(&mut mesh, &labels)?;
    Ok((mesh, labels))
}

/// Load and reconstruct the study in `case_dir`.
///
/// # Errors
///
/// - [`PipelineError::InputAbsent`] when the directory is missing or holds
///   no NIfTI volume, DICOM slice or raster image.
/// - [`PipelineError::Load`] when no slice could be read.
/// - Any error of [`reconstruct_volume`].
pub fn reconstruct_case(case_dir: &Path, params: &PipelineParams) -> PipelineResult<Reconstruction> {
    let input = discover_case(case_dir).ok_or_else(|| PipelineError::InputAbsent {
        path: case_dir.to_path_buf(),
    })?;
    let loaded = load_case(&input)?;
    let (mesh, labels) = reconstruct_volume(&loaded.volume, params)?;
    Ok(Reconstruction {
        mesh,
        labels,
        source: MeshSource::Reconstructed {
            ordering: loaded.ordering,
        },
    })
}

/// Reconstruct `case_dir`, substituting the phantom on any failure.
///
/// Never fails: if the phantom itself cannot be built from
/// `params.phantom`, the default phantom is used.
#[must_use]
pub fn segment_case(case_dir: &Path, params: &PipelineParams) -> Reconstruction {
    match reconstruct_case(case_dir, params) {
        Ok(reconstruction) => {
            info!(
                case = %case_dir.display(),
                vertices = reconstruction.mesh.vertex_count(),
                faces = reconstruction.mesh.face_count(),
                "Case reconstructed"
            );
            reconstruction
        }
        Err(err) => {
            warn!(
                case = %case_dir.display(),
                error = %err,
                recoverable = err.is_recoverable(),
                "Using phantom mesh"
            );
            fallback(err.to_string(), params)
        }
    }
}

/// The phantom as a reconstruction, tagged with `reason`.
#[must_use]
pub fn fallback(reason: String, params: &PipelineParams) -> Reconstruction {
    let mesh = phantom_mesh(params);
    let labels = mesh
        .vertices
        .iter()
        .map(|v| {
            v.label()
                .and_then(|l| TissueClass::try_from(l).ok())
                .unwrap_or(TissueClass::GreyMatter)
        })
        .collect();
    Reconstruction {
        mesh,
        labels,
        source: MeshSource::Fallback(reason),
    }
}

fn phantom_mesh(params: &PipelineParams) -> IndexedMesh {
    phantom::generate(&params.phantom).unwrap_or_else(|err| {
        warn!(error = %err, "Invalid phantom parameters, using defaults");
        let defaults = phantom::PhantomParams {
            seed: params.phantom.seed,
            ..phantom::PhantomParams::default()
        };
        // Default parameters always have valid noise.
        phantom::generate(&defaults).unwrap_or_default()
    })
}

/// Segment `case_dir` and simulate removal of `remove_region`.
///
/// # Errors
///
/// - [`PipelineError::Simulation`] for an unknown region name.
pub fn simulate_case(
    case_dir: &Path,
    remove_region: &str,
    opening_size: f64,
    params: &PipelineParams,
) -> PipelineResult<DeformationResult> {
    let sim_params = SimulationParams::for_region(remove_region)?.with_opening_size(opening_size);
    let reconstruction = segment_case(case_dir, params);
    Ok(simulate(&reconstruction.mesh, &sim_params)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use volume_types::Shape;

    fn seeded() -> PipelineParams {
        PipelineParams::default().with_phantom_seed(11)
    }

    #[test]
    fn missing_case_falls_back() {
        let reconstruction = segment_case(Path::new("/nonexistent/case-0"), &seeded());
        assert!(reconstruction.source.is_fallback());
        assert_eq!(reconstruction.mesh.vertex_count(), 900);
        assert_eq!(reconstruction.mesh.face_count(), 1682);
        assert_eq!(reconstruction.labels.len(), 900);
        assert!(reconstruction
            .source
            .fallback_reason()
            .is_some_and(|r| r.contains("no imaging input")));
    }

    #[test]
    fn blank_volume_is_degenerate() {
        let volume = ScalarVolume::zeros(Shape::new(40, 40, 40));
        let err = reconstruct_volume(&volume, &seeded()).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn sphere_volume_reconstructs() {
        let shape = Shape::new(24, 24, 24);
        let volume = ScalarVolume::from_fn(shape, |d, r, c| {
            let q = |i: usize| (i as f32 - 11.5).powi(2);
            let radius = (q(d) + q(r) + q(c)).sqrt();
            // Bright shell, mid-grey interior, dark outside.
            if radius < 7.0 {
                0.5
            } else if radius < 9.0 {
                0.9
            } else {
                0.0
            }
        });
        let params = seeded().with_target_vertices(400);
        let (mesh, labels) = reconstruct_volume(&volume, &params).unwrap();
        assert!(mesh.vertex_count() <= 400);
        assert_eq!(labels.len(), mesh.vertex_count());
        assert!(mesh.has_valid_indices());
        assert_eq!(mesh.labels().map(|l| l.len()), Some(mesh.vertex_count()));
    }

    #[test]
    fn invalid_phantom_params_still_fall_back() {
        let mut params = seeded();
        params.phantom.noise_std = f64::NAN;
        let reconstruction = fallback("test".into(), &params);
        assert_eq!(reconstruction.mesh.vertex_count(), 900);
    }

    #[test]
    fn class_counts_sum_to_vertices() {
        let reconstruction = fallback("test".into(), &seeded());
        assert_eq!(reconstruction.class_counts().iter().sum::<usize>(), 900);
    }

    #[test]
    fn unknown_region_is_rejected() {
        let err = simulate_case(Path::new("/nonexistent"), "cerebellum", 5.0, &seeded()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Simulation(sim_resection::SimError::UnknownRegion(_))
        ));
    }
}
