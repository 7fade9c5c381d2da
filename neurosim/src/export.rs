//! Per-region surface export.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use hashbrown::HashSet;
use mesh_io::save_stl;
use mesh_types::MeshTopology;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use volume_segment::{segment_regions, RegionSource, SegmentationBackend};
use volume_surface::{extract_mask_surface, SurfaceError, SurfaceParams};
use volume_types::ScalarVolume;

use crate::error::PipelineResult;
use crate::params::PipelineParams;

/// One exported region surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionArtifact {
    /// STL file name inside the output directory.
    pub file_name: String,
    /// Region name.
    pub name: String,
    /// Region label.
    pub label: u16,
    /// Voxels in the region.
    pub voxels: usize,
}

/// Outcome of a region export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionExport {
    /// Written surfaces in ascending label order.
    pub artifacts: Vec<RegionArtifact>,
    /// Who labelled the regions.
    pub source: RegionSource,
    /// Why the backend was bypassed, if it was.
    pub fallback_reason: Option<String>,
}

/// An STL file found in an artifact directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactInfo {
    /// File name.
    pub file_name: String,
    /// Display name: the file stem with any `_<label>` suffix removed and
    /// underscores shown as spaces.
    pub name: String,
    /// Label parsed from a `_<label>` suffix, else 0.
    pub label: u16,
}

impl ArtifactInfo {
    fn from_file_name(file_name: &str) -> Self {
        let stem = file_name.strip_suffix(".stl").unwrap_or(file_name);
        let (base, label) = match stem.rsplit_once('_') {
            Some((base, suffix)) if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) => {
                (base, suffix.parse().unwrap_or(0))
            }
            _ => (stem, 0),
        };
        Self {
            file_name: file_name.to_string(),
            name: base.replace('_', " "),
            label,
        }
    }
}

fn file_safe(name: &str) -> String {
    name.replace([' ', '/', '\\'], "_")
}

/// Label `volume` into regions and write one binary STL per region into
/// `out_dir`.
///
/// Regions come from `backend` when given, otherwise (or when it fails)
/// from intensity thresholding. Regions smaller than
/// `params.min_region_voxels` and regions without a surface are skipped.
/// Surfaces keep physical coordinates. Files are named after the region;
/// a region whose name is already taken gets a `_<label>` suffix.
///
/// # Errors
///
/// Returns an error if `out_dir` cannot be created or a file cannot be
/// written.
pub fn export_region_meshes(
    volume: &ScalarVolume,
    out_dir: &Path,
    backend: Option<&Arc<dyn SegmentationBackend>>,
    params: &PipelineParams,
) -> PipelineResult<RegionExport> {
    fs::create_dir_all(out_dir)?;

    let segmentation = segment_regions(backend, volume, params.backend_timeout());
    let spacing = segmentation.regions.spacing();
    let surface_params = SurfaceParams {
        iso_level: params.surface.iso_level,
        ..SurfaceParams::physical()
    };

    let mut artifacts = Vec::new();
    let mut taken = HashSet::new();
    for region in segmentation.regions.region_masks(params.min_region_voxels) {
        let mesh = match extract_mask_surface(&region.mask, spacing, &surface_params) {
            Ok(mesh) => mesh,
            Err(SurfaceError::DegenerateExtraction { .. }) => {
                debug!(label = region.label, "Region has no surface");
                continue;
            }
            Err(err) => {
                warn!(label = region.label, error = %err, "Skipping region");
                continue;
            }
        };

        let stem = file_safe(&region.name);
        let mut file_name = format!("{stem}.stl");
        if !taken.insert(file_name.clone()) {
            file_name = format!("{stem}_{}.stl", region.label);
            taken.insert(file_name.clone());
        }
        save_stl(&mesh, out_dir.join(&file_name), true)?;
        debug!(
            file = %file_name,
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            "Wrote region surface"
        );

        artifacts.push(RegionArtifact {
            file_name,
            name: region.name,
            label: region.label,
            voxels: region.voxels,
        });
    }

    info!(
        out_dir = %out_dir.display(),
        regions = artifacts.len(),
        source = ?segmentation.source,
        "Region export complete"
    );

    Ok(RegionExport {
        artifacts,
        source: segmentation.source,
        fallback_reason: segmentation.fallback_reason,
    })
}

/// STL files in `dir`, sorted by file name. A missing directory lists
/// nothing.
///
/// # Errors
///
/// Returns an error if an existing directory cannot be read.
pub fn list_artifacts(dir: &Path) -> PipelineResult<Vec<ArtifactInfo>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files: Vec<ArtifactInfo> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| {
            Path::new(name)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("stl"))
        })
        .map(|name| ArtifactInfo::from_file_name(&name))
        .collect();
    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(files)
}
