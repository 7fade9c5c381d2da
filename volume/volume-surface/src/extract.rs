//! Mask-to-mesh extraction.

use mesh_types::{IndexedMesh, MeshTopology};
use tracing::{debug, info};
use volume_types::{ScalarVolume, TissueMask, Vector3};

use crate::error::{SurfaceError, SurfaceResult};
use crate::params::SurfaceParams;
use crate::resample::{resample_linear, resample_nearest, resampled_shape, resampled_spacing};
use crate::surface_nets::surface_nets;

/// An extracted surface with the grids it was extracted from.
///
/// `field` and `mask` share one shape, which may be smaller than the input
/// when resampling kicked in. Vertex labelling samples `field`.
#[derive(Debug, Clone)]
pub struct Surface {
    /// Triangle mesh, wound counter-clockwise seen from outside.
    pub mesh: IndexedMesh,
    /// Intensity field on the extraction grid.
    pub field: ScalarVolume,
    /// Tissue mask on the extraction grid.
    pub mask: TissueMask,
}

/// Extract the tissue surface of `mask`.
///
/// `field` is the intensity volume the mask was derived from; it is
/// resampled alongside the mask and returned for labelling. The mesh is
/// centred and scaled to `params.canonical_size` when set.
///
/// # Errors
///
/// - [`SurfaceError::ShapeMismatch`] if `field` and `mask` differ in shape.
/// - [`SurfaceError::InvalidIsoLevel`] for a non-finite iso level.
/// - [`SurfaceError::DegenerateExtraction`] if the mask has no boundary.
pub fn extract_surface(
    field: &ScalarVolume,
    mask: &TissueMask,
    params: &SurfaceParams,
) -> SurfaceResult<Surface> {
    if field.shape() != mask.shape() {
        return Err(SurfaceError::ShapeMismatch {
            field: field.shape(),
            mask: mask.shape(),
        });
    }
    check_iso(params.iso_level)?;

    let (field, mask) = match resampled_shape(mask.shape(), params.max_dim) {
        Some(target) => {
            debug!(from = %mask.shape(), to = %target, "Resampling before extraction");
            (resample_linear(field, target)?, resample_nearest(mask, target))
        }
        None => (field.clone(), mask.clone()),
    };

    let mesh = extract(&mask, field.spacing(), params)?;
    info!(
        shape = %mask.shape(),
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "Surface extracted"
    );
    Ok(Surface { mesh, field, mask })
}

/// Extract the surface of a single mask without an intensity field.
///
/// Used for per-region export, where the mask is usually one label of a
/// region volume and `spacing` its voxel size.
///
/// # Errors
///
/// - [`SurfaceError::InvalidIsoLevel`] for a non-finite iso level.
/// - [`SurfaceError::DegenerateExtraction`] if the mask has no boundary.
/// - [`SurfaceError::Volume`] for unusable spacing.
pub fn extract_mask_surface(
    mask: &TissueMask,
    spacing: Vector3<f64>,
    params: &SurfaceParams,
) -> SurfaceResult<IndexedMesh> {
    check_iso(params.iso_level)?;
    match resampled_shape(mask.shape(), params.max_dim) {
        Some(target) => {
            let scaled = resampled_spacing(spacing, mask.shape(), target);
            extract(&resample_nearest(mask, target), scaled, params)
        }
        None => extract(mask, spacing, params),
    }
}

fn check_iso(iso_level: f32) -> SurfaceResult<()> {
    if iso_level.is_finite() {
        Ok(())
    } else {
        Err(SurfaceError::InvalidIsoLevel(iso_level))
    }
}

fn extract(
    mask: &TissueMask,
    spacing: Vector3<f64>,
    params: &SurfaceParams,
) -> SurfaceResult<IndexedMesh> {
    let mut mesh = surface_nets(&mask.to_field(spacing)?, params.iso_level);
    if mesh.vertices.is_empty() {
        return Err(SurfaceError::DegenerateExtraction {
            shape: mask.shape(),
            tissue_voxels: mask.count(),
        });
    }
    if let Some(size) = params.canonical_size {
        mesh.fit_to_extent(size);
    }
    Ok(mesh)
}
