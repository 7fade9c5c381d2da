//! NIfTI-1 volumes (`.nii`, `.nii.gz`).
//!
//! NIfTI stores `x` fastest, so `(x, y, z)` maps onto `(cols, rows, depth)`
//! without reordering. Only the first volume of a 4D series is read.

use std::path::{Path, PathBuf};

use nifti::{NiftiObject, RandomAccessNiftiVolume, ReaderOptions};
use tracing::info;
use volume_types::{ScalarVolume, Shape, Vector3};

use crate::error::{VolumeIoError, VolumeIoResult};
use crate::slice::DEFAULT_SPACING_MM;

pub(crate) fn is_nifti(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_ascii_lowercase)
        .is_some_and(|n| n.ends_with(".nii") || n.ends_with(".nii.gz"))
}

/// Load a NIfTI volume with its scale slope and intercept applied.
///
/// Voxel spacing comes from the header's `pixdim`; missing or non-positive
/// entries fall back to [`DEFAULT_SPACING_MM`].
///
/// # Errors
///
/// - [`VolumeIoError::Nifti`] if the file cannot be read or decoded.
/// - [`VolumeIoError::EmptyInput`] if the volume has no voxels.
pub fn load_nifti<P: AsRef<Path>>(path: P) -> VolumeIoResult<ScalarVolume> {
    let path = path.as_ref();
    let nifti_err = |message: String| VolumeIoError::Nifti {
        path: path.to_path_buf(),
        message,
    };

    let obj = ReaderOptions::new()
        .read_file(path)
        .map_err(|e| nifti_err(e.to_string()))?;
    let header = obj.header();
    let ndim = usize::from(header.dim[0]);
    if !(2..=7).contains(&ndim) {
        return Err(nifti_err(format!("unsupported dimensionality {ndim}")));
    }

    let extent = |axis: usize| if axis <= ndim { header.dim[axis] } else { 1 };
    let (nx, ny, nz) = (extent(1), extent(2), extent(3));
    let shape = Shape::new(usize::from(nz), usize::from(ny), usize::from(nx));
    if shape.is_empty() {
        return Err(VolumeIoError::empty(format!("NIfTI volume {shape} has no voxels")));
    }

    let spacing_of = |axis: usize| {
        let v = f64::from(header.pixdim[axis]);
        if axis <= ndim && v.is_finite() && v > 0.0 {
            v
        } else {
            DEFAULT_SPACING_MM
        }
    };
    let spacing = Vector3::new(spacing_of(3), spacing_of(2), spacing_of(1));

    let volume = obj.volume();
    let mut coords = vec![0_u16; ndim];
    let mut values = Vec::with_capacity(shape.len());
    for z in 0..nz {
        if ndim >= 3 {
            coords[2] = z;
        }
        for y in 0..ny {
            coords[1] = y;
            for x in 0..nx {
                coords[0] = x;
                values.push(volume.get_f32(&coords).map_err(|e| nifti_err(e.to_string()))?);
            }
        }
    }

    let volume = ScalarVolume::new(shape, values, spacing)?;
    info!(
        path = %path.display(),
        shape = %volume.shape(),
        spacing = ?spacing.as_slice(),
        "Loaded NIfTI volume"
    );
    Ok(volume)
}

/// The first NIfTI file in `dir`, by file name.
pub(crate) fn first_volume(dir: &Path) -> Option<PathBuf> {
    let mut volumes: Vec<PathBuf> = std::fs::read_dir(dir)
        .ok()?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && is_nifti(p))
        .collect();
    volumes.sort();
    volumes.into_iter().next()
}
