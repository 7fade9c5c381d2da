//! Case directories.

use std::path::{Path, PathBuf};

use tracing::debug;
use volume_types::ScalarVolume;

use crate::dicom_stack::{dicom_files, load_slice_stack};
use crate::error::VolumeIoResult;
use crate::nifti_volume::{first_volume, load_nifti};
use crate::raster::{first_image, load_single_image};
use crate::slice::SliceOrdering;

/// Imaging input found in a case directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseInput {
    /// A NIfTI volume.
    Volume(PathBuf),
    /// DICOM slices, sorted by file name.
    SliceStack(Vec<PathBuf>),
    /// A single raster image to extrude.
    SingleImage(PathBuf),
}

/// A loaded study.
#[derive(Debug, Clone)]
pub struct LoadedVolume {
    /// Raw (rescaled but not normalized) intensities.
    pub volume: ScalarVolume,
    /// How slices were ordered. NIfTI volumes and single images report
    /// [`SliceOrdering::Position`].
    pub ordering: SliceOrdering,
}

/// Look for imaging input in `dir`.
///
/// A NIfTI volume takes precedence over DICOM files, which take precedence
/// over raster images. A missing directory, or one with none of them,
/// yields `None`.
pub fn discover_case<P: AsRef<Path>>(dir: P) -> Option<CaseInput> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "Case directory not found");
        return None;
    }

    if let Some(volume) = first_volume(dir) {
        return Some(CaseInput::Volume(volume));
    }
    let slices = dicom_files(dir);
    if !slices.is_empty() {
        return Some(CaseInput::SliceStack(slices));
    }
    first_image(dir).map(CaseInput::SingleImage)
}

/// Load the volume described by a [`CaseInput`].
///
/// # Errors
///
/// Propagates the loader's error: no usable slice, or an undecodable image.
pub fn load_case(input: &CaseInput) -> VolumeIoResult<LoadedVolume> {
    match input {
        CaseInput::Volume(path) => Ok(LoadedVolume {
            volume: load_nifti(path)?,
            ordering: SliceOrdering::Position,
        }),
        CaseInput::SliceStack(paths) => {
            let (volume, ordering) = load_slice_stack(paths)?;
            Ok(LoadedVolume { volume, ordering })
        }
        CaseInput::SingleImage(path) => Ok(LoadedVolume {
            volume: load_single_image(path)?,
            ordering: SliceOrdering::Position,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_has_no_input() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(discover_case(dir.path().join("nope")), None);
        assert_eq!(discover_case(dir.path()), None);
    }

    #[test]
    fn dicom_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("scan.png"), b"").unwrap();
        std::fs::write(dir.path().join("002.dcm"), b"").unwrap();
        std::fs::write(dir.path().join("001.dcm"), b"").unwrap();

        let Some(CaseInput::SliceStack(paths)) = discover_case(dir.path()) else {
            panic!("expected a slice stack");
        };
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("001.dcm"));
    }

    #[test]
    fn nifti_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("001.dcm"), b"").unwrap();
        std::fs::write(dir.path().join("scan.png"), b"").unwrap();
        std::fs::write(dir.path().join("t1.nii.gz"), b"").unwrap();
        assert_eq!(
            discover_case(dir.path()),
            Some(CaseInput::Volume(dir.path().join("t1.nii.gz")))
        );
    }

    #[test]
    fn image_found_without_dicom() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.jpg"), b"").unwrap();
        std::fs::write(dir.path().join("a.png"), b"").unwrap();
        assert_eq!(
            discover_case(dir.path()),
            Some(CaseInput::SingleImage(dir.path().join("a.png")))
        );
    }

    #[test]
    fn broken_image_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        std::fs::write(&path, b"garbage").unwrap();
        assert!(load_case(&CaseInput::SingleImage(path)).is_err());
    }
}
