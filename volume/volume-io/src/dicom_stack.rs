//! DICOM slice stacks.
//!
//! Pixel data goes through the transfer-syntax decoders of
//! `dicom::pixeldata`, so native and encapsulated (RLE, JPEG) slices load
//! alike. Rescale slope and intercept are applied here from the slice's own
//! tags rather than through the library's modality LUT.

use std::path::{Path, PathBuf};

use dicom::core::Tag;
use dicom::dictionary_std::tags;
use dicom::object::{open_file, DefaultDicomObject};
use dicom::pixeldata::{ConvertOptions, ModalityLutOption, PixelDecoder};
use tracing::{info, warn};
use volume_types::ScalarVolume;

use crate::error::{VolumeIoError, VolumeIoResult};
use crate::raster;
use crate::slice::{stack_slices, Slice, SliceOrdering};

/// Load a stack of 2D slices into a volume.
///
/// DICOM files are decoded with their rescale slope and intercept applied
/// when both are present. PNG and JPEG paths are accepted as metadata-free
/// slices. Slices that fail to decode, or whose dimensions differ from the
/// first usable slice, are skipped with a warning.
///
/// # Errors
///
/// Returns [`VolumeIoError::EmptyInput`] when no slice is usable.
pub fn load_slice_stack<P: AsRef<Path>>(paths: &[P]) -> VolumeIoResult<(ScalarVolume, SliceOrdering)> {
    let mut slices = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        match read_slice(path) {
            Ok(slice) => slices.push(slice),
            Err(err) => warn!(path = %path.display(), error = %err, "Skipping unreadable slice"),
        }
    }

    let read = slices.len();
    let (volume, ordering) = stack_slices(slices)?;
    info!(
        files = paths.len(),
        slices = read,
        shape = %volume.shape(),
        ?ordering,
        "Loaded slice stack"
    );
    Ok((volume, ordering))
}

#[allow(clippy::cast_possible_truncation)]
fn read_slice(path: &Path) -> VolumeIoResult<Slice> {
    if raster::is_raster(path) {
        return raster::read_raster_slice(path);
    }

    let obj = open_file(path).map_err(|e| VolumeIoError::Dicom {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let rows = read_int(&obj, tags::ROWS)
        .and_then(|v| usize::try_from(v).ok())
        .ok_or_else(|| VolumeIoError::malformed(path, "missing Rows"))?;
    let cols = read_int(&obj, tags::COLUMNS)
        .and_then(|v| usize::try_from(v).ok())
        .ok_or_else(|| VolumeIoError::malformed(path, "missing Columns"))?;

    let mut pixels = decode_pixels(&obj, path, rows * cols)?;

    let slope = read_decimals(&obj, tags::RESCALE_SLOPE).and_then(|v| v.first().copied());
    let intercept = read_decimals(&obj, tags::RESCALE_INTERCEPT).and_then(|v| v.first().copied());
    if let (Some(slope), Some(intercept)) = (slope, intercept) {
        for p in &mut pixels {
            *p = (f64::from(*p) * slope + intercept) as f32;
        }
    }

    Ok(Slice {
        path: path.to_path_buf(),
        rows,
        cols,
        pixels,
        position_z: read_decimals(&obj, tags::IMAGE_POSITION_PATIENT).and_then(|v| v.get(2).copied()),
        instance: read_int(&obj, tags::INSTANCE_NUMBER),
        pixel_spacing: read_decimals(&obj, tags::PIXEL_SPACING)
            .filter(|v| v.len() >= 2)
            .map(|v| (v[0], v[1])),
        thickness: read_decimals(&obj, tags::SLICE_THICKNESS).and_then(|v| v.first().copied()),
    })
}

fn read_int(obj: &DefaultDicomObject, tag: Tag) -> Option<i64> {
    obj.element(tag).ok()?.to_int::<i64>().ok()
}

/// Backslash-separated decimal string values (DS), e.g. `0.5\0.5`.
fn read_decimals(obj: &DefaultDicomObject, tag: Tag) -> Option<Vec<f64>> {
    let raw = obj.element(tag).ok()?.to_str().ok()?;
    let values: Vec<f64> = raw
        .split('\\')
        .filter_map(|v| v.trim().parse::<f64>().ok())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

fn decode_pixels(obj: &DefaultDicomObject, path: &Path, count: usize) -> VolumeIoResult<Vec<f32>> {
    let decoded = obj
        .decode_pixel_data()
        .map_err(|e| VolumeIoError::malformed(path, format!("undecodable PixelData: {e}")))?;

    let samples = decoded.samples_per_pixel();
    if samples != 1 {
        return Err(VolumeIoError::malformed(path, format!("{samples} samples per pixel")));
    }

    let options = ConvertOptions::new().with_modality_lut(ModalityLutOption::None);
    let pixels: Vec<f32> = decoded
        .to_vec_with_options(&options)
        .map_err(|e| VolumeIoError::malformed(path, format!("unconvertible PixelData: {e}")))?;

    // Multi-frame objects contribute their first frame.
    if pixels.len() < count {
        return Err(VolumeIoError::malformed(
            path,
            format!("PixelData holds {} samples, expected {count}", pixels.len()),
        ));
    }
    Ok(pixels.into_iter().take(count).collect())
}

/// DICOM files in `dir`, sorted by file name.
pub(crate) fn dicom_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .into_iter()
        .flatten()
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("dcm"))
        })
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.dcm");
        std::fs::write(&bad, b"not a dicom file").unwrap();

        let result = load_slice_stack(&[bad]);
        assert!(matches!(result, Err(VolumeIoError::EmptyInput { .. })));
    }

    #[test]
    fn lists_only_dcm_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.dcm", "a.DCM", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let files = dicom_files(dir.path());
        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name()?.to_str())
            .collect();
        assert_eq!(names, vec!["a.DCM", "b.dcm"]);
    }
}
