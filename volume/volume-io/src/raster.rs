//! Raster images (PNG, JPEG).

use std::path::{Path, PathBuf};

use tracing::info;
use volume_types::{min_max, ScalarVolume, Shape, NORMALIZE_EPSILON};

use crate::error::{VolumeIoError, VolumeIoResult};
use crate::slice::Slice;

const RASTER_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Depth taper: slices at either end are scaled down by this fraction.
const TAPER: f32 = 0.3;

pub(crate) fn is_raster(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| RASTER_EXTENSIONS.iter().any(|r| e.eq_ignore_ascii_case(r)))
}

/// Decode a raster image to grayscale samples, returning `(rows, cols, pixels)`.
fn read_gray(path: &Path) -> VolumeIoResult<(usize, usize, Vec<f32>)> {
    let gray = image::open(path)?.to_luma8();
    let (cols, rows) = (gray.width() as usize, gray.height() as usize);
    let pixels = gray.into_raw().into_iter().map(f32::from).collect();
    Ok((rows, cols, pixels))
}

pub(crate) fn read_raster_slice(path: &Path) -> VolumeIoResult<Slice> {
    let (rows, cols, pixels) = read_gray(path)?;
    Ok(Slice {
        path: path.to_path_buf(),
        rows,
        cols,
        pixels,
        position_z: None,
        instance: None,
        pixel_spacing: None,
        thickness: None,
    })
}

/// Load one raster image and extrude it into a synthetic volume.
///
/// See [`extrude_image`] for how the depth axis is synthesized.
///
/// # Errors
///
/// Returns an image error if decoding fails and
/// [`VolumeIoError::EmptyInput`] if the image is too small to extrude.
pub fn load_single_image<P: AsRef<Path>>(path: P) -> VolumeIoResult<ScalarVolume> {
    let path = path.as_ref();
    let (rows, cols, pixels) = read_gray(path)?;
    let volume = extrude_image(rows, cols, &pixels)?;
    info!(path = %path.display(), shape = %volume.shape(), "Extruded single image");
    Ok(volume)
}

/// Extrude a row-major grayscale image into a volume.
///
/// The image is min-max normalized into `[0, 1]` and replicated across
/// `min(rows, cols) / 2` slices. Slice `i` is scaled by
/// `1 - |i / depth - 0.5| * 0.3`, so intensity peaks mid-depth and falls
/// off by up to 15 % towards either end.
///
/// # Errors
///
/// Returns [`VolumeIoError::EmptyInput`] when the depth would be zero, and
/// [`VolumeIoError::MalformedSlice`] when `pixels` does not hold
/// `rows * cols` samples.
///
/// # Example
///
/// ```
/// use volume_io::extrude_image;
///
/// let image = vec![0.0, 50.0, 100.0, 200.0];
/// let volume = extrude_image(2, 2, &image).unwrap();
/// assert_eq!(volume.shape().depth, 1);
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn extrude_image(rows: usize, cols: usize, pixels: &[f32]) -> VolumeIoResult<ScalarVolume> {
    if pixels.len() != rows * cols {
        return Err(VolumeIoError::malformed(
            PathBuf::from("<image>"),
            format!("{} samples for a {rows}x{cols} image", pixels.len()),
        ));
    }
    let depth = rows.min(cols) / 2;
    if depth == 0 {
        return Err(VolumeIoError::empty(format!("image {rows}x{cols} too small to extrude")));
    }

    let (lo, hi) = min_max(pixels).unwrap_or((0.0, 0.0));
    let range = hi - lo + NORMALIZE_EPSILON;
    let normalized: Vec<f32> = pixels
        .iter()
        .map(|&v| if v.is_finite() { (v - lo) / range } else { 0.0 })
        .collect();

    let shape = Shape::new(depth, rows, cols);
    let volume = ScalarVolume::from_fn(shape, |d, r, c| {
        let t = d as f32 / depth as f32;
        let scale = 1.0 - (t - 0.5).abs() * TAPER;
        normalized[r * cols + c] * scale
    });
    Ok(volume)
}

/// The first raster image in `dir`, by file name.
pub(crate) fn first_image(dir: &Path) -> Option<PathBuf> {
    let mut images: Vec<PathBuf> = std::fs::read_dir(dir)
        .ok()?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && is_raster(p))
        .collect();
    images.sort();
    images.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn extrusion_depth_and_taper() {
        let pixels: Vec<f32> = (0..8 * 6).map(|i| (i % 6) as f32).collect();
        let volume = extrude_image(8, 6, &pixels).unwrap();
        assert_eq!(volume.shape(), Shape::new(3, 8, 6));

        // Brightest column, normalized to ~1.
        assert_relative_eq!(volume.get(0, 0, 5), 0.85, epsilon = 1e-5);
        assert_relative_eq!(volume.get(1, 0, 5), 1.0 - (1.0f32 / 3.0 - 0.5).abs() * 0.3, epsilon = 1e-5);
        assert_relative_eq!(volume.get(2, 0, 0), 0.0);
    }

    #[test]
    fn tiny_image_is_empty_input() {
        assert!(matches!(
            extrude_image(1, 5, &[1.0; 5]),
            Err(VolumeIoError::EmptyInput { .. })
        ));
    }

    #[test]
    fn sample_count_must_match() {
        assert!(matches!(
            extrude_image(4, 4, &[0.0; 3]),
            Err(VolumeIoError::MalformedSlice { .. })
        ));
    }

    #[test]
    fn png_roundtrip_through_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.png");
        let img = image::GrayImage::from_fn(10, 6, |x, _| image::Luma([(x * 20) as u8]));
        img.save(&path).unwrap();

        let volume = load_single_image(&path).unwrap();
        assert_eq!(volume.shape(), Shape::new(3, 6, 10));
        assert_relative_eq!(volume.get(0, 0, 0), 0.0);
        assert_eq!(first_image(dir.path()), Some(path));
    }

    #[test]
    fn raster_extension_check() {
        assert!(is_raster(Path::new("a/B.JPG")));
        assert!(is_raster(Path::new("x.jpeg")));
        assert!(!is_raster(Path::new("x.dcm")));
    }
}
