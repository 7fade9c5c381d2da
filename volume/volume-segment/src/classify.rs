//! Percentile-band tissue classifier.

use tracing::{debug, info};
use volume_types::{percentile, ScalarVolume, TissueMask};

use crate::morphology::{dilate, erode};
use crate::params::ClassifierParams;

/// Output of [`segment`].
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// Tissue voxels after morphological cleanup.
    pub mask: TissueMask,
    /// The input min-max normalized into `[0, 1]`.
    pub normalized: ScalarVolume,
}

/// Classify tissue voxels by intensity.
///
/// 1. Normalize to `[0, 1]`.
/// 2. Keep voxels strictly between the low and high percentiles of the
///    normalized samples.
/// 3. Erode, then dilate, with the 6-connected cross.
///
/// Never fails: a constant volume has equal percentiles, so no voxel lies
/// strictly between them and the mask is empty.
#[must_use]
pub fn segment(volume: &ScalarVolume, params: &ClassifierParams) -> Segmentation {
    let normalized = volume.normalized();

    let low = percentile(normalized.values(), params.low_percentile).unwrap_or(0.0);
    let high = percentile(normalized.values(), params.high_percentile).unwrap_or(0.0);
    debug!(low, high, "Tissue intensity band");

    let band = TissueMask::from_volume(&normalized, |v| v > low && v < high);
    let eroded = erode(&band, params.erosion_iterations);
    let mask = dilate(&eroded, params.dilation_iterations);

    info!(
        shape = %volume.shape(),
        band = band.count(),
        tissue = mask.count(),
        "Segmented tissue"
    );

    Segmentation { mask, normalized }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volume_types::Shape;

    #[test]
    fn constant_volume_yields_empty_mask() {
        for value in [0.0, 7.5, -300.0] {
            let volume = ScalarVolume::from_fn(Shape::new(40, 40, 40), |_, _, _| value);
            let seg = segment(&volume, &ClassifierParams::default());
            assert_eq!(seg.mask.shape(), volume.shape());
            assert!(!seg.mask.any());
        }
    }

    #[test]
    fn band_excludes_extremes() {
        // Values 0..100 along the column axis.
        let volume = ScalarVolume::from_fn(Shape::new(1, 1, 100), |_, _, c| c as f32);
        let seg = segment(&volume, &ClassifierParams::raw());
        // P20 = 19.8, P95 = 94.05 on the normalized scale.
        assert!(!seg.mask.get(0, 0, 19));
        assert!(seg.mask.get(0, 0, 20));
        assert!(seg.mask.get(0, 0, 94));
        assert!(!seg.mask.get(0, 0, 95));
        assert_eq!(seg.mask.count(), 75);
    }

    #[test]
    fn mid_intensity_sphere_survives_cleanup() {
        let shape = Shape::new(24, 24, 24);
        // Dark background, bright rim, mid-grey ball.
        let volume = ScalarVolume::from_fn(shape, |d, r, c| {
            let dist = [d, r, c]
                .iter()
                .map(|&i| (i as f32 - 11.5).powi(2))
                .sum::<f32>()
                .sqrt();
            if dist < 7.0 {
                0.5 + dist * 0.01
            } else if dist < 9.0 {
                1.0
            } else {
                0.0
            }
        });
        let seg = segment(&volume, &ClassifierParams::default());
        assert!(seg.mask.get(12, 12, 12));
        assert!(!seg.mask.get(0, 0, 0));
    }
}
