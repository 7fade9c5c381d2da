//! Region label maps.
//!
//! A [`RegionVolume`] assigns one `u16` label per voxel. Label 0 is always
//! background. The built-in classifier uses labels 1-4 for tissue classes;
//! external backends may emit anatomical labels from the wider table in
//! [`region_name`].

use hashbrown::HashMap;
use tracing::{debug, info};
use volume_types::{ScalarVolume, Shape, TissueMask, Vector3};

use crate::error::{SegmentError, SegmentResult};

/// Regions with fewer voxels than this are not exported.
pub const MIN_REGION_VOXELS: usize = 100;

/// Lower bounds (inclusive) of the intensity buckets, highest first.
/// Anything below the last bound is background.
pub const REGION_THRESHOLDS: [(f32, u16); 4] = [(0.8, 4), (0.6, 3), (0.3, 2), (0.1, 1)];

const REGION_NAMES: &[(u16, &str)] = &[
    (0, "Background"),
    (1, "CSF_(Cerebrospinal_Fluid)"),
    (2, "Gray_Matter"),
    (3, "White_Matter"),
    (4, "Deep_Gray_Matter"),
    (5, "Brain_Stem"),
    (6, "Cerebellum"),
    (10, "Left_Thalamus"),
    (11, "Left_Caudate"),
    (12, "Left_Putamen"),
    (13, "Left_Pallidum"),
    (14, "3rd_Ventricle"),
    (15, "4th_Ventricle"),
    (16, "Brain_Stem"),
    (17, "Left_Hippocampus"),
    (18, "Left_Amygdala"),
    (26, "Left_Accumbens_area"),
    (28, "Left_VentralDC"),
    (31, "Left_choroid_plexus"),
    (41, "Right_Cerebral_White_Matter"),
    (42, "Right_Cerebral_Cortex"),
    (43, "Right_Lateral_Ventricle"),
    (44, "Right_Inf_Lat_Vent"),
    (46, "Right_Cerebellum_White_Matter"),
    (47, "Right_Cerebellum_Cortex"),
    (49, "Right_Thalamus"),
    (50, "Right_Caudate"),
    (51, "Right_Putamen"),
    (52, "Right_Pallidum"),
    (53, "Right_Hippocampus"),
    (54, "Right_Amygdala"),
    (58, "Right_Accumbens_area"),
    (60, "Right_VentralDC"),
    (63, "Right_choroid_plexus"),
    (173, "Hypothalamus"),
    (174, "Left_Hypothalamus"),
    (175, "Right_Hypothalamus"),
];

/// File-safe name of a region label, or `Region_<label>` if unknown.
///
/// # Example
///
/// ```
/// use volume_segment::region_name;
///
/// assert_eq!(region_name(2), "Gray_Matter");
/// assert_eq!(region_name(999), "Region_999");
/// ```
#[must_use]
pub fn region_name(label: u16) -> String {
    REGION_NAMES
        .iter()
        .find(|(l, _)| *l == label)
        .map_or_else(|| format!("Region_{label}"), |(_, name)| (*name).to_string())
}

/// A voxel-wise region label map.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionVolume {
    labels: Vec<u16>,
    shape: Shape,
    spacing: Vector3<f64>,
}

/// One non-background region extracted from a [`RegionVolume`].
#[derive(Debug, Clone)]
pub struct RegionMask {
    /// Region label.
    pub label: u16,
    /// File-safe region name.
    pub name: String,
    /// Number of voxels carrying the label.
    pub voxels: usize,
    /// Voxels of this region.
    pub mask: TissueMask,
}

impl RegionVolume {
    /// Create a label map.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::LabelShapeMismatch`] if `labels.len()` differs
    /// from `shape.len()`.
    pub fn new(shape: Shape, labels: Vec<u16>, spacing: Vector3<f64>) -> SegmentResult<Self> {
        if labels.len() != shape.len() {
            return Err(SegmentError::LabelShapeMismatch {
                shape,
                expected: shape.len(),
                got: labels.len(),
            });
        }
        Ok(Self {
            labels,
            shape,
            spacing,
        })
    }

    /// Grid dimensions.
    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    /// Voxel spacing along `(depth, rows, cols)`.
    #[must_use]
    pub const fn spacing(&self) -> Vector3<f64> {
        self.spacing
    }

    /// All labels in storage order.
    #[must_use]
    pub fn labels(&self) -> &[u16] {
        &self.labels
    }

    /// Label at `(d, r, c)`; out-of-range coordinates read as background.
    #[must_use]
    pub fn get(&self, d: usize, r: usize, c: usize) -> u16 {
        if self.shape.contains(d, r, c) {
            self.labels[self.shape.index(d, r, c)]
        } else {
            0
        }
    }

    /// Voxel count of each non-background label, ascending by label.
    #[must_use]
    pub fn label_counts(&self) -> Vec<(u16, usize)> {
        let mut counts: HashMap<u16, usize> = HashMap::new();
        for &label in self.labels.iter().filter(|&&l| l != 0) {
            *counts.entry(label).or_insert(0) += 1;
        }
        let mut counts: Vec<(u16, usize)> = counts.into_iter().collect();
        counts.sort_unstable_by_key(|&(label, _)| label);
        counts
    }

    /// Mask of voxels carrying `label`.
    #[must_use]
    pub fn mask(&self, label: u16) -> TissueMask {
        TissueMask::from_fn(self.shape, |d, r, c| self.get(d, r, c) == label)
    }

    /// One mask per non-background region with at least `min_voxels` voxels.
    #[must_use]
    pub fn region_masks(&self, min_voxels: usize) -> Vec<RegionMask> {
        self.label_counts()
            .into_iter()
            .filter(|&(label, voxels)| {
                let keep = voxels >= min_voxels;
                if !keep {
                    debug!(label, voxels, min_voxels, "Skipping small region");
                }
                keep
            })
            .map(|(label, voxels)| RegionMask {
                label,
                name: region_name(label),
                voxels,
                mask: self.mask(label),
            })
            .collect()
    }
}

/// Bucket normalized intensity into tissue-class regions.
///
/// | normalized intensity | label | region |
/// |---|---|---|
/// | `< 0.1` | 0 | background |
/// | `[0.1, 0.3)` | 1 | CSF |
/// | `[0.3, 0.6)` | 2 | grey matter |
/// | `[0.6, 0.8)` | 3 | white matter |
/// | `>= 0.8` | 4 | deep grey matter |
///
/// The input is min-max normalized first, so raw intensities are accepted.
#[must_use]
pub fn classify_regions(volume: &ScalarVolume) -> RegionVolume {
    let normalized = volume.normalized();
    let labels = normalized
        .values()
        .iter()
        .map(|&v| {
            REGION_THRESHOLDS
                .iter()
                .find(|&&(bound, _)| v >= bound)
                .map_or(0, |&(_, label)| label)
        })
        .collect();

    let regions = RegionVolume {
        labels,
        shape: volume.shape(),
        spacing: volume.spacing(),
    };
    info!(
        shape = %regions.shape,
        regions = regions.label_counts().len(),
        "Classified intensity regions"
    );
    regions
}
