//! Tissue segmentation of scalar volumes.
//!
//! Two segmentations are produced from the same study:
//!
//! - A binary **tissue mask** for surface reconstruction: voxels between the
//!   20th and 95th intensity percentiles, cleaned by morphological erosion
//!   and dilation. See [`segment`].
//! - A **region label map** for per-structure artifacts: either from an
//!   external [`SegmentationBackend`] bounded by a timeout, or from
//!   intensity bucketing when the backend is absent, slow or failing. See
//!   [`segment_regions`].
//!
//! Thresholding never fails. A constant or all-zero volume yields an empty
//! but well-formed mask.
//!
//! # Example
//!
//! ```
//! use volume_segment::{segment, ClassifierParams};
//! use volume_types::{ScalarVolume, Shape};
//!
//! let volume = ScalarVolume::zeros(Shape::new(8, 8, 8));
//! let seg = segment(&volume, &ClassifierParams::default());
//! assert_eq!(seg.mask.count(), 0);
//! assert_eq!(seg.mask.shape(), volume.shape());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod backend;
mod classify;
mod error;
mod morphology;
mod params;
mod regions;

pub use backend::{
    run_backend, segment_regions, BackendError, RegionSegmentation, RegionSource,
    SegmentationBackend, DEFAULT_BACKEND_TIMEOUT,
};
pub use classify::{segment, Segmentation};
pub use error::{SegmentError, SegmentResult};
pub use morphology::{dilate, erode};
pub use params::ClassifierParams;
pub use regions::{
    classify_regions, region_name, RegionMask, RegionVolume, MIN_REGION_VOXELS, REGION_THRESHOLDS,
};
