//! Volumetric grid types for NeuroSim.
//!
//! - [`ScalarVolume`] - a dense 3D grid of `f32` intensities with voxel spacing
//! - [`TissueMask`] - a boolean grid of the same shape marking tissue voxels
//! - [`Shape`] - grid dimensions in `(depth, rows, cols)` order
//!
//! # Axis Order
//!
//! Axis 0 is the slice (depth) axis, axis 1 the image rows and axis 2 the
//! image columns. Samples are stored row-major with columns varying fastest,
//! so a volume assembled from 2D slices keeps each slice contiguous.
//!
//! # Example
//!
//! ```
//! use volume_types::{ScalarVolume, Shape};
//!
//! let mut volume = ScalarVolume::zeros(Shape::new(4, 8, 8));
//! volume.set(2, 3, 3, 100.0);
//!
//! let normalized = volume.normalized();
//! assert!((normalized.get(2, 3, 3) - 1.0).abs() < 1e-6);
//! assert_eq!(normalized.get(0, 0, 0), 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod mask;
mod shape;
mod stats;
mod volume;

pub use error::{VolumeError, VolumeResult};
pub use mask::TissueMask;
pub use shape::Shape;
pub use stats::{min_max, percentile, NORMALIZE_EPSILON};
pub use volume::ScalarVolume;

pub use nalgebra::Vector3;
