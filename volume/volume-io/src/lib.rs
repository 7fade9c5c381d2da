//! Loading imaging studies as [`ScalarVolume`]s.
//!
//! Three kinds of case input are supported:
//!
//! - **Volumes**: a NIfTI file (`.nii` or `.nii.gz`), read as-is with the
//!   spacing from its header.
//! - **Slice stacks**: a directory of DICOM files, one 2D slice each. Slices
//!   are rescaled to physical units, ordered along the scan axis and stacked.
//! - **Single images**: one PNG or JPEG, extruded into a synthetic volume so
//!   a 2D picture can still drive the reconstruction pipeline.
//!
//! Unreadable slices are skipped with a warning; only a stack with no usable
//! slice at all is an error.
//!
//! # Example
//!
//! ```no_run
//! use volume_io::{discover_case, load_case};
//!
//! if let Some(input) = discover_case("uploads/case-17") {
//!     let loaded = load_case(&input).unwrap();
//!     println!("{} ({:?})", loaded.volume.shape(), loaded.ordering);
//! }
//! ```
//!
//! [`ScalarVolume`]: volume_types::ScalarVolume

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod case;
mod dicom_stack;
mod error;
mod nifti_volume;
mod raster;
mod slice;

pub use case::{discover_case, load_case, CaseInput, LoadedVolume};
pub use dicom_stack::load_slice_stack;
pub use error::{VolumeIoError, VolumeIoResult};
pub use nifti_volume::load_nifti;
pub use raster::{extrude_image, load_single_image};
pub use slice::{SliceOrdering, DEFAULT_SPACING_MM};
