//! Tissue classes and vertex labelling.
//!
//! Surface vertices carry one of four tissue classes, looked up from the
//! intensity volume the surface was extracted from:
//!
//! | Label | Class | Display colour |
//! |-------|-------|----------------|
//! | 0 | skull / CSF | light grey |
//! | 1 | white matter | off-white |
//! | 2 | grey matter | grey |
//! | 3 | tumor | red |
//!
//! The intensity rules live in a single ordered table,
//! [`INTENSITY_LADDER`], so adding a class is a data edit.
//!
//! When no usable volume exists, [`phantom::generate`] builds a labelled
//! sphere that stands in for a reconstructed brain.
//!
//! # Example
//!
//! ```
//! use mesh_types::Point3;
//! use tissue_label::{label, TissueClass};
//! use volume_types::{ScalarVolume, Shape};
//!
//! let volume = ScalarVolume::from_fn(Shape::new(2, 2, 2), |_, _, _| 0.9);
//! let points = [Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)];
//! assert_eq!(label(&points, &volume), vec![TissueClass::WhiteMatter; 2]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod class;
mod error;
mod labeler;
pub mod phantom;

pub use class::{TissueClass, REMOVED_COLOR};
pub use error::{LabelError, LabelResult};
pub use labeler::{apply_labels, assign_colors, label, label_mesh, LadderRung, INTENSITY_LADDER};
pub use phantom::PhantomParams;
