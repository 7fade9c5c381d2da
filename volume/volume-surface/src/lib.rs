//! Surface reconstruction from segmented volumes.
//!
//! The tissue mask is treated as a 0/1 scalar field and its iso-surface at
//! level 0.5 is extracted with Naive Surface Nets, a dual method from the
//! marching-cubes family:
//!
//! 1. Every grid cell whose eight corners straddle the iso level gets one
//!    vertex, placed at the mean of the interpolated edge crossings.
//! 2. Every grid edge whose endpoints straddle the level emits one quad
//!    (two triangles) joining the four cells around it.
//!
//! Samples outside the grid read as 0, so tissue touching the border still
//! produces a closed surface. Faces are wound counter-clockwise seen from
//! outside the tissue.
//!
//! Large volumes are first resampled so no axis exceeds 128 samples; the
//! intensity field is resampled trilinearly and the mask by nearest
//! neighbour, keeping the two aligned for vertex labelling.
//!
//! # Example
//!
//! ```
//! use volume_surface::{extract_surface, SurfaceParams};
//! use volume_types::{ScalarVolume, Shape, TissueMask};
//! use mesh_types::MeshBounds;
//!
//! let shape = Shape::new(6, 6, 6);
//! let field = ScalarVolume::zeros(shape);
//! let mask = TissueMask::from_fn(shape, |d, r, c| (2..4).contains(&d) && (2..4).contains(&r) && (2..4).contains(&c));
//!
//! let surface = extract_surface(&field, &mask, &SurfaceParams::default()).unwrap();
//! assert!((surface.mesh.bounds().max_extent() - 10.0).abs() < 1e-9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod extract;
mod params;
mod resample;
mod surface_nets;

pub use error::{SurfaceError, SurfaceResult};
pub use extract::{extract_mask_surface, extract_surface, Surface};
pub use params::SurfaceParams;
pub use resample::{resample_linear, resample_nearest, resampled_shape};
pub use surface_nets::surface_nets;
