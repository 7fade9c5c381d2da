//! Error types for surface extraction.

use thiserror::Error;
use volume_types::Shape;

/// Result type for surface extraction.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Errors that can occur during surface extraction.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The mask has no boundary, so no surface exists.
    ///
    /// Recoverable: callers substitute a synthetic mesh.
    #[error("surface extraction produced no vertices (shape {shape}, {tissue_voxels} tissue voxels)")]
    DegenerateExtraction {
        /// Grid the extraction ran on.
        shape: Shape,
        /// Set voxels in the mask.
        tissue_voxels: usize,
    },

    /// Intensity field and mask disagree in shape.
    #[error("field shape {field} does not match mask shape {mask}")]
    ShapeMismatch {
        /// Field shape.
        field: Shape,
        /// Mask shape.
        mask: Shape,
    },

    /// The iso level must be a finite number.
    #[error("invalid iso level: {0}")]
    InvalidIsoLevel(f32),

    /// Volume construction failed.
    #[error(transparent)]
    Volume(#[from] volume_types::VolumeError),
}
