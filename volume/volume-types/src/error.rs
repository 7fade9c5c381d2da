//! Error types for volume construction.

use thiserror::Error;

use crate::Shape;

/// Result type for volume operations.
pub type VolumeResult<T> = Result<T, VolumeError>;

/// Errors that can occur when building volumes and masks.
#[derive(Debug, Error)]
pub enum VolumeError {
    /// Sample buffer length does not match the grid shape.
    #[error("buffer holds {got} samples but shape {shape} needs {expected}")]
    ShapeMismatch {
        /// Declared shape.
        shape: Shape,
        /// Samples required by the shape.
        expected: usize,
        /// Samples provided.
        got: usize,
    },

    /// Two grids that must agree in shape do not.
    #[error("shape {left} does not match {right}")]
    IncompatibleShapes {
        /// Shape of the first grid.
        left: Shape,
        /// Shape of the second grid.
        right: Shape,
    },

    /// Voxel spacing must be finite and positive on every axis.
    #[error("invalid voxel spacing: {0:?}")]
    InvalidSpacing([f64; 3]),
}
