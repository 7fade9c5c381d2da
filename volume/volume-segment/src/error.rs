//! Error types for segmentation.

use std::time::Duration;
use thiserror::Error;
use volume_types::Shape;

/// Result type for segmentation operations.
pub type SegmentResult<T> = Result<T, SegmentError>;

/// Errors that can occur during segmentation.
///
/// Backend errors are recoverable: [`crate::segment_regions`] falls back to
/// intensity thresholding when it sees one.
#[derive(Debug, Error)]
pub enum SegmentError {
    /// The external backend did not answer within its time budget.
    #[error("segmentation backend '{backend}' timed out after {timeout:?}")]
    BackendTimeout {
        /// Backend name.
        backend: String,
        /// Budget that was exceeded.
        timeout: Duration,
    },

    /// The external backend reported an error or produced an unusable result.
    #[error("segmentation backend '{backend}' failed: {reason}")]
    BackendFailed {
        /// Backend name.
        backend: String,
        /// Failure description.
        reason: String,
    },

    /// A label buffer did not match its declared shape.
    #[error("label map holds {got} voxels but shape {shape} needs {expected}")]
    LabelShapeMismatch {
        /// Declared shape.
        shape: Shape,
        /// Voxels required by the shape.
        expected: usize,
        /// Voxels provided.
        got: usize,
    },
}
