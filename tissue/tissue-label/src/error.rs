//! Error types for tissue labelling.

use thiserror::Error;

/// Result type for tissue labelling.
pub type LabelResult<T> = Result<T, LabelError>;

/// Errors that can occur while labelling or generating tissue meshes.
#[derive(Debug, Error)]
pub enum LabelError {
    /// A tissue class name did not match any class.
    #[error("unknown tissue class: {0:?}")]
    UnknownClass(String),

    /// A numeric label outside the class table.
    #[error("invalid tissue label: {0}")]
    InvalidLabel(u8),

    /// Label array length differs from the vertex count.
    #[error("{labels} labels for {vertices} vertices")]
    LengthMismatch {
        /// Number of labels supplied.
        labels: usize,
        /// Number of vertices in the mesh.
        vertices: usize,
    },

    /// Phantom noise must be finite and non-negative.
    #[error("invalid phantom noise standard deviation: {0}")]
    InvalidNoise(f64),
}
