//! Error types for mesh decimation operations.

use thiserror::Error;

/// Errors that can occur during decimation operations.
#[derive(Debug, Error)]
pub enum DecimateError {
    /// Invalid target vertex count.
    #[error("Invalid target vertex count: {0} (must be at least 1)")]
    InvalidTargetCount(usize),
}

/// Result type for decimation operations.
pub type DecimateResult<T> = std::result::Result<T, DecimateError>;
