//! Error types for resection simulation.

use thiserror::Error;

/// Errors that can occur during resection simulation.
#[derive(Debug, Error)]
pub enum SimError {
    /// The mesh has no vertices to deform.
    #[error("cannot simulate an empty mesh")]
    EmptyMesh,

    /// The requested region name is not a tissue class.
    #[error("unknown region to remove: {0:?}")]
    UnknownRegion(String),

    /// Parameter validation failed.
    #[error("invalid simulation config: {0}")]
    InvalidConfig(String),
}

impl SimError {
    /// Create an invalid configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

/// Result type for resection simulation.
pub type SimResult<T> = std::result::Result<T, SimError>;
