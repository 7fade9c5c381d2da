//! Error types for volume loading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for volume loading.
pub type VolumeIoResult<T> = Result<T, VolumeIoError>;

/// Errors that can occur while loading a study.
#[derive(Debug, Error)]
pub enum VolumeIoError {
    /// Nothing usable was found.
    #[error("no usable input: {reason}")]
    EmptyInput {
        /// What was missing.
        reason: String,
    },

    /// A slice could not be used. Stack loading skips these.
    #[error("malformed slice {}: {reason}", path.display())]
    MalformedSlice {
        /// Offending file.
        path: PathBuf,
        /// Why it was rejected.
        reason: String,
    },

    /// The DICOM reader rejected a file.
    #[error("DICOM error in {}: {message}", path.display())]
    Dicom {
        /// Offending file.
        path: PathBuf,
        /// Reader message.
        message: String,
    },

    /// The NIfTI reader rejected a file.
    #[error("NIfTI error in {}: {message}", path.display())]
    Nifti {
        /// Offending file.
        path: PathBuf,
        /// Reader message.
        message: String,
    },

    /// Raster image decoding failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Assembled samples did not form a valid volume.
    #[error(transparent)]
    Volume(#[from] volume_types::VolumeError),
}

impl VolumeIoError {
    pub(crate) fn empty(reason: impl Into<String>) -> Self {
        Self::EmptyInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedSlice {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
