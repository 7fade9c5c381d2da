//! Pipeline errors.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors surfaced by the pipeline.
///
/// Reconstruction errors never escape [`crate::segment_case`], which falls
/// back to the phantom mesh; they appear in the fallback reason instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The case directory holds no imaging input.
    #[error("no imaging input in {}", path.display())]
    InputAbsent {
        /// Case directory that was searched.
        path: PathBuf,
    },

    /// Loading the study failed.
    #[error(transparent)]
    Load(#[from] volume_io::VolumeIoError),

    /// Surface extraction failed.
    #[error(transparent)]
    Surface(#[from] volume_surface::SurfaceError),

    /// Decimation failed.
    #[error(transparent)]
    Decimate(#[from] mesh_decimate::DecimateError),

    /// Labelling or phantom generation failed.
    #[error(transparent)]
    Label(#[from] tissue_label::LabelError),

    /// Simulation failed.
    #[error(transparent)]
    Simulation(#[from] sim_resection::SimError),

    /// Writing a mesh artifact failed.
    #[error(transparent)]
    MeshIo(#[from] mesh_io::IoError),

    /// Filesystem error outside the mesh writer.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Whether the phantom mesh is an acceptable substitute for this error.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InputAbsent { .. }
                | Self::Load(_)
                | Self::Surface(volume_surface::SurfaceError::DegenerateExtraction { .. })
        )
    }
}
