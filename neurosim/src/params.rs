//! Pipeline configuration.

use std::time::Duration;

use mesh_decimate::DecimateParams;
use serde::{Deserialize, Serialize};
use tissue_label::PhantomParams;
use volume_segment::{ClassifierParams, DEFAULT_BACKEND_TIMEOUT, MIN_REGION_VOXELS};
use volume_surface::SurfaceParams;

/// Parameters for every pipeline stage.
///
/// Deserializes from partial JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    /// Tissue mask thresholds and morphology.
    pub classifier: ClassifierParams,

    /// Surface extraction for the display mesh.
    pub surface: SurfaceParams,

    /// Vertex budget for the display mesh.
    pub decimate: DecimateParams,

    /// Phantom used when reconstruction is impossible.
    pub phantom: PhantomParams,

    /// Seconds to wait for an external segmentation backend. Default: 600
    pub backend_timeout_secs: u64,

    /// Smallest region, in voxels, exported as a surface. Default: 100
    pub min_region_voxels: usize,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            classifier: ClassifierParams::default(),
            surface: SurfaceParams::default(),
            decimate: DecimateParams::default(),
            phantom: PhantomParams::default(),
            backend_timeout_secs: DEFAULT_BACKEND_TIMEOUT.as_secs(),
            min_region_voxels: MIN_REGION_VOXELS,
        }
    }
}

impl PipelineParams {
    /// Faster settings for interactive preview.
    #[must_use]
    pub fn preview() -> Self {
        Self::default().with_preview_resolution()
    }

    /// Swap in the preview surface grid and vertex budget, keeping the
    /// other settings.
    #[must_use]
    pub fn with_preview_resolution(mut self) -> Self {
        self.surface = SurfaceParams::preview();
        self.decimate = DecimateParams::preview();
        self
    }

    /// Backend timeout as a [`Duration`].
    #[must_use]
    pub const fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend_timeout_secs)
    }

    /// Set the display mesh vertex budget.
    #[must_use]
    pub const fn with_target_vertices(mut self, count: usize) -> Self {
        self.decimate = DecimateParams::with_target_vertices(count);
        self
    }

    /// Seed the phantom for reproducible fallbacks.
    #[must_use]
    pub const fn with_phantom_seed(mut self, seed: u64) -> Self {
        self.phantom = self.phantom.with_seed(seed);
        self
    }
}
