//! Parameters for surface extraction.

/// Parameters for surface extraction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SurfaceParams {
    /// Iso level on the 0/1 mask field. Default: 0.5
    pub iso_level: f32,

    /// Largest axis length before resampling. Default: 128
    pub max_dim: usize,

    /// Re-centre and scale so the largest extent equals this value.
    /// `None` keeps physical (spacing-scaled) coordinates. Default: `Some(10.0)`
    pub canonical_size: Option<f64>,
}

impl Default for SurfaceParams {
    fn default() -> Self {
        Self {
            iso_level: 0.5,
            max_dim: 128,
            canonical_size: Some(10.0),
        }
    }
}

impl SurfaceParams {
    /// Keep physical coordinates and full resolution, for exported artifacts.
    #[must_use]
    pub fn physical() -> Self {
        Self {
            max_dim: usize::MAX,
            canonical_size: None,
            ..Self::default()
        }
    }

    /// Coarser grid for quick previews.
    #[must_use]
    pub fn preview() -> Self {
        Self {
            max_dim: 64,
            ..Self::default()
        }
    }

    /// Set the resampling limit.
    #[must_use]
    pub const fn with_max_dim(mut self, max_dim: usize) -> Self {
        self.max_dim = max_dim;
        self
    }
}
