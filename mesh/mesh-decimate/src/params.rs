//! Parameters for mesh decimation.

/// Parameters for mesh decimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecimateParams {
    /// Maximum number of vertices to keep. Default: 5000
    pub target_vertices: usize,
}

impl Default for DecimateParams {
    fn default() -> Self {
        Self {
            target_vertices: 5000,
        }
    }
}

impl DecimateParams {
    /// Create params targeting a specific vertex count.
    #[must_use]
    pub const fn with_target_vertices(count: usize) -> Self {
        Self {
            target_vertices: count,
        }
    }

    /// Budget suited to interactive preview.
    #[must_use]
    pub const fn preview() -> Self {
        Self::with_target_vertices(2000)
    }
}
