//! Parameters for threshold segmentation.

/// Parameters for the percentile-band tissue classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClassifierParams {
    /// Lower percentile of the tissue band (exclusive). Default: 20
    pub low_percentile: f64,
    /// Upper percentile of the tissue band (exclusive). Default: 95
    pub high_percentile: f64,
    /// Erosion passes with the 6-connected cross. Default: 2
    pub erosion_iterations: usize,
    /// Dilation passes after erosion. Default: 3
    pub dilation_iterations: usize,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            low_percentile: 20.0,
            high_percentile: 95.0,
            erosion_iterations: 2,
            dilation_iterations: 3,
        }
    }
}

impl ClassifierParams {
    /// Band thresholding only, without morphological cleanup.
    #[must_use]
    pub fn raw() -> Self {
        Self {
            erosion_iterations: 0,
            dilation_iterations: 0,
            ..Self::default()
        }
    }

    /// Set the percentile band.
    #[must_use]
    pub const fn with_band(mut self, low: f64, high: f64) -> Self {
        self.low_percentile = low;
        self.high_percentile = high;
        self
    }

    /// Set the erosion and dilation pass counts.
    #[must_use]
    pub const fn with_morphology(mut self, erosion: usize, dilation: usize) -> Self {
        self.erosion_iterations = erosion;
        self.dilation_iterations = dilation;
        self
    }
}
