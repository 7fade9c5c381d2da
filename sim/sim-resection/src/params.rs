//! Simulation parameters.

use mesh_types::Point3;
use tissue_label::TissueClass;

use crate::error::{SimError, SimResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters of the collapse model.
///
/// Non-rigid vertices move toward the resection centroid by
/// `max_displacement · exp(-d / decay_factor)`, where `d` is their distance
/// to it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationParams {
    /// Tissue class being removed. Default: tumor
    pub target_region: TissueClass,

    /// Craniotomy opening size. Carried through but not used by the model.
    /// Default: 5.0
    pub opening_size: f64,

    /// Displacement at the centroid itself. Default: 0.5
    pub max_displacement: f64,

    /// Distance over which displacement falls by a factor of e. Default: 3.0
    pub decay_factor: f64,

    /// Pseudo-stress per unit displacement. Default: 3.75
    pub stress_factor: f64,

    /// Stress at or below this is left out of the average. Default: 0.1
    pub stress_noise_floor: f64,

    /// Displacement above which a vertex counts as affected. Default: 0.05
    pub affected_threshold: f64,

    /// Volume attributed to each affected vertex, in cm³. Default: 0.5
    pub volume_per_vertex: f64,

    /// Centroid used when no vertex carries the target label.
    /// Default: (2, 2, 2)
    pub fallback_centroid: Point3<f64>,

    /// Mesh units to millimetres for the reported displacement. Default: 10
    pub mm_per_unit: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            target_region: TissueClass::Tumor,
            opening_size: 5.0,
            max_displacement: 0.5,
            decay_factor: 3.0,
            stress_factor: 3.75,
            stress_noise_floor: 0.1,
            affected_threshold: 0.05,
            volume_per_vertex: 0.5,
            fallback_centroid: Point3::new(2.0, 2.0, 2.0),
            mm_per_unit: 10.0,
        }
    }
}

impl SimulationParams {
    /// Parameters for removing the region named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownRegion`] if `name` is not a tissue class.
    ///
    /// # Example
    ///
    /// ```
    /// use sim_resection::SimulationParams;
    /// use tissue_label::TissueClass;
    ///
    /// let params = SimulationParams::for_region("tumor").unwrap();
    /// assert_eq!(params.target_region, TissueClass::Tumor);
    /// assert!(SimulationParams::for_region("cerebellum").is_err());
    /// ```
    pub fn for_region(name: &str) -> SimResult<Self> {
        let target_region = name
            .parse()
            .map_err(|_| SimError::UnknownRegion(name.to_string()))?;
        Ok(Self {
            target_region,
            ..Self::default()
        })
    }

    /// Set the opening size.
    #[must_use]
    pub const fn with_opening_size(mut self, opening_size: f64) -> Self {
        self.opening_size = opening_size;
        self
    }

    /// Set peak displacement and decay length.
    #[must_use]
    pub const fn with_falloff(mut self, max_displacement: f64, decay_factor: f64) -> Self {
        self.max_displacement = max_displacement;
        self.decay_factor = decay_factor;
        self
    }

    /// Validate the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] for a non-positive decay length or
    /// any non-finite or negative scale factor.
    pub fn validate(&self) -> SimResult<()> {
        if !self.decay_factor.is_finite() || self.decay_factor <= 0.0 {
            return Err(SimError::invalid_config("decay_factor must be positive"));
        }
        let factors = [
            ("max_displacement", self.max_displacement),
            ("stress_factor", self.stress_factor),
            ("stress_noise_floor", self.stress_noise_floor),
            ("affected_threshold", self.affected_threshold),
            ("volume_per_vertex", self.volume_per_vertex),
            ("mm_per_unit", self.mm_per_unit),
        ];
        for (name, value) in factors {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::invalid_config(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if !self.fallback_centroid.iter().all(|c| c.is_finite()) {
            return Err(SimError::invalid_config("fallback_centroid must be finite"));
        }
        Ok(())
    }
}
