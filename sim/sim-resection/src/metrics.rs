//! Aggregate risk metrics.

// Vertex counts don't overflow in practice
#![allow(clippy::cast_precision_loss)]

use std::fmt;

use crate::params::SimulationParams;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Average stress (kPa) above which the parietal lobe is flagged.
const PARIETAL_STRESS_KPA: f64 = 1.0;

/// Peak displacement (mesh units) above which the frontal cortex is flagged.
const FRONTAL_DISPLACEMENT: f64 = 0.3;

/// Summary of a simulated deformation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationMetrics {
    /// Largest vertex displacement, in millimetres.
    pub max_displacement_mm: f64,

    /// Mean stress over vertices above the noise floor, in kPa. Zero when
    /// no vertex exceeds the floor.
    pub avg_stress_kpa: f64,

    /// Approximate volume of displaced tissue, in cm³.
    pub affected_volume_cm3: f64,

    /// Regions at risk, in a fixed order.
    pub vulnerable_regions: Vec<String>,
}

impl SimulationMetrics {
    /// Whether any region was flagged.
    #[must_use]
    pub fn has_risk(&self) -> bool {
        !self.vulnerable_regions.is_empty()
    }
}

impl fmt::Display for SimulationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "max displacement {:.2} mm, avg stress {:.2} kPa, affected {:.1} cm³",
            self.max_displacement_mm, self.avg_stress_kpa, self.affected_volume_cm3
        )?;
        if self.has_risk() {
            write!(f, ", at risk: {}", self.vulnerable_regions.join(", "))?;
        }
        Ok(())
    }
}

/// Aggregate per-vertex displacement magnitudes and stresses.
///
/// # Example
///
/// ```
/// use sim_resection::{metrics_from_fields, SimulationParams};
///
/// let metrics = metrics_from_fields(&[0.0, 0.1, 0.2], &[0.05, 0.2, 0.3], &SimulationParams::default());
/// assert!((metrics.avg_stress_kpa - 0.25).abs() < 1e-12);
/// assert!((metrics.max_displacement_mm - 2.0).abs() < 1e-12);
/// assert!((metrics.affected_volume_cm3 - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn metrics_from_fields(
    displacements: &[f64],
    stresses: &[f64],
    params: &SimulationParams,
) -> SimulationMetrics {
    let max_displacement = displacements.iter().copied().fold(0.0, f64::max);

    let (stress_sum, stress_count) = stresses
        .iter()
        .filter(|&&s| s > params.stress_noise_floor)
        .fold((0.0, 0usize), |(sum, n), &s| (sum + s, n + 1));
    let avg_stress_kpa = if stress_count == 0 {
        0.0
    } else {
        stress_sum / stress_count as f64
    };

    let affected = displacements
        .iter()
        .filter(|&&m| m > params.affected_threshold)
        .count();

    let mut vulnerable_regions = Vec::new();
    if avg_stress_kpa > PARIETAL_STRESS_KPA {
        vulnerable_regions.push("parietal_lobe".to_string());
    }
    if max_displacement > FRONTAL_DISPLACEMENT {
        vulnerable_regions.push("frontal_cortex".to_string());
    }

    SimulationMetrics {
        max_displacement_mm: max_displacement * params.mm_per_unit,
        avg_stress_kpa,
        affected_volume_cm3: affected as f64 * params.volume_per_vertex,
        vulnerable_regions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn stress_below_floor_is_excluded() {
        let metrics = metrics_from_fields(&[0.0; 3], &[0.05, 0.2, 0.3], &SimulationParams::default());
        assert_relative_eq!(metrics.avg_stress_kpa, 0.25);
    }

    #[test]
    fn no_stress_above_floor_averages_to_zero() {
        let metrics = metrics_from_fields(&[0.0, 0.01], &[0.0, 0.1], &SimulationParams::default());
        assert_relative_eq!(metrics.avg_stress_kpa, 0.0);
        assert_relative_eq!(metrics.max_displacement_mm, 0.1);
        assert!(!metrics.has_risk());
    }

    #[test]
    fn empty_fields() {
        let metrics = metrics_from_fields(&[], &[], &SimulationParams::default());
        assert_relative_eq!(metrics.max_displacement_mm, 0.0);
        assert_relative_eq!(metrics.affected_volume_cm3, 0.0);
        assert!(metrics.vulnerable_regions.is_empty());
    }

    #[test]
    fn risk_flags_in_order() {
        let metrics = metrics_from_fields(&[0.4, 0.35], &[1.5, 1.3], &SimulationParams::default());
        assert_eq!(metrics.vulnerable_regions, vec!["parietal_lobe", "frontal_cortex"]);
        assert_relative_eq!(metrics.affected_volume_cm3, 1.0);
        assert!(metrics.to_string().contains("at risk: parietal_lobe, frontal_cortex"));
    }

    #[test]
    fn flags_are_strict() {
        let metrics = metrics_from_fields(&[0.3], &[1.0], &SimulationParams::default());
        assert!(metrics.vulnerable_regions.is_empty());
    }
}
