//! The collapse model.

// Vertex counts don't overflow in practice
#![allow(clippy::cast_precision_loss)]

use mesh_types::{IndexedMesh, Point3, Vector3};
use tissue_label::{TissueClass, REMOVED_COLOR};
use tracing::{debug, info};

use crate::error::{SimError, SimResult};
use crate::metrics::{metrics_from_fields, SimulationMetrics};
use crate::params::SimulationParams;

/// Output of [`simulate`].
#[derive(Debug, Clone)]
pub struct DeformationResult {
    /// Mesh with displaced vertices. Faces and labels are unchanged; the
    /// removed region is repainted.
    pub mesh: IndexedMesh,

    /// Pseudo-stress per vertex, in kPa.
    pub stress: Vec<f64>,

    /// Displacement magnitude per vertex, in mesh units.
    pub displacement: Vec<f64>,

    /// Centroid the tissue collapsed toward.
    pub centroid: Point3<f64>,

    /// Whether the centroid came from `fallback_centroid`.
    pub used_fallback_centroid: bool,

    /// Aggregate metrics.
    pub metrics: SimulationMetrics,
}

/// Centroid of the vertices labelled `region`, or `None` when there are none.
#[must_use]
pub fn region_centroid(mesh: &IndexedMesh, region: TissueClass) -> Option<Point3<f64>> {
    let (sum, count) = mesh
        .vertices
        .iter()
        .filter(|v| v.label() == Some(region.label()))
        .fold((Vector3::zeros(), 0usize), |(sum, n), v| {
            (sum + v.position.coords, n + 1)
        });
    (count > 0).then(|| Point3::from(sum / count as f64))
}

/// Simulate collapse of the surrounding tissue after removing
/// `params.target_region`.
///
/// Skull vertices stay fixed with zero stress. Every other vertex, labelled
/// or not, moves toward the region centroid by
/// `max_displacement · exp(-d / decay_factor)`; a vertex exactly at the
/// centroid has no direction and stays put. Stress is displacement times
/// `stress_factor`.
///
/// # Errors
///
/// - [`SimError::EmptyMesh`] if the mesh has no vertices.
/// - [`SimError::InvalidConfig`] if the parameters fail validation.
pub fn simulate(mesh: &IndexedMesh, params: &SimulationParams) -> SimResult<DeformationResult> {
    if mesh.vertices.is_empty() {
        return Err(SimError::EmptyMesh);
    }
    params.validate()?;

    let (centroid, used_fallback_centroid) = match region_centroid(mesh, params.target_region) {
        Some(c) => (c, false),
        None => {
            debug!(region = %params.target_region, "No vertices in target region, using fallback centroid");
            (params.fallback_centroid, true)
        }
    };

    let mut deformed = mesh.clone();
    let mut displacement = Vec::with_capacity(mesh.vertices.len());
    let mut stress = Vec::with_capacity(mesh.vertices.len());

    for vertex in &mut deformed.vertices {
        let class = vertex.label().and_then(|l| TissueClass::try_from(l).ok());
        if class == Some(params.target_region) {
            vertex.attributes.color = Some(REMOVED_COLOR);
        }
        if class.is_some_and(TissueClass::is_rigid) {
            displacement.push(0.0);
            stress.push(0.0);
            continue;
        }

        let offset = centroid - vertex.position;
        let distance = offset.norm();
        let magnitude = params.max_displacement * (-distance / params.decay_factor).exp();
        if distance > 0.0 {
            vertex.position += offset / distance * magnitude;
        }

        displacement.push(magnitude);
        stress.push(magnitude * params.stress_factor);
    }

    let metrics = metrics_from_fields(&displacement, &stress, params);
    info!(
        vertices = deformed.vertices.len(),
        centroid = ?centroid.coords.as_slice(),
        fallback = used_fallback_centroid,
        max_displacement_mm = metrics.max_displacement_mm,
        avg_stress_kpa = metrics.avg_stress_kpa,
        "Resection simulated"
    );

    Ok(DeformationResult {
        mesh: deformed,
        stress,
        displacement,
        centroid,
        used_fallback_centroid,
        metrics,
    })
}
