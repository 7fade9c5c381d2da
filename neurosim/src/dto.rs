//! Serializable outputs.
//!
//! These mirror the pipeline's results in plain arrays so they can be
//! written as JSON without exposing the geometry types.

use std::collections::BTreeMap;

use mesh_types::{IndexedMesh, Point3, Vertex, VertexAttributes, VertexColor};
use serde::{Deserialize, Serialize};
use sim_resection::{DeformationResult, SimulationMetrics};
use tissue_label::TissueClass;

use crate::pipeline::Reconstruction;

/// A mesh as flat arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    /// Vertex positions.
    pub vertices: Vec<[f64; 3]>,
    /// Triangles as vertex index triples.
    pub faces: Vec<[u32; 3]>,
    /// Tissue label per vertex, when every vertex has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<u8>>,
    /// RGB colour per vertex, when every vertex has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<[f32; 3]>>,
}

impl From<&IndexedMesh> for MeshData {
    fn from(mesh: &IndexedMesh) -> Self {
        Self {
            vertices: mesh.positions().map(|p| [p.x, p.y, p.z]).collect(),
            faces: mesh.faces.clone(),
            labels: mesh.labels(),
            colors: mesh
                .colors()
                .map(|colors| colors.into_iter().map(VertexColor::to_array).collect()),
        }
    }
}

impl From<&MeshData> for IndexedMesh {
    /// Label and colour arrays whose length differs from the vertex count
    /// are ignored.
    fn from(data: &MeshData) -> Self {
        let n = data.vertices.len();
        let labels = data.labels.as_ref().filter(|l| l.len() == n);
        let colors = data.colors.as_ref().filter(|c| c.len() == n);
        let vertices = data
            .vertices
            .iter()
            .enumerate()
            .map(|(i, &p)| Vertex {
                position: Point3::from(p),
                attributes: VertexAttributes {
                    label: labels.map(|l| l[i]),
                    color: colors.map(|c| VertexColor::from(c[i])),
                },
            })
            .collect();
        Self::from_parts(vertices, data.faces.clone())
    }
}

/// Result of segmenting a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationOutput {
    /// The labelled display mesh.
    pub mesh_data: MeshData,
    /// Name of every tissue label.
    pub label_names: BTreeMap<u8, String>,
    /// `reconstructed` or `fallback`.
    pub source: String,
    /// Why the phantom was used, if it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

impl From<&Reconstruction> for SegmentationOutput {
    fn from(reconstruction: &Reconstruction) -> Self {
        Self {
            mesh_data: MeshData::from(&reconstruction.mesh),
            label_names: label_names(),
            source: reconstruction.source.kind().to_string(),
            fallback_reason: reconstruction.source.fallback_reason().map(str::to_string),
        }
    }
}

/// Result of a resection simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    /// Mesh after collapse.
    pub deformed_mesh: MeshData,
    /// Pseudo-stress per vertex, in kPa.
    pub stress: Vec<f64>,
    /// Aggregate metrics.
    pub metrics: SimulationMetrics,
}

impl From<&DeformationResult> for SimulationOutput {
    fn from(result: &DeformationResult) -> Self {
        Self {
            deformed_mesh: MeshData::from(&result.mesh),
            stress: result.stress.clone(),
            metrics: result.metrics.clone(),
        }
    }
}

/// Numeric label to class name for every tissue class.
#[must_use]
pub fn label_names() -> BTreeMap<u8, String> {
    TissueClass::ALL
        .iter()
        .map(|class| (class.label(), class.name().to_string()))
        .collect()
}
