//! Result types for decimation operations.

// Vertex counts don't overflow in practice
#![allow(clippy::cast_precision_loss)]

use mesh_types::IndexedMesh;

/// Result of mesh decimation.
#[derive(Debug, Clone)]
pub struct DecimationResult {
    /// The decimated mesh.
    pub mesh: IndexedMesh,

    /// Number of vertices in the original mesh.
    pub original_vertices: usize,

    /// Number of vertices in the decimated mesh.
    pub final_vertices: usize,

    /// Number of faces in the original mesh.
    pub original_faces: usize,

    /// Number of faces in the decimated mesh.
    pub final_faces: usize,
}

impl DecimationResult {
    /// Result for a mesh that was already within budget.
    #[must_use]
    pub fn unchanged(mesh: &IndexedMesh) -> Self {
        Self {
            mesh: mesh.clone(),
            original_vertices: mesh.vertices.len(),
            final_vertices: mesh.vertices.len(),
            original_faces: mesh.faces.len(),
            final_faces: mesh.faces.len(),
        }
    }

    /// Fraction of vertices kept (final / original).
    #[must_use]
    pub fn vertex_ratio(&self) -> f64 {
        if self.original_vertices == 0 {
            1.0
        } else {
            self.final_vertices as f64 / self.original_vertices as f64
        }
    }

    /// Number of faces discarded because they touched a dropped vertex.
    #[must_use]
    pub const fn faces_dropped(&self) -> usize {
        self.original_faces.saturating_sub(self.final_faces)
    }

    /// Check if any vertex was removed.
    #[must_use]
    pub const fn was_decimated(&self) -> bool {
        self.final_vertices < self.original_vertices
    }
}

impl std::fmt::Display for DecimationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Decimation: {} → {} vertices, {} → {} faces ({:.1}% of vertices kept)",
            self.original_vertices,
            self.final_vertices,
            self.original_faces,
            self.final_faces,
            self.vertex_ratio() * 100.0
        )
    }
}
