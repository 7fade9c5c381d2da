//! Traits for mesh types.

use crate::{Aabb, Vertex};
use nalgebra::Point3;

/// Minimal read access to mesh topology.
pub trait MeshTopology {
    /// Number of vertices.
    fn vertex_count(&self) -> usize;

    /// Number of faces (triangles).
    fn face_count(&self) -> usize;

    /// Check if the mesh has no vertices or no faces.
    fn is_empty(&self) -> bool {
        self.vertex_count() == 0 || self.face_count() == 0
    }

    /// Get a vertex by index.
    fn vertex(&self, index: usize) -> Option<&Vertex>;

    /// Get a face by index as a vertex index triple.
    fn face(&self, index: usize) -> Option<[u32; 3]>;
}

/// Types that can compute a bounding box.
pub trait MeshBounds {
    /// Axis-aligned bounds; empty when there are no vertices.
    fn bounds(&self) -> Aabb;

    /// Bounds, or `None` when empty.
    fn bounds_opt(&self) -> Option<Aabb> {
        let b = self.bounds();
        if b.is_empty() { None } else { Some(b) }
    }

    /// Center of the bounding box.
    fn center(&self) -> Point3<f64> {
        self.bounds().center()
    }
}
