//! Indexed triangle mesh.

use crate::{Aabb, MeshBounds, MeshTopology, Vertex, VertexColor};
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh.
///
/// Vertices and faces are stored separately, with faces referencing
/// vertices by index. Every face index must be smaller than the vertex
/// count; producers in this workspace uphold that and
/// [`IndexedMesh::has_valid_indices`] checks it.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, Vertex, MeshTopology};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexedMesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangle faces as indices into the vertex array.
    pub faces: Vec<[u32; 3]>,
}

impl IndexedMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Vertex>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Check that every face index refers to an existing vertex.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{IndexedMesh, Vertex};
    ///
    /// let mut mesh = IndexedMesh::new();
    /// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
    /// mesh.faces.push([0, 0, 1]);
    /// assert!(!mesh.has_valid_indices());
    /// ```
    #[must_use]
    pub fn has_valid_indices(&self) -> bool {
        let n = self.vertices.len();
        self.faces
            .iter()
            .flatten()
            .all(|&index| (index as usize) < n)
    }

    /// Vertex positions in order.
    pub fn positions(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.vertices.iter().map(|v| &v.position)
    }

    /// Per-vertex labels, present only when every vertex is labelled.
    ///
    /// An empty mesh reports `None`.
    #[must_use]
    pub fn labels(&self) -> Option<Vec<u8>> {
        if self.vertices.is_empty() {
            return None;
        }
        self.vertices.iter().map(Vertex::label).collect()
    }

    /// Per-vertex colours, present only when every vertex is coloured.
    ///
    /// An empty mesh reports `None`.
    #[must_use]
    pub fn colors(&self) -> Option<Vec<VertexColor>> {
        if self.vertices.is_empty() {
            return None;
        }
        self.vertices.iter().map(Vertex::color).collect()
    }

    /// Mean vertex position, or `None` for a mesh without vertices.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn centroid(&self) -> Option<Point3<f64>> {
        if self.vertices.is_empty() {
            return None;
        }
        let sum: Vector3<f64> = self.positions().map(|p| p.coords).sum();
        Some(Point3::from(sum / self.vertices.len() as f64))
    }

    /// Translate mesh by the given vector.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for vertex in &mut self.vertices {
            vertex.position += offset;
        }
    }

    /// Scale mesh uniformly around the origin.
    pub fn scale(&mut self, factor: f64) {
        for vertex in &mut self.vertices {
            vertex.position.coords *= factor;
        }
    }

    /// Move the vertex centroid to the origin and scale uniformly so the
    /// largest bounding-box extent equals `size`.
    ///
    /// A mesh whose extent is zero is only re-centred.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{IndexedMesh, Vertex, MeshBounds};
    ///
    /// let mut mesh = IndexedMesh::new();
    /// mesh.vertices.push(Vertex::from_coords(10.0, 10.0, 10.0));
    /// mesh.vertices.push(Vertex::from_coords(14.0, 11.0, 10.0));
    /// mesh.fit_to_extent(10.0);
    ///
    /// assert!((mesh.bounds().max_extent() - 10.0).abs() < 1e-12);
    /// ```
    pub fn fit_to_extent(&mut self, size: f64) {
        let Some(centroid) = self.centroid() else {
            return;
        };
        self.translate(-centroid.coords);

        let extent = self.bounds().max_extent();
        if extent > f64::EPSILON {
            self.scale(size / extent);
        }
    }
}

impl MeshTopology for IndexedMesh {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    fn face(&self, index: usize) -> Option<[u32; 3]> {
        self.faces.get(index).copied()
    }
}

impl MeshBounds for IndexedMesh {
    fn bounds(&self) -> Aabb {
        Aabb::from_points(self.positions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn triangle() -> IndexedMesh {
        IndexedMesh::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(3.0, 0.0, 0.0),
                Vertex::from_coords(0.0, 6.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
    }

    #[test]
    fn mesh_is_empty() {
        let mesh = IndexedMesh::new();
        assert!(mesh.is_empty());

        let mut mesh2 = IndexedMesh::new();
        mesh2.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        assert!(mesh2.is_empty()); // no faces
    }

    #[test]
    fn valid_indices() {
        let mut mesh = triangle();
        assert!(mesh.has_valid_indices());
        mesh.faces.push([0, 1, 3]);
        assert!(!mesh.has_valid_indices());
    }

    #[test]
    fn centroid_is_mean() {
        let c = triangle().centroid().unwrap();
        assert_relative_eq!(c.x, 1.0);
        assert_relative_eq!(c.y, 2.0);
        assert!(IndexedMesh::new().centroid().is_none());
    }

    #[test]
    fn labels_require_every_vertex() {
        let mut mesh = triangle();
        assert!(mesh.labels().is_none());

        let grey = VertexColor::from_rgb(0.7, 0.7, 0.75);
        mesh.vertices[0].attributes.label = Some(1);
        mesh.vertices[1].attributes.label = Some(2);
        assert!(mesh.labels().is_none());

        mesh.vertices[2].attributes.label = Some(2);
        assert_eq!(mesh.labels(), Some(vec![1, 2, 2]));
        assert!(mesh.colors().is_none());

        for v in &mut mesh.vertices {
            v.attributes.color = Some(grey);
        }
        assert_eq!(mesh.colors().map(|c| c.len()), Some(3));
    }

    #[test]
    fn fit_to_extent_centres_and_scales() {
        let mut mesh = triangle();
        mesh.fit_to_extent(10.0);

        let c = mesh.centroid().unwrap();
        assert_relative_eq!(c.coords.norm(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(mesh.bounds().max_extent(), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn fit_to_extent_degenerate() {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(4.0, 4.0, 4.0));
        mesh.fit_to_extent(10.0);
        assert_relative_eq!(mesh.vertices[0].position.x, 0.0);
    }

    #[test]
    fn serde_roundtrip_keeps_attributes() {
        let mut mesh = triangle();
        mesh.vertices[0].attributes.label = Some(3);
        let json = serde_json::to_string(&mesh).unwrap();
        let back: IndexedMesh = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mesh);
    }
}
