//! Naive Surface Nets.
//!
//! The field is read through a one-sample border of zeros. Working in that
//! padded grid, cell `(i, j, k)` spans padded samples `(i..=i+1, j..=j+1,
//! k..=k+1)`, and a padded coordinate `p` maps back to voxel coordinate
//! `p - 1`.

// Grid coordinates fit comfortably in f64 and u32
#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]

use mesh_types::{IndexedMesh, Point3, Vector3, Vertex};
use tracing::debug;
use volume_types::ScalarVolume;

/// Cube edges as corner pairs. Corner `n` sits at offset
/// `(n & 1, (n >> 1) & 1, (n >> 2) & 1)`.
const CUBE_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (2, 3),
    (4, 5),
    (6, 7),
    (0, 2),
    (1, 3),
    (4, 6),
    (5, 7),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

struct PaddedField<'a> {
    field: &'a ScalarVolume,
    dims: [usize; 3],
}

impl PaddedField<'_> {
    fn sample(&self, p: [usize; 3]) -> f32 {
        if (0..3).any(|a| p[a] == 0 || p[a] + 1 >= self.dims[a]) {
            0.0
        } else {
            self.field.get(p[0] - 1, p[1] - 1, p[2] - 1)
        }
    }
}

/// Extract the iso-surface of `field` at `iso_level`.
///
/// Samples strictly greater than `iso_level` are inside. Vertex positions
/// are in voxel coordinates scaled by the field's spacing, so axis 0 maps to
/// `x`, axis 1 to `y` and axis 2 to `z`. A field with no inside sample, or
/// with every sample inside an empty grid, yields an empty mesh.
#[must_use]
pub fn surface_nets(field: &ScalarVolume, iso_level: f32) -> IndexedMesh {
    let [nd, nr, nc] = field.shape().dims();
    let padded = PaddedField {
        field,
        dims: [nd + 2, nr + 2, nc + 2],
    };
    let inside = |v: f32| v > iso_level;

    let cells = [nd + 1, nr + 1, nc + 1];
    let cell_index = |c: [usize; 3]| (c[0] * cells[1] + c[1]) * cells[2] + c[2];

    // Dense cell -> vertex table.
    let mut cell_vertex: Vec<Option<u32>> = vec![None; cells.iter().product()];
    let mut positions: Vec<Vector3<f64>> = Vec::new();

    for i in 0..cells[0] {
        for j in 0..cells[1] {
            for k in 0..cells[2] {
                let corner = |n: usize| [i + (n & 1), j + ((n >> 1) & 1), k + ((n >> 2) & 1)];
                let values: [f32; 8] = std::array::from_fn(|n| padded.sample(corner(n)));

                let inside_count = values.iter().filter(|&&v| inside(v)).count();
                if inside_count == 0 || inside_count == 8 {
                    continue;
                }

                let mut sum = Vector3::zeros();
                let mut crossings = 0usize;
                for &(a, b) in &CUBE_EDGES {
                    let (va, vb) = (values[a], values[b]);
                    if inside(va) == inside(vb) {
                        continue;
                    }
                    let t = f64::from((iso_level - va) / (vb - va));
                    let pa = to_vector(corner(a));
                    let pb = to_vector(corner(b));
                    sum += pa + (pb - pa) * t;
                    crossings += 1;
                }

                cell_vertex[cell_index([i, j, k])] = Some(positions.len() as u32);
                positions.push(sum / crossings as f64);
            }
        }
    }

    let mut faces: Vec<[u32; 3]> = Vec::new();
    for axis in 0..3 {
        let (a, b) = ((axis + 1) % 3, (axis + 2) % 3);
        for p0 in 0..padded.dims[0] {
            for p1 in 0..padded.dims[1] {
                for p2 in 0..padded.dims[2] {
                    let p = [p0, p1, p2];
                    if p[axis] + 1 >= padded.dims[axis]
                        || p[a] == 0
                        || p[a] >= cells[a]
                        || p[b] == 0
                        || p[b] >= cells[b]
                    {
                        continue;
                    }
                    let mut q = p;
                    q[axis] += 1;
                    let (v0, v1) = (padded.sample(p), padded.sample(q));
                    if inside(v0) == inside(v1) {
                        continue;
                    }

                    let around = |da: usize, db: usize| {
                        let mut c = p;
                        c[a] -= da;
                        c[b] -= db;
                        cell_vertex[cell_index(c)]
                    };
                    // Counter-clockwise in the (a, b) plane, i.e. facing +axis.
                    let quad = [around(1, 1), around(0, 1), around(0, 0), around(1, 0)];
                    let [Some(q0), Some(q1), Some(q2), Some(q3)] = quad else {
                        continue;
                    };
                    if inside(v0) {
                        faces.push([q0, q1, q2]);
                        faces.push([q0, q2, q3]);
                    } else {
                        faces.push([q0, q2, q1]);
                        faces.push([q0, q3, q2]);
                    }
                }
            }
        }
    }

    let spacing = field.spacing();
    let vertices = positions
        .into_iter()
        .map(|p| {
            let voxel = p - Vector3::new(1.0, 1.0, 1.0);
            Vertex::new(Point3::from(voxel.component_mul(&spacing)))
        })
        .collect();

    let mesh = IndexedMesh::from_parts(vertices, faces);
    debug!(
        vertices = mesh.vertices.len(),
        faces = mesh.faces.len(),
        "Surface nets"
    );
    mesh
}

fn to_vector(p: [usize; 3]) -> Vector3<f64> {
    Vector3::new(p[0] as f64, p[1] as f64, p[2] as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hashbrown::HashMap;
    use mesh_types::MeshTopology;
    use volume_types::{Shape, TissueMask};

    fn field_of(mask: &TissueMask) -> ScalarVolume {
        mask.to_field(Vector3::new(1.0, 1.0, 1.0)).unwrap()
    }

    /// Every undirected edge used by exactly two faces, once in each direction.
    fn assert_closed(mesh: &IndexedMesh) {
        let mut directed: HashMap<(u32, u32), usize> = HashMap::new();
        for f in &mesh.faces {
            for e in [(f[0], f[1]), (f[1], f[2]), (f[2], f[0])] {
                *directed.entry(e).or_insert(0) += 1;
            }
        }
        for (&(u, v), &n) in &directed {
            assert_eq!(n, 1, "edge {u}->{v} used {n} times");
            assert_eq!(directed.get(&(v, u)), Some(&1), "edge {u}->{v} has no twin");
        }
    }

    fn signed_volume(mesh: &IndexedMesh) -> f64 {
        mesh.faces
            .iter()
            .map(|&[a, b, c]| {
                let pa = mesh.vertices[a as usize].position.coords;
                let pb = mesh.vertices[b as usize].position.coords;
                let pc = mesh.vertices[c as usize].position.coords;
                pa.dot(&pb.cross(&pc)) / 6.0
            })
            .sum()
    }

    #[test]
    fn single_voxel_is_closed_and_outward() {
        let mut mask = TissueMask::empty(Shape::new(3, 3, 3));
        mask.set(1, 1, 1, true);
        let mesh = surface_nets(&field_of(&mask), 0.5);

        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 12);
        assert!(mesh.has_valid_indices());
        assert_closed(&mesh);
        assert!(signed_volume(&mesh) > 0.0);
    }

    #[test]
    fn border_touching_tissue_is_closed() {
        let mask = TissueMask::from_fn(Shape::new(4, 5, 3), |_, _, _| true);
        let mesh = surface_nets(&field_of(&mask), 0.5);
        assert!(mesh.vertex_count() > 0);
        assert_closed(&mesh);
        assert!(signed_volume(&mesh) > 0.0);
    }

    #[test]
    fn ball_is_closed() {
        let shape = Shape::new(12, 12, 12);
        let mask = TissueMask::from_fn(shape, |d, r, c| {
            let q = |i: usize| (i as f64 - 5.5).powi(2);
            q(d) + q(r) + q(c) < 16.0
        });
        let mesh = surface_nets(&field_of(&mask), 0.5);
        assert!(mesh.vertex_count() > 0);
        assert_closed(&mesh);
        assert!(signed_volume(&mesh) > 0.0);
    }

    #[test]
    fn binary_field_vertices_average_edge_midpoints() {
        let mut mask = TissueMask::empty(Shape::new(3, 3, 3));
        mask.set(1, 1, 1, true);
        let mesh = surface_nets(&field_of(&mask), 0.5);
        // Each cell crosses three edges at their midpoints, one sixth of a
        // voxel from the cell's inside corner on average.
        for v in &mesh.vertices {
            for coord in [v.position.x, v.position.y, v.position.z] {
                assert!(
                    (coord - 5.0 / 6.0).abs() < 1e-9 || (coord - 7.0 / 6.0).abs() < 1e-9,
                    "unexpected coordinate {coord}"
                );
            }
        }
    }

    #[test]
    fn spacing_scales_positions() {
        let mut mask = TissueMask::empty(Shape::new(3, 3, 3));
        mask.set(1, 1, 1, true);
        let field = mask.to_field(Vector3::new(2.0, 1.0, 0.5)).unwrap();
        let mesh = surface_nets(&field, 0.5);
        let max_x = mesh.positions().map(|p| p.x).fold(f64::MIN, f64::max);
        let max_z = mesh.positions().map(|p| p.z).fold(f64::MIN, f64::max);
        assert_relative_eq!(max_x, 2.0 * 7.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(max_z, 0.5 * 7.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_field_has_no_surface() {
        let field = ScalarVolume::zeros(Shape::new(5, 5, 5));
        assert!(surface_nets(&field, 0.5).is_empty());
    }
}
