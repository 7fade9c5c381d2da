//! Intensity-ladder vertex labelling.

// Grid indices come from a clamped, non-negative product
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

use mesh_types::{IndexedMesh, MeshTopology, Point3, VertexColor};
use tracing::{debug, info};
use volume_types::{ScalarVolume, NORMALIZE_EPSILON};

use crate::class::TissueClass;
use crate::error::{LabelError, LabelResult};

/// Outcome of one rung of the intensity ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LadderRung {
    /// Always this class.
    Class(TissueClass),
    /// `inside` when every coordinate of the vertex is strictly positive,
    /// otherwise `outside`.
    Octant {
        /// Class for the positive octant.
        inside: TissueClass,
        /// Class everywhere else.
        outside: TissueClass,
    },
}

impl LadderRung {
    fn resolve(self, position: &Point3<f64>) -> TissueClass {
        match self {
            Self::Class(class) => class,
            Self::Octant { inside, outside } => {
                if position.x > 0.0 && position.y > 0.0 && position.z > 0.0 {
                    inside
                } else {
                    outside
                }
            }
        }
    }
}

/// Ordered `(lower bound, rung)` table. The first rung whose bound the
/// sampled intensity strictly exceeds wins; below every bound the vertex is
/// skull.
pub const INTENSITY_LADDER: [(f32, LadderRung); 3] = [
    (0.7, LadderRung::Class(TissueClass::WhiteMatter)),
    (0.4, LadderRung::Class(TissueClass::GreyMatter)),
    (
        0.2,
        LadderRung::Octant {
            inside: TissueClass::Tumor,
            outside: TissueClass::GreyMatter,
        },
    ),
];

const BELOW_LADDER: TissueClass = TissueClass::SkullCsf;

fn classify(intensity: f32, position: &Point3<f64>) -> TissueClass {
    INTENSITY_LADDER
        .iter()
        .find(|(bound, _)| intensity > *bound)
        .map_or(BELOW_LADDER, |(_, rung)| rung.resolve(position))
}

/// Label each vertex from the intensity at its position in `volume`.
///
/// Positions are min-max normalized per axis into the unit cube, so the
/// mesh may live in any coordinate frame as long as its axes follow the
/// volume's `(depth, rows, cols)` order. The octant rule reads the
/// original, un-normalized coordinates.
#[must_use]
pub fn label(positions: &[Point3<f64>], volume: &ScalarVolume) -> Vec<TissueClass> {
    if positions.is_empty() || volume.is_empty() {
        return vec![BELOW_LADDER; positions.len()];
    }

    let mut lo = positions[0].coords;
    let mut hi = lo;
    for p in positions {
        lo = lo.inf(&p.coords);
        hi = hi.sup(&p.coords);
    }
    let range = hi - lo;

    let dims = volume.shape().dims();
    let index = |u: f64, n: usize| {
        let i = (u * (n - 1) as f64).trunc();
        (i.max(0.0) as usize).min(n - 1)
    };

    let labels: Vec<TissueClass> = positions
        .iter()
        .map(|p| {
            let u = |axis: usize| (p[axis] - lo[axis]) / (range[axis] + f64::from(NORMALIZE_EPSILON));
            let intensity = volume.get(
                index(u(0), dims[0]),
                index(u(1), dims[1]),
                index(u(2), dims[2]),
            );
            classify(intensity, p)
        })
        .collect();

    debug!(vertices = labels.len(), "Labelled vertices");
    labels
}

/// Display colour for each label.
#[must_use]
pub fn assign_colors(labels: &[TissueClass]) -> Vec<VertexColor> {
    labels.iter().map(|class| class.color()).collect()
}

/// Write label and colour into every vertex of `mesh`.
///
/// # Errors
///
/// Returns [`LabelError::LengthMismatch`] unless there is exactly one label
/// per vertex.
pub fn apply_labels(mesh: &mut IndexedMesh, labels: &[TissueClass]) -> LabelResult<()> {
    if labels.len() != mesh.vertex_count() {
        return Err(LabelError::LengthMismatch {
            labels: labels.len(),
            vertices: mesh.vertex_count(),
        });
    }
    for (vertex, &class) in mesh.vertices.iter_mut().zip(labels) {
        vertex.attributes.label = Some(class.label());
        vertex.attributes.color = Some(class.color());
    }
    Ok(())
}

/// Label a mesh against `volume` in place and return the labels.
pub fn label_mesh(mesh: &mut IndexedMesh, volume: &ScalarVolume) -> Vec<TissueClass> {
    let positions: Vec<Point3<f64>> = mesh.positions().copied().collect();
    let labels = label(&positions, volume);
    for (vertex, &class) in mesh.vertices.iter_mut().zip(&labels) {
        vertex.attributes.label = Some(class.label());
        vertex.attributes.color = Some(class.color());
    }
    info!(
        vertices = labels.len(),
        tumor = labels.iter().filter(|&&c| c == TissueClass::Tumor).count(),
        "Mesh labelled"
    );
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::Vertex;
    use volume_types::Shape;

    fn constant(value: f32) -> ScalarVolume {
        ScalarVolume::from_fn(Shape::new(4, 4, 4), |_, _, _| value)
    }

    #[test]
    fn ladder_boundaries_are_strict() {
        let origin = Point3::new(1.0, 1.0, 1.0);
        assert_eq!(classify(0.71, &origin), TissueClass::WhiteMatter);
        assert_eq!(classify(0.7, &origin), TissueClass::GreyMatter);
        assert_eq!(classify(0.4, &origin), TissueClass::Tumor);
        assert_eq!(classify(0.2, &origin), TissueClass::SkullCsf);
        assert_eq!(classify(f32::NAN, &origin), TissueClass::SkullCsf);
    }

    #[test]
    fn octant_split_uses_raw_coordinates() {
        let volume = constant(0.3);
        let points = [
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(-1.0, 1.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
        ];
        assert_eq!(
            label(&points, &volume),
            vec![TissueClass::Tumor, TissueClass::GreyMatter, TissueClass::GreyMatter]
        );
    }

    #[test]
    fn vertices_map_to_volume_corners() {
        // Only the far corner is bright.
        let volume = ScalarVolume::from_fn(Shape::new(3, 3, 3), |d, r, c| {
            if (d, r, c) == (2, 2, 2) { 0.9 } else { 0.0 }
        });
        let points = [Point3::new(-5.0, -5.0, -5.0), Point3::new(5.0, 5.0, 5.0)];
        // u = 1 - tiny, so the far vertex truncates to index 1, not 2.
        assert_eq!(label(&points, &volume), vec![TissueClass::SkullCsf; 2]);

        let volume = ScalarVolume::from_fn(Shape::new(3, 3, 3), |d, r, c| {
            if (d, r, c) == (1, 1, 1) { 0.9 } else { 0.0 }
        });
        assert_eq!(
            label(&points, &volume),
            vec![TissueClass::SkullCsf, TissueClass::WhiteMatter]
        );
    }

    #[test]
    fn empty_input() {
        assert!(label(&[], &constant(0.9)).is_empty());
    }

    #[test]
    fn apply_labels_checks_length() {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));

        let err = apply_labels(&mut mesh, &[TissueClass::Tumor]).unwrap_err();
        assert!(matches!(err, LabelError::LengthMismatch { labels: 1, vertices: 2 }));

        apply_labels(&mut mesh, &[TissueClass::Tumor, TissueClass::SkullCsf]).unwrap();
        assert_eq!(mesh.labels(), Some(vec![3, 0]));
        assert_eq!(
            mesh.colors(),
            Some(assign_colors(&[TissueClass::Tumor, TissueClass::SkullCsf]))
        );
    }

    #[test]
    fn label_mesh_writes_attributes() {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(2.0, 2.0, 2.0));
        let labels = label_mesh(&mut mesh, &constant(0.5));
        assert_eq!(labels, vec![TissueClass::GreyMatter; 2]);
        assert_eq!(mesh.labels(), Some(vec![2, 2]));
    }
}
