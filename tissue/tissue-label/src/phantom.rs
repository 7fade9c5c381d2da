//! Synthetic labelled brain phantom.
//!
//! A noisy sphere sampled on a latitude/longitude grid, with tissue shells
//! assigned by radius and a tumor pocket in the positive octant of the core.
//! Stands in for a reconstructed mesh whenever no usable volume exists.

// Grid indices fit in u32 and f64
#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

use std::f64::consts::PI;

use mesh_types::{IndexedMesh, Point3, Vertex};
use rand::prelude::*;
use rand_distr::Normal;
use tracing::info;

use crate::class::TissueClass;
use crate::error::{LabelError, LabelResult};

/// Parameters for the phantom mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PhantomParams {
    /// Sphere radius. Default: 5.0
    pub radius: f64,

    /// Samples along each of the polar and azimuthal angles. Default: 30
    pub resolution: usize,

    /// Standard deviation of the per-axis Gaussian jitter. Default: 0.2
    pub noise_std: f64,

    /// Radius above which a vertex is skull. Default: 4.5
    pub skull_radius: f64,

    /// Radius above which a vertex is white matter. Default: 3.5
    pub white_radius: f64,

    /// Radius above which a vertex is grey matter; the core below it holds
    /// the tumor pocket. Default: 2.0
    pub grey_radius: f64,

    /// Optional seed for reproducible meshes.
    pub seed: Option<u64>,
}

impl Default for PhantomParams {
    fn default() -> Self {
        Self {
            radius: 5.0,
            resolution: 30,
            noise_std: 0.2,
            skull_radius: 4.5,
            white_radius: 3.5,
            grey_radius: 2.0,
            seed: None,
        }
    }
}

impl PhantomParams {
    /// Set a random seed for reproducibility.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the grid resolution.
    #[must_use]
    pub const fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    /// Tissue class of a phantom vertex, from its radius and octant.
    #[must_use]
    pub fn classify(&self, p: &Point3<f64>) -> TissueClass {
        let r = p.coords.norm();
        if r > self.skull_radius {
            TissueClass::SkullCsf
        } else if r > self.white_radius {
            TissueClass::WhiteMatter
        } else if r > self.grey_radius {
            TissueClass::GreyMatter
        } else if p.x > 0.0 && p.y > 0.0 && p.z > 0.0 {
            TissueClass::Tumor
        } else {
            TissueClass::GreyMatter
        }
    }
}

/// Generate the phantom, seeded from `params.seed` or from entropy.
///
/// # Errors
///
/// Returns [`LabelError::InvalidNoise`] if `noise_std` is negative or not
/// finite.
///
/// # Example
///
/// ```
/// use mesh_types::MeshTopology;
/// use tissue_label::phantom::{generate, PhantomParams};
///
/// let mesh = generate(&PhantomParams::default().with_seed(7)).unwrap();
/// assert_eq!(mesh.vertex_count(), 900);
/// assert_eq!(mesh.face_count(), 1682);
/// ```
pub fn generate(params: &PhantomParams) -> LabelResult<IndexedMesh> {
    match params.seed {
        Some(seed) => generate_with_rng(params, &mut StdRng::seed_from_u64(seed)),
        None => generate_with_rng(params, &mut thread_rng()),
    }
}

/// Generate the phantom drawing jitter from `rng`.
///
/// Vertex `(i, j)` sits at polar angle `i·π/(n-1)` and azimuth
/// `j·2π/(n-1)`, stored at index `i·n + j`. Each grid quad yields the
/// triangles `[v(i,j), v(i+1,j), v(i,j+1)]` and
/// `[v(i+1,j), v(i+1,j+1), v(i,j+1)]`.
///
/// # Errors
///
/// Returns [`LabelError::InvalidNoise`] if `noise_std` is negative or not
/// finite.
pub fn generate_with_rng<R: Rng + ?Sized>(
    params: &PhantomParams,
    rng: &mut R,
) -> LabelResult<IndexedMesh> {
    if !params.noise_std.is_finite() {
        return Err(LabelError::InvalidNoise(params.noise_std));
    }
    let noise = Normal::new(0.0, params.noise_std)
        .map_err(|_| LabelError::InvalidNoise(params.noise_std))?;

    let n = params.resolution;
    let angle = |k: usize, max: f64| {
        if n > 1 {
            k as f64 * max / (n - 1) as f64
        } else {
            0.0
        }
    };

    let mut mesh = IndexedMesh::with_capacity(n * n, 2 * n.saturating_sub(1).pow(2));
    for i in 0..n {
        let phi = angle(i, PI);
        for j in 0..n {
            let theta = angle(j, 2.0 * PI);
            let position = Point3::new(
                params.radius * phi.sin() * theta.cos() + noise.sample(rng),
                params.radius * phi.sin() * theta.sin() + noise.sample(rng),
                params.radius * phi.cos() + noise.sample(rng),
            );
            let class = params.classify(&position);
            mesh.vertices
                .push(Vertex::labeled(position, class.label(), class.color()));
        }
    }

    let v = |i: usize, j: usize| (i * n + j) as u32;
    for i in 0..n.saturating_sub(1) {
        for j in 0..n - 1 {
            mesh.faces.push([v(i, j), v(i + 1, j), v(i, j + 1)]);
            mesh.faces.push([v(i + 1, j), v(i + 1, j + 1), v(i, j + 1)]);
        }
    }

    info!(
        vertices = mesh.vertices.len(),
        faces = mesh.faces.len(),
        "Generated phantom mesh"
    );
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::MeshTopology;

    fn seeded(seed: u64) -> IndexedMesh {
        generate(&PhantomParams::default().with_seed(seed)).unwrap()
    }

    #[test]
    fn default_grid_counts() {
        let mesh = seeded(1);
        assert_eq!(mesh.vertex_count(), 900);
        assert_eq!(mesh.face_count(), 1682);
        assert!(mesh.has_valid_indices());
        assert_eq!(mesh.labels().map(|l| l.len()), Some(900));
        assert_eq!(mesh.colors().map(|c| c.len()), Some(900));
    }

    #[test]
    fn labels_follow_radius_shells() {
        let params = PhantomParams::default().with_seed(99);
        let mesh = generate(&params).unwrap();
        for v in &mesh.vertices {
            let class = TissueClass::try_from(v.label().unwrap()).unwrap();
            assert_eq!(class, params.classify(&v.position));
            assert_eq!(v.color(), Some(class.color()));
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        assert_eq!(seeded(42), seeded(42));
        assert_ne!(seeded(42), seeded(43));
    }

    #[test]
    fn noiseless_sphere_is_all_skull() {
        let params = PhantomParams {
            noise_std: 0.0,
            ..PhantomParams::default()
        };
        let mesh = generate(&params).unwrap();
        // Every vertex sits on radius 5 > 4.5.
        assert!(mesh.labels().unwrap().iter().all(|&l| l == 0));
    }

    #[test]
    fn core_classification() {
        let params = PhantomParams::default();
        assert_eq!(params.classify(&Point3::new(1.0, 1.0, 1.0)), TissueClass::Tumor);
        assert_eq!(params.classify(&Point3::new(-1.0, 1.0, 1.0)), TissueClass::GreyMatter);
        assert_eq!(params.classify(&Point3::new(3.0, 0.0, 0.0)), TissueClass::GreyMatter);
        assert_eq!(params.classify(&Point3::new(4.0, 0.0, 0.0)), TissueClass::WhiteMatter);
        assert_eq!(params.classify(&Point3::new(0.0, 0.0, 4.6)), TissueClass::SkullCsf);
    }

    #[test]
    fn invalid_noise_is_rejected() {
        let params = PhantomParams {
            noise_std: -1.0,
            ..PhantomParams::default()
        };
        assert!(matches!(generate(&params), Err(LabelError::InvalidNoise(_))));
    }

    #[test]
    fn degenerate_resolution() {
        let mesh = generate(&PhantomParams::default().with_resolution(1).with_seed(0)).unwrap();
        assert_eq!(mesh.vertex_count(), 1);
        assert_eq!(mesh.face_count(), 0);
    }
}
