//! Uniform-stride vertex sampling.
//!
//! The surviving vertices form a dense arena in their original order. A
//! sparse survivor table maps each original index to its slot in the arena,
//! and faces are rebuilt through that table.

// Mesh indices are u32 by construction
#![allow(clippy::cast_possible_truncation)]

use mesh_types::IndexedMesh;
use tracing::{debug, info};

use crate::error::{DecimateError, DecimateResult};
use crate::params::DecimateParams;
use crate::result::DecimationResult;

/// Indices sampled at a uniform stride from `0..len`, at most `target` of them.
///
/// The stride is `len / target` (integer division, at least 1), so the first
/// index is always 0 and the sample is spread across the whole range.
///
/// # Example
///
/// ```
/// use mesh_decimate::stride_sample;
///
/// assert_eq!(stride_sample(10, 4), vec![0, 2, 4, 6]);
/// assert_eq!(stride_sample(3, 8), vec![0, 1, 2]);
/// ```
#[must_use]
pub fn stride_sample(len: usize, target: usize) -> Vec<usize> {
    if target == 0 {
        return Vec::new();
    }
    let step = (len / target).max(1);
    (0..len).step_by(step).take(target).collect()
}

/// Reduce a mesh to at most `params.target_vertices` vertices.
///
/// Meshes already within budget are returned unchanged. Otherwise vertices
/// are sampled with [`stride_sample`], and only faces whose three vertices
/// all survive are kept, re-indexed into the sampled vertex array.
///
/// # Errors
///
/// Returns [`DecimateError::InvalidTargetCount`] when the target is zero.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, Vertex, MeshTopology};
/// use mesh_decimate::{decimate_mesh, DecimateParams};
///
/// let mut mesh = IndexedMesh::new();
/// for i in 0..6 {
///     mesh.vertices.push(Vertex::from_coords(f64::from(i), 0.0, 0.0));
/// }
/// mesh.faces.push([0, 1, 2]);
///
/// let result = decimate_mesh(&mesh, &DecimateParams::with_target_vertices(10)).unwrap();
/// assert!(!result.was_decimated());
/// assert_eq!(result.mesh.face_count(), 1);
/// ```
pub fn decimate_mesh(mesh: &IndexedMesh, params: &DecimateParams) -> DecimateResult<DecimationResult> {
    let target = params.target_vertices;
    if target == 0 {
        return Err(DecimateError::InvalidTargetCount(target));
    }

    let original_vertices = mesh.vertices.len();
    if original_vertices <= target {
        debug!(vertices = original_vertices, target, "Mesh within vertex budget");
        return Ok(DecimationResult::unchanged(mesh));
    }

    let survivors = stride_sample(original_vertices, target);

    // Survivor table: original index -> slot in the sampled arena.
    let mut slot: Vec<Option<u32>> = vec![None; original_vertices];
    for (new_index, &old_index) in survivors.iter().enumerate() {
        slot[old_index] = Some(new_index as u32);
    }

    let vertices = survivors
        .iter()
        .map(|&old_index| mesh.vertices[old_index].clone())
        .collect();

    let faces: Vec<[u32; 3]> = mesh
        .faces
        .iter()
        .filter_map(|&[a, b, c]| {
            let remap = |i: u32| slot.get(i as usize).copied().flatten();
            Some([remap(a)?, remap(b)?, remap(c)?])
        })
        .collect();

    let result = DecimationResult {
        original_vertices,
        final_vertices: survivors.len(),
        original_faces: mesh.faces.len(),
        final_faces: faces.len(),
        mesh: IndexedMesh::from_parts(vertices, faces),
    };

    info!(
        vertices = result.final_vertices,
        faces = result.final_faces,
        dropped_faces = result.faces_dropped(),
        "Decimated mesh"
    );

    Ok(result)
}
