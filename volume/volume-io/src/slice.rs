//! Slice ordering and stacking, independent of the file format.

use std::path::PathBuf;

use tracing::{debug, warn};
use volume_types::{ScalarVolume, Shape, Vector3};

use crate::error::{VolumeIoError, VolumeIoResult};

/// Spacing used when a study carries no usable spacing metadata.
pub const DEFAULT_SPACING_MM: f64 = 1.0;

/// How the slices of a stack were put in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceOrdering {
    /// Sorted by the z component of the patient position.
    Position,
    /// Sorted by instance number.
    InstanceNumber,
    /// No ordering key was available on every slice; input order was kept.
    Unordered,
}

/// One decoded 2D slice with the metadata needed to stack it.
#[derive(Debug, Clone)]
pub(crate) struct Slice {
    pub path: PathBuf,
    pub rows: usize,
    pub cols: usize,
    /// Rescaled samples, row-major.
    pub pixels: Vec<f32>,
    pub position_z: Option<f64>,
    pub instance: Option<i64>,
    /// `(row, col)` spacing in millimetres.
    pub pixel_spacing: Option<(f64, f64)>,
    pub thickness: Option<f64>,
}

/// Order slices and stack them into a volume.
///
/// Empty slices are dropped; slices whose dimensions differ from the first
/// remaining slice are skipped.
pub(crate) fn stack_slices(slices: Vec<Slice>) -> VolumeIoResult<(ScalarVolume, SliceOrdering)> {
    let slices: Vec<Slice> = slices
        .into_iter()
        .filter(|s| {
            let empty = s.rows == 0 || s.cols == 0;
            if empty {
                warn!(path = %s.path.display(), "Skipping empty slice");
            }
            !empty
        })
        .collect();
    let Some(first) = slices.first() else {
        return Err(VolumeIoError::empty("no readable slices"));
    };
    let (rows, cols) = (first.rows, first.cols);

    let mut slices: Vec<Slice> = slices
        .into_iter()
        .filter(|s| {
            let ok = s.rows == rows && s.cols == cols;
            if !ok {
                warn!(
                    path = %s.path.display(),
                    expected = %format!("{rows}x{cols}"),
                    got = %format!("{}x{}", s.rows, s.cols),
                    "Skipping slice with mismatched dimensions"
                );
            }
            ok
        })
        .collect();

    let ordering = order_slices(&mut slices);
    let spacing = stack_spacing(&slices, ordering);

    let depth = slices.len();
    let mut values = Vec::with_capacity(depth * rows * cols);
    for slice in slices {
        values.extend(slice.pixels);
    }

    debug!(depth, rows, cols, ?ordering, "Stacked slices");
    let volume = ScalarVolume::new(Shape::new(depth, rows, cols), values, spacing)?;
    Ok((volume, ordering))
}

fn order_slices(slices: &mut [Slice]) -> SliceOrdering {
    if slices.iter().all(|s| s.position_z.is_some()) {
        slices.sort_by(|a, b| {
            let za = a.position_z.unwrap_or_default();
            let zb = b.position_z.unwrap_or_default();
            za.total_cmp(&zb)
        });
        SliceOrdering::Position
    } else if slices.iter().all(|s| s.instance.is_some()) {
        slices.sort_by_key(|s| s.instance);
        SliceOrdering::InstanceNumber
    } else {
        warn!(slices = slices.len(), "Slices carry no ordering key; keeping input order");
        SliceOrdering::Unordered
    }
}

/// Spacing along `(depth, rows, cols)`.
fn stack_spacing(slices: &[Slice], ordering: SliceOrdering) -> Vector3<f64> {
    let usable = |v: f64| v.is_finite() && v > 0.0;
    let first = slices.first();

    let (row, col) = first
        .and_then(|s| s.pixel_spacing)
        .filter(|&(r, c)| usable(r) && usable(c))
        .unwrap_or((DEFAULT_SPACING_MM, DEFAULT_SPACING_MM));

    let from_positions = if ordering == SliceOrdering::Position {
        slices
            .windows(2)
            .filter_map(|w| Some((w[1].position_z? - w[0].position_z?).abs()))
            .find(|&d| usable(d))
    } else {
        None
    };
    let depth = from_positions
        .or_else(|| first.and_then(|s| s.thickness).filter(|&t| usable(t)))
        .unwrap_or(DEFAULT_SPACING_MM);

    Vector3::new(depth, row, col)
}
