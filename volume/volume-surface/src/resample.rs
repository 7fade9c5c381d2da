//! Grid resampling ahead of extraction.
//!
//! Output sample `o` along an axis of input length `n` and output length `m`
//! reads input coordinate `o * (n - 1) / (m - 1)`, so the first and last
//! samples of both grids coincide.

#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

use volume_types::{ScalarVolume, Shape, TissueMask, Vector3};

use crate::error::SurfaceResult;

/// Shape after resampling so no axis exceeds `max_dim`, or `None` when the
/// shape already fits.
///
/// Every axis is scaled by the same factor `max_dim / max(shape)` and
/// rounded, never dropping below one sample.
///
/// # Example
///
/// ```
/// use volume_surface::resampled_shape;
/// use volume_types::Shape;
///
/// assert_eq!(resampled_shape(Shape::new(20, 200, 100), 128), Some(Shape::new(13, 128, 64)));
/// assert_eq!(resampled_shape(Shape::new(20, 20, 20), 128), None);
/// ```
#[must_use]
pub fn resampled_shape(shape: Shape, max_dim: usize) -> Option<Shape> {
    let largest = shape.max_dim();
    if largest <= max_dim || largest == 0 {
        return None;
    }
    let factor = (max_dim as f64 / largest as f64).min(1.0);
    let scale = |n: usize| ((n as f64 * factor).round() as usize).max(1);
    Some(Shape::new(
        scale(shape.depth),
        scale(shape.rows),
        scale(shape.cols),
    ))
}

fn source_coord(o: usize, input: usize, output: usize) -> f64 {
    if output <= 1 {
        0.0
    } else {
        o as f64 * (input - 1) as f64 / (output - 1) as f64
    }
}

/// Trilinear resampling of an intensity field onto `target`.
///
/// Spacing grows by `input / output` along each axis so the physical
/// extent is preserved.
///
/// # Errors
///
/// Returns [`crate::SurfaceError::Volume`] if the derived spacing is
/// unusable, which only happens for an empty input.
pub fn resample_linear(field: &ScalarVolume, target: Shape) -> SurfaceResult<ScalarVolume> {
    let source = field.shape();
    let [sd, sr, sc] = source.dims();

    let axis = |o: usize, input: usize, output: usize| {
        let x = source_coord(o, input, output);
        let lo = (x.floor() as usize).min(input.saturating_sub(1));
        let hi = (lo + 1).min(input.saturating_sub(1));
        (lo, hi, (x - lo as f64) as f32)
    };

    let resampled = ScalarVolume::from_fn(target, |d, r, c| {
        let (d0, d1, td) = axis(d, sd, target.depth);
        let (r0, r1, tr) = axis(r, sr, target.rows);
        let (c0, c1, tc) = axis(c, sc, target.cols);

        let lerp = |a: f32, b: f32, t: f32| a + (b - a) * t;
        let plane = |d: usize| {
            let row = |r: usize| lerp(field.get(d, r, c0), field.get(d, r, c1), tc);
            lerp(row(r0), row(r1), tr)
        };
        lerp(plane(d0), plane(d1), td)
    });

    let spacing = resampled_spacing(field.spacing(), source, target);
    Ok(resampled.with_spacing(spacing)?)
}

/// Voxel size after resampling from `source` to `target`.
pub(crate) fn resampled_spacing(spacing: Vector3<f64>, source: Shape, target: Shape) -> Vector3<f64> {
    let ratio = |input: usize, output: usize| input as f64 / output as f64;
    spacing.component_mul(&Vector3::new(
        ratio(source.depth, target.depth),
        ratio(source.rows, target.rows),
        ratio(source.cols, target.cols),
    ))
}

/// Nearest-neighbour resampling of a mask onto `target`.
#[must_use]
pub fn resample_nearest(mask: &TissueMask, target: Shape) -> TissueMask {
    let [sd, sr, sc] = mask.shape().dims();
    let nearest = |o: usize, input: usize, output: usize| {
        (source_coord(o, input, output).round() as usize).min(input.saturating_sub(1))
    };
    TissueMask::from_fn(target, |d, r, c| {
        mask.get(
            nearest(d, sd, target.depth),
            nearest(r, sr, target.rows),
            nearest(c, sc, target.cols),
        )
    })
}
