//! Dense scalar intensity volume.

use nalgebra::Vector3;

use crate::error::{VolumeError, VolumeResult};
use crate::stats::{min_max, NORMALIZE_EPSILON};
use crate::Shape;

/// A 3D grid of `f32` intensities.
///
/// Spacing is the physical voxel size in millimetres along
/// `(depth, rows, cols)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarVolume {
    values: Vec<f32>,
    shape: Shape,
    spacing: Vector3<f64>,
}

impl ScalarVolume {
    /// Create a volume from a sample buffer in `(depth, rows, cols)` order.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::ShapeMismatch`] if the buffer length differs
    /// from `shape.len()`, or [`VolumeError::InvalidSpacing`] if any spacing
    /// component is not finite and positive.
    pub fn new(shape: Shape, values: Vec<f32>, spacing: Vector3<f64>) -> VolumeResult<Self> {
        if values.len() != shape.len() {
            return Err(VolumeError::ShapeMismatch {
                shape,
                expected: shape.len(),
                got: values.len(),
            });
        }
        check_spacing(&spacing)?;
        Ok(Self {
            values,
            shape,
            spacing,
        })
    }

    /// A zero-filled volume with unit spacing.
    #[must_use]
    pub fn zeros(shape: Shape) -> Self {
        Self {
            values: vec![0.0; shape.len()],
            shape,
            spacing: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// A unit-spacing volume whose samples are produced by `f(d, r, c)`.
    #[must_use]
    pub fn from_fn(shape: Shape, mut f: impl FnMut(usize, usize, usize) -> f32) -> Self {
        let values = (0..shape.len())
            .map(|i| {
                let (d, r, c) = shape.coords(i);
                f(d, r, c)
            })
            .collect();
        Self {
            values,
            shape,
            spacing: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Replace the voxel spacing.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::InvalidSpacing`] for non-positive or
    /// non-finite spacing.
    pub fn with_spacing(mut self, spacing: Vector3<f64>) -> VolumeResult<Self> {
        check_spacing(&spacing)?;
        self.spacing = spacing;
        Ok(self)
    }

    /// Grid dimensions.
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    /// Voxel spacing along `(depth, rows, cols)`.
    #[inline]
    #[must_use]
    pub const fn spacing(&self) -> Vector3<f64> {
        self.spacing
    }

    /// All samples in storage order.
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Number of voxels.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the grid has no voxels.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sample at `(d, r, c)`; out-of-range coordinates read as 0.
    #[inline]
    #[must_use]
    pub fn get(&self, d: usize, r: usize, c: usize) -> f32 {
        if self.shape.contains(d, r, c) {
            self.values[self.shape.index(d, r, c)]
        } else {
            0.0
        }
    }

    /// Set the sample at `(d, r, c)`; out-of-range writes are ignored.
    #[inline]
    pub fn set(&mut self, d: usize, r: usize, c: usize, value: f32) {
        if self.shape.contains(d, r, c) {
            let i = self.shape.index(d, r, c);
            self.values[i] = value;
        }
    }

    /// Min-max normalize into `[0, 1]`.
    ///
    /// Each sample becomes `(v - min) / (max - min + 1e-8)`. Non-finite
    /// samples map to 0, as does every sample of a constant volume.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let Some((lo, hi)) = min_max(&self.values) else {
            return Self {
                values: vec![0.0; self.values.len()],
                ..self.clone()
            };
        };
        let range = f64::from(hi) - f64::from(lo) + f64::from(NORMALIZE_EPSILON);
        self.map(|v| {
            if v.is_finite() {
                #[allow(clippy::cast_possible_truncation)]
                let n = ((f64::from(v) - f64::from(lo)) / range) as f32;
                n
            } else {
                0.0
            }
        })
    }

    /// Apply `f` to every sample, keeping shape and spacing.
    #[must_use]
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Self {
        Self {
            values: self.values.iter().map(|&v| f(v)).collect(),
            shape: self.shape,
            spacing: self.spacing,
        }
    }
}

fn check_spacing(spacing: &Vector3<f64>) -> VolumeResult<()> {
    if spacing.iter().all(|s| s.is_finite() && *s > 0.0) {
        Ok(())
    } else {
        Err(VolumeError::InvalidSpacing([spacing.x, spacing.y, spacing.z]))
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn new_checks_length() {
        let err = ScalarVolume::new(Shape::new(2, 2, 2), vec![0.0; 7], Vector3::new(1.0, 1.0, 1.0));
        assert!(matches!(
            err,
            Err(VolumeError::ShapeMismatch {
                expected: 8,
                got: 7,
                ..
            })
        ));
    }

    #[test]
    fn new_checks_spacing() {
        let err = ScalarVolume::new(Shape::new(1, 1, 1), vec![0.0], Vector3::new(1.0, 0.0, 1.0));
        assert!(matches!(err, Err(VolumeError::InvalidSpacing(_))));
    }

    #[test]
    fn get_set_and_out_of_range() {
        let mut v = ScalarVolume::zeros(Shape::new(2, 3, 4));
        v.set(1, 2, 3, 9.0);
        assert_eq!(v.get(1, 2, 3), 9.0);
        assert_eq!(v.get(5, 0, 0), 0.0);
        v.set(9, 9, 9, 1.0);
        assert_eq!(v.values().iter().sum::<f32>(), 9.0);
    }

    #[test]
    fn normalized_range() {
        let v = ScalarVolume::from_fn(Shape::new(1, 1, 5), |_, _, c| 10.0 + c as f32 * 5.0);
        let n = v.normalized();
        assert_relative_eq!(n.get(0, 0, 0), 0.0);
        assert_relative_eq!(n.get(0, 0, 4), 1.0, epsilon = 1e-6);
        assert_relative_eq!(n.get(0, 0, 2), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn normalized_constant_is_zero() {
        let v = ScalarVolume::from_fn(Shape::new(3, 3, 3), |_, _, _| 42.0);
        assert!(v.normalized().values().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn normalized_non_finite_is_zero() {
        let mut v = ScalarVolume::zeros(Shape::new(1, 1, 3));
        v.set(0, 0, 1, f32::NAN);
        v.set(0, 0, 2, 4.0);
        let n = v.normalized();
        assert_eq!(n.get(0, 0, 1), 0.0);
        assert_relative_eq!(n.get(0, 0, 2), 1.0, epsilon = 1e-6);
    }
}
