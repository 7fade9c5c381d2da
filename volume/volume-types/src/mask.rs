//! Boolean tissue mask.

use nalgebra::Vector3;

use crate::error::{VolumeError, VolumeResult};
use crate::{ScalarVolume, Shape};

/// A boolean grid marking voxels classified as tissue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TissueMask {
    values: Vec<bool>,
    shape: Shape,
}

impl TissueMask {
    /// An all-background mask.
    #[must_use]
    pub fn empty(shape: Shape) -> Self {
        Self {
            values: vec![false; shape.len()],
            shape,
        }
    }

    /// Create a mask from a buffer in `(depth, rows, cols)` order.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::ShapeMismatch`] if the buffer length differs
    /// from `shape.len()`.
    pub fn new(shape: Shape, values: Vec<bool>) -> VolumeResult<Self> {
        if values.len() != shape.len() {
            return Err(VolumeError::ShapeMismatch {
                shape,
                expected: shape.len(),
                got: values.len(),
            });
        }
        Ok(Self { values, shape })
    }

    /// Mark every voxel of `volume` whose sample satisfies `predicate`.
    #[must_use]
    pub fn from_volume(volume: &ScalarVolume, predicate: impl Fn(f32) -> bool) -> Self {
        Self {
            values: volume.values().iter().map(|&v| predicate(v)).collect(),
            shape: volume.shape(),
        }
    }

    /// Build a mask by evaluating `f(d, r, c)` on every voxel.
    #[must_use]
    pub fn from_fn(shape: Shape, mut f: impl FnMut(usize, usize, usize) -> bool) -> Self {
        let values = (0..shape.len())
            .map(|i| {
                let (d, r, c) = shape.coords(i);
                f(d, r, c)
            })
            .collect();
        Self { values, shape }
    }

    /// Grid dimensions.
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    /// All flags in storage order.
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[bool] {
        &self.values
    }

    /// Flag at `(d, r, c)`; out-of-range coordinates read as background.
    #[inline]
    #[must_use]
    pub fn get(&self, d: usize, r: usize, c: usize) -> bool {
        self.shape.contains(d, r, c) && self.values[self.shape.index(d, r, c)]
    }

    /// Flag at signed coordinates; anything outside the grid is background.
    #[inline]
    #[must_use]
    pub fn get_signed(&self, d: isize, r: isize, c: isize) -> bool {
        match (usize::try_from(d), usize::try_from(r), usize::try_from(c)) {
            (Ok(d), Ok(r), Ok(c)) => self.get(d, r, c),
            _ => false,
        }
    }

    /// Set the flag at `(d, r, c)`; out-of-range writes are ignored.
    #[inline]
    pub fn set(&mut self, d: usize, r: usize, c: usize, value: bool) {
        if self.shape.contains(d, r, c) {
            let i = self.shape.index(d, r, c);
            self.values[i] = value;
        }
    }

    /// Number of tissue voxels.
    #[must_use]
    pub fn count(&self) -> usize {
        self.values.iter().filter(|&&v| v).count()
    }

    /// True if at least one voxel is tissue.
    #[must_use]
    pub fn any(&self) -> bool {
        self.values.iter().any(|&v| v)
    }

    /// The mask as a 0/1 scalar field with the given spacing.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::InvalidSpacing`] for unusable spacing.
    pub fn to_field(&self, spacing: Vector3<f64>) -> VolumeResult<ScalarVolume> {
        let values = self.values.iter().map(|&v| if v { 1.0 } else { 0.0 }).collect();
        ScalarVolume::new(self.shape, values, spacing)
    }
}
