//! Grid dimensions.

use std::fmt;

/// Grid dimensions in `(depth, rows, cols)` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Shape {
    /// Number of slices (axis 0).
    pub depth: usize,
    /// Rows per slice (axis 1).
    pub rows: usize,
    /// Columns per slice (axis 2).
    pub cols: usize,
}

impl Shape {
    /// Create a shape.
    #[inline]
    #[must_use]
    pub const fn new(depth: usize, rows: usize, cols: usize) -> Self {
        Self { depth, rows, cols }
    }

    /// Dimensions as an array indexed by axis.
    #[inline]
    #[must_use]
    pub const fn dims(&self) -> [usize; 3] {
        [self.depth, self.rows, self.cols]
    }

    /// Total number of voxels.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.depth * self.rows * self.cols
    }

    /// True when any axis has zero length.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Largest axis length.
    #[inline]
    #[must_use]
    pub fn max_dim(&self) -> usize {
        self.depth.max(self.rows).max(self.cols)
    }

    /// Linear index of `(d, r, c)`; columns vary fastest.
    #[inline]
    #[must_use]
    pub const fn index(&self, d: usize, r: usize, c: usize) -> usize {
        (d * self.rows + r) * self.cols + c
    }

    /// Grid coordinates of a linear index.
    #[inline]
    #[must_use]
    pub const fn coords(&self, index: usize) -> (usize, usize, usize) {
        let c = index % self.cols;
        let r = (index / self.cols) % self.rows;
        let d = index / (self.cols * self.rows);
        (d, r, c)
    }

    /// True when `(d, r, c)` lies inside the grid.
    #[inline]
    #[must_use]
    pub const fn contains(&self, d: usize, r: usize, c: usize) -> bool {
        d < self.depth && r < self.rows && c < self.cols
    }
}

impl From<[usize; 3]> for Shape {
    fn from([depth, rows, cols]: [usize; 3]) -> Self {
        Self::new(depth, rows, cols)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.depth, self.rows, self.cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_roundtrip() {
        let shape = Shape::new(3, 4, 5);
        for i in 0..shape.len() {
            let (d, r, c) = shape.coords(i);
            assert!(shape.contains(d, r, c));
            assert_eq!(shape.index(d, r, c), i);
        }
    }

    #[test]
    fn columns_vary_fastest() {
        let shape = Shape::new(2, 3, 4);
        assert_eq!(shape.index(0, 0, 1), 1);
        assert_eq!(shape.index(0, 1, 0), 4);
        assert_eq!(shape.index(1, 0, 0), 12);
    }

    #[test]
    fn display_and_len() {
        let shape = Shape::new(40, 40, 40);
        assert_eq!(shape.to_string(), "40x40x40");
        assert_eq!(shape.len(), 64_000);
        assert!(Shape::new(0, 5, 5).is_empty());
        assert_eq!(Shape::new(3, 200, 7).max_dim(), 200);
    }
}
