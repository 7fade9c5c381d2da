//! Binary morphology with the 6-connected cross structuring element.
//!
//! Voxels outside the grid count as background, so erosion peels the grid
//! border and dilation never grows past it.

use volume_types::TissueMask;

const CROSS: [(isize, isize, isize); 6] = [
    (-1, 0, 0),
    (1, 0, 0),
    (0, -1, 0),
    (0, 1, 0),
    (0, 0, -1),
    (0, 0, 1),
];

/// Keep a voxel only if it and all six face neighbours are set.
/// Repeats `iterations` times.
#[must_use]
pub fn erode(mask: &TissueMask, iterations: usize) -> TissueMask {
    apply(mask, iterations, |mask, d, r, c| {
        mask.get_signed(d, r, c)
            && CROSS
                .iter()
                .all(|&(dd, dr, dc)| mask.get_signed(d + dd, r + dr, c + dc))
    })
}

/// Set a voxel if it or any of its six face neighbours is set.
/// Repeats `iterations` times.
#[must_use]
pub fn dilate(mask: &TissueMask, iterations: usize) -> TissueMask {
    apply(mask, iterations, |mask, d, r, c| {
        mask.get_signed(d, r, c)
            || CROSS
                .iter()
                .any(|&(dd, dr, dc)| mask.get_signed(d + dd, r + dr, c + dc))
    })
}

#[allow(clippy::cast_possible_wrap)]
fn apply(
    mask: &TissueMask,
    iterations: usize,
    rule: impl Fn(&TissueMask, isize, isize, isize) -> bool,
) -> TissueMask {
    let mut current = mask.clone();
    for _ in 0..iterations {
        // An empty mask is a fixed point of both operations.
        if !current.any() {
            break;
        }
        let prev = current;
        current = TissueMask::from_fn(prev.shape(), |d, r, c| {
            rule(&prev, d as isize, r as isize, c as isize)
        });
    }
    current
}
