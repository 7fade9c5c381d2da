//! Sample statistics used for intensity normalization and thresholding.

/// Added to the value range when normalizing so a constant grid maps to 0.
pub const NORMALIZE_EPSILON: f32 = 1e-8;

/// Minimum and maximum of the finite samples, or `None` if there are none.
#[must_use]
pub fn min_max(values: &[f32]) -> Option<(f32, f32)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// The `q`-th percentile (`0..=100`) with linear interpolation between
/// closest ranks.
///
/// The rank of the percentile is `q / 100 * (n - 1)`; a fractional rank
/// interpolates between its two neighbouring sorted samples. Non-finite
/// samples are ignored. Returns `None` when no finite sample remains.
///
/// # Example
///
/// ```
/// use volume_types::percentile;
///
/// let v = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(percentile(&v, 50.0), Some(3.0));
/// assert_eq!(percentile(&v, 25.0), Some(2.0));
/// ```
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn percentile(values: &[f32], q: f64) -> Option<f32> {
    let mut sorted: Vec<f32> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_unstable_by(f32::total_cmp);

    let rank = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;

    let lo = f64::from(sorted[lower]);
    let hi = f64::from(sorted[upper]);
    Some((lo + (hi - lo) * frac) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn percentile_endpoints() {
        let v = [5.0, 1.0, 4.0, 2.0, 3.0];
        assert_eq!(percentile(&v, 0.0), Some(1.0));
        assert_eq!(percentile(&v, 100.0), Some(5.0));
    }

    #[test]
    fn percentile_interpolates() {
        let v: Vec<f32> = (0..10).map(|i| i as f32).collect();
        assert_relative_eq!(percentile(&v, 95.0).unwrap(), 8.55, epsilon = 1e-5);
        assert_relative_eq!(percentile(&v, 20.0).unwrap(), 1.8, epsilon = 1e-5);
    }

    #[test]
    fn percentile_ignores_nan() {
        let v = [f32::NAN, 1.0, 3.0];
        assert_eq!(percentile(&v, 50.0), Some(2.0));
        assert_eq!(percentile(&[f32::NAN], 50.0), None);
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn min_max_skips_non_finite() {
        assert_eq!(min_max(&[f32::INFINITY, -2.0, 7.0]), Some((-2.0, 7.0)));
        assert_eq!(min_max(&[]), None);
    }
}
