/// Computes a percentile of unsorted values with the nearest-rank method.
///
/// For `n` values the `p`-th percentile is the sorted value at index
/// `floor(n * p / 100)`, clamped to the last element.
///
/// Returns `None` for an empty input.
///
/// # Examples
///
/// ```
/// use fairsplit_stats::percentiles::percentile;
///
/// let values = [5.0, 1.0, 4.0, 2.0, 3.0];
/// assert_eq!(percentile(&values, 50.0), Some(3.0));
/// assert_eq!(percentile(&values, 100.0), Some(5.0));
/// assert_eq!(percentile(&[], 50.0), None);
/// ```
#[must_use]
pub fn percentile(values: &[f32], p: f32) -> Option<f32> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f32::total_cmp);
    percentile_of_sorted(&sorted, p)
}

/// Like [`percentile`], but for values already sorted in ascending order.
///
/// # Panics
///
/// Panics if `sorted_values` is not sorted in ascending order.
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn percentile_of_sorted(sorted_values: &[f32], p: f32) -> Option<f32> {
    assert!(
        sorted_values.is_sorted_by(|a, b| a <= b),
        "values must be sorted in ascending order"
    );
    if sorted_values.is_empty() {
        return None;
    }
    let p = p.clamp(0.0, 100.0);
    let idx = ((sorted_values.len() as f32 * p) / 100.0) as usize;
    Some(sorted_values[idx.min(sorted_values.len() - 1)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_quartile_of_ratings() {
        let ratings = [60.0, 65.0, 70.0, 72.0, 75.0, 80.0, 88.0, 91.0];
        // 8 * 0.75 = 6
        assert_eq!(percentile(&ratings, 75.0), Some(88.0));
    }

    #[test]
    fn test_out_of_range_percentile_is_clamped() {
        let ratings = [1.0, 2.0, 3.0];
        assert_eq!(percentile(&ratings, 150.0), Some(3.0));
        assert_eq!(percentile(&ratings, -10.0), Some(1.0));
    }
}
