/// Descriptive statistics summarizing a sample of `f32` values.
///
/// Variance is the population variance (divided by `n`), which is what the balance
/// metrics want: a team is the whole population, not a sample of a larger one.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    /// Number of values in the sample.
    pub count: usize,
    /// The minimum value.
    pub min: f32,
    /// The maximum value.
    pub max: f32,
    /// Sum of all values.
    pub sum: f32,
    /// The arithmetic mean.
    pub mean: f32,
    /// The median (upper median for even-sized samples).
    pub median: f32,
    /// Population variance.
    pub variance: f32,
    /// Population standard deviation.
    pub std_dev: f32,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the sample contains at least one value
    /// * `None` - if the sample is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use fairsplit_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([5.0, 2.0, 4.0, 1.0, 3.0]).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.median, 3.0);
    /// assert_eq!(stats.variance, 2.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f32::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes descriptive statistics from values sorted in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f32]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let n = count as f32;
        let sum = sorted_values.iter().copied().sum::<f32>();
        let mean = sum / n;
        let median = sorted_values[count / 2];
        let variance = sorted_values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f32>()
            / n;

        Some(Self {
            count,
            min,
            max,
            sum,
            mean,
            median,
            variance,
            std_dev: variance.sqrt(),
        })
    }

    /// Coefficient of variation (`std_dev / |mean|`).
    ///
    /// Returns 0.0 for a zero mean: a sample of zeros has no relative spread.
    ///
    /// ```
    /// # use fairsplit_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([10.0, 10.0, 10.0]).unwrap();
    /// assert_eq!(stats.coefficient_of_variation(), 0.0);
    /// ```
    #[must_use]
    pub fn coefficient_of_variation(&self) -> f32 {
        if self.mean.abs() < f32::EPSILON {
            0.0
        } else {
            self.std_dev / self.mean.abs()
        }
    }
}

/// Population standard deviation of a sample, 0.0 when empty.
#[must_use]
pub fn std_dev<I>(values: I) -> f32
where
    I: IntoIterator<Item = f32>,
{
    DescriptiveStats::new(values).map_or(0.0, |s| s.std_dev)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sample() {
        assert!(DescriptiveStats::new([]).is_none());
        assert_eq!(std_dev([]), 0.0);
    }

    #[test]
    fn test_single_value() {
        let stats = DescriptiveStats::new([42.0]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mean, 42.0);
        assert_eq!(stats.median, 42.0);
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.coefficient_of_variation(), 0.0);
    }

    #[test]
    fn test_population_variance() {
        let stats = DescriptiveStats::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.variance, 4.0);
        assert_eq!(stats.std_dev, 2.0);
        assert!((stats.coefficient_of_variation() - 0.4).abs() < 1e-6);
    }

    #[test]
    #[should_panic(expected = "sorted")]
    fn test_from_sorted_rejects_unsorted() {
        let _ = DescriptiveStats::from_sorted(&[3.0, 1.0]);
    }
}
