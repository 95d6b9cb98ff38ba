/// Summary of a sample of `f32` values.
///
/// Formats as `min/max/mean/median/std`, the layout used in per-generation
/// training reports.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
#[display(
    "min={min:.3} max={max:.3} mean={mean:.3} median={median:.3} std={std_dev:.3}"
)]
pub struct DescriptiveStats {
    /// Number of values in the sample.
    pub count: usize,
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    /// Middle value; the mean of the two middle values for even counts.
    pub median: f32,
    /// Population variance.
    pub variance: f32,
    pub std_dev: f32,
    /// `std_dev / (max - min)`, or 0.0 when all values are equal.
    pub normalized_std_dev: f32,
}

impl DescriptiveStats {
    /// Computes statistics from values in any order.
    ///
    /// Returns `None` for an empty sample.
    ///
    /// ```
    /// # use blockfall_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([5.0, 2.0, 4.0, 1.0]).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.median, 3.0);
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

    /// Computes statistics from values sorted in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted.
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
        let mean = sorted_values.iter().sum::<f32>() / n;
        let mid = count / 2;
        let median = if count % 2 == 0 {
            f32::midpoint(sorted_values[mid - 1], sorted_values[mid])
        } else {
            sorted_values[mid]
        };
        let variance = sorted_values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f32>()
            / n;
        let std_dev = variance.sqrt();
        let range = max - min;
        let normalized_std_dev = if range <= f32::EPSILON * mean.abs().max(1.0) {
            0.0
        } else {
            std_dev / range
        };

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            variance,
            std_dev,
            normalized_std_dev,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sample() {
        assert_eq!(DescriptiveStats::new([]), None);
    }

    #[test]
    fn test_odd_and_even_median() {
        let odd = DescriptiveStats::new([3.0, 1.0, 2.0]).unwrap();
        assert!((odd.median - 2.0).abs() < f32::EPSILON);
        let even = DescriptiveStats::new([4.0, 1.0, 2.0, 3.0]).unwrap();
        assert!((even.median - 2.5).abs() < f32::EPSILON);
        assert_eq!(even.count, 4);
    }

    #[test]
    fn test_spread() {
        let stats = DescriptiveStats::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((stats.mean - 5.0).abs() < 1e-6);
        assert!((stats.variance - 4.0).abs() < 1e-6);
        assert!((stats.std_dev - 2.0).abs() < 1e-6);
        assert!((stats.normalized_std_dev - 2.0 / 7.0).abs() < 1e-6);
    }

    #[test]
    fn test_constant_sample_has_zero_normalized_spread() {
        for value in [0.0, -3.5, 120.0] {
            let stats = DescriptiveStats::new([value; 5]).unwrap();
            assert_eq!(stats.normalized_std_dev, 0.0);
        }
    }

    #[test]
    fn test_display() {
        let stats = DescriptiveStats::new([1.0, 3.0]).unwrap();
        assert_eq!(
            stats.to_string(),
            "min=1.000 max=3.000 mean=2.000 median=2.000 std=1.000"
        );
    }
}
