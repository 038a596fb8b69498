//! Empirical cumulative distribution of one channel.
//!
//! Samples are collapsed to their distinct values; each distinct value `v`
//! carries the quantile `count(samples ≤ v) / n`. Quantile lookups
//! interpolate linearly between neighbouring distinct values.
//!
//! # Complexity
//! - Build: O(n log n) sort
//! - Lookup: O(log k) binary search over k distinct values

/// Distinct sample values of one channel and their cumulative quantiles.
#[derive(Debug, Clone, PartialEq)]
pub struct EmpiricalCdf {
    /// Distinct values, strictly increasing.
    values: Vec<f32>,
    /// Cumulative quantile of each value, strictly increasing, last = 1.0.
    quantiles: Vec<f64>,
}

impl EmpiricalCdf {
    /// Build the distribution of `samples`. NaN samples sort last.
    pub fn from_samples(samples: &[f32]) -> Self {
        let mut sorted = samples.to_vec();
        sorted.sort_unstable_by(f32::total_cmp);

        let mut values: Vec<f32> = Vec::new();
        let mut counts: Vec<usize> = Vec::new();
        for v in sorted {
            match values.last() {
                Some(&last) if last.total_cmp(&v).is_eq() => {
                    if let Some(n) = counts.last_mut() {
                        *n += 1;
                    }
                }
                _ => {
                    values.push(v);
                    counts.push(1);
                }
            }
        }

        let total = samples.len().max(1) as f64;
        let mut running = 0usize;
        let quantiles = counts
            .iter()
            .map(|&n| {
                running += n;
                running as f64 / total
            })
            .collect();

        Self { values, quantiles }
    }

    /// Distinct values in increasing order.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Cumulative quantile of each distinct value.
    pub fn quantiles(&self) -> &[f64] {
        &self.quantiles
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when built from no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// A channel with at most one distinct value.
    pub fn is_degenerate(&self) -> bool {
        self.values.len() <= 1
    }

    /// Value at quantile `q`, interpolated between distinct values.
    ///
    /// Quantiles at or below the first entry return the minimum; at or above
    /// the last entry return the maximum. An empty distribution returns 0.
    pub fn value_at(&self, q: f64) -> f32 {
        let (Some(&first), Some(&last)) = (self.values.first(), self.values.last()) else {
            return 0.0;
        };
        if q <= self.quantiles[0] {
            return first;
        }
        if q >= self.quantiles[self.quantiles.len() - 1] {
            return last;
        }

        // First index with quantile >= q; always in 1..len here.
        let hi = self.quantiles.partition_point(|&p| p < q);
        let lo = hi - 1;
        let (q0, q1) = (self.quantiles[lo], self.quantiles[hi]);
        let (v0, v1) = (self.values[lo] as f64, self.values[hi] as f64);
        let t = (q - q0) / (q1 - q0);
        (v0 + (v1 - v0) * t) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_distinct_values_and_quantiles() {
        let cdf = EmpiricalCdf::from_samples(&[3.0, 1.0, 3.0, 2.0]);
        assert_eq!(cdf.values(), &[1.0, 2.0, 3.0]);
        assert_eq!(cdf.quantiles(), &[0.25, 0.5, 1.0]);
        assert!(!cdf.is_degenerate());
    }

    #[test]
    fn test_single_value_is_degenerate() {
        let cdf = EmpiricalCdf::from_samples(&[42.0; 9]);
        assert_eq!(cdf.len(), 1);
        assert!(cdf.is_degenerate());
        assert_eq!(cdf.value_at(0.0), 42.0);
        assert_eq!(cdf.value_at(0.7), 42.0);
        assert_eq!(cdf.value_at(1.0), 42.0);
    }

    #[test]
    fn test_value_at_interpolates_linearly() {
        let cdf = EmpiricalCdf::from_samples(&[0.0, 10.0, 20.0, 30.0]);
        // quantiles: 0.25, 0.5, 0.75, 1.0
        assert!((cdf.value_at(0.25) - 0.0).abs() < EPSILON);
        assert!((cdf.value_at(0.375) - 5.0).abs() < EPSILON);
        assert!((cdf.value_at(0.9) - 26.0).abs() < 1e-4);
        assert!((cdf.value_at(1.0) - 30.0).abs() < EPSILON);
    }

    #[test]
    fn test_value_at_clamps_outside_range() {
        let cdf = EmpiricalCdf::from_samples(&[5.0, 6.0]);
        assert_eq!(cdf.value_at(-1.0), 5.0);
        assert_eq!(cdf.value_at(0.1), 5.0);
        assert_eq!(cdf.value_at(2.0), 6.0);
    }

    #[test]
    fn test_empty_distribution_returns_zero() {
        let cdf = EmpiricalCdf::from_samples(&[]);
        assert!(cdf.is_empty());
        assert_eq!(cdf.value_at(0.5), 0.0);
    }
}
