//! Per-channel mean and population standard deviation.

use serde::Serialize;

/// Spread at or below which a channel counts as flat.
pub const DEGENERATE_STD: f64 = 1e-9;

/// Mean and population standard deviation of each channel of an image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelStats {
    /// Per-channel mean.
    pub mean: [f64; 3],
    /// Per-channel population standard deviation. Always `>= 0`.
    pub std: [f64; 3],
}

impl ChannelStats {
    /// Gather statistics over every pixel.
    ///
    /// Two sequential passes (mean, then squared deviations): the variance
    /// stays non-negative, flat channels come out at zero, and the
    /// summation order is fixed so results are reproducible bit for bit.
    /// An empty slice yields zeros.
    pub fn compute(pixels: &[[f32; 3]]) -> Self {
        if pixels.is_empty() {
            return Self {
                mean: [0.0; 3],
                std: [0.0; 3],
            };
        }
        let n = pixels.len() as f64;

        let mut sum = [0.0_f64; 3];
        for px in pixels {
            for c in 0..3 {
                sum[c] += px[c] as f64;
            }
        }
        let mean = sum.map(|s| s / n);

        let mut sq = [0.0_f64; 3];
        for px in pixels {
            for c in 0..3 {
                let d = px[c] as f64 - mean[c];
                sq[c] += d * d;
            }
        }
        let std = sq.map(|s| (s / n).max(0.0).sqrt());

        Self { mean, std }
    }

    /// Whether channel `c` has (numerically) zero spread.
    pub fn is_flat(&self, c: usize) -> bool {
        self.std[c] <= DEGENERATE_STD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_uniform_pixels_have_zero_std() {
        let stats = ChannelStats::compute(&vec![[0.3, 40.0, -12.5]; 100]);
        for c in 0..3 {
            assert!(stats.std[c] < EPSILON, "channel {c}: {}", stats.std[c]);
            assert!(stats.is_flat(c));
        }
        assert!((stats.mean[1] - 40.0).abs() < EPSILON);
        assert!((stats.mean[2] + 12.5).abs() < EPSILON);
    }

    #[test]
    fn test_population_std_of_known_values() {
        // Values 2, 4, 4, 4, 5, 5, 7, 9: mean 5, population std 2.
        let pixels: Vec<[f32; 3]> = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]
            .iter()
            .map(|&v| [v, v * 2.0, 1.0])
            .collect();
        let stats = ChannelStats::compute(&pixels);
        assert!((stats.mean[0] - 5.0).abs() < EPSILON);
        assert!((stats.std[0] - 2.0).abs() < EPSILON);
        assert!((stats.std[1] - 4.0).abs() < EPSILON);
        assert!(!stats.is_flat(0));
        assert!(stats.is_flat(2));
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let stats = ChannelStats::compute(&[]);
        assert_eq!(stats.mean, [0.0; 3]);
        assert_eq!(stats.std, [0.0; 3]);
    }
}
