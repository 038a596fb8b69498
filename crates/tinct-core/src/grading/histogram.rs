//! CDF-quantile histogram matching.
//!
//! Each target sample is located in the target's empirical CDF, and the
//! reference value at the same quantile replaces it. The mapping is built
//! once from both distributions ([`HistogramMapping::build`]) and only then
//! applied per sample ([`HistogramMapping::apply`]).
//!
//! Two modes:
//! - direct: R, G and B matched independently on the 8-bit samples
//! - luminance-preserving: a* and b* matched in L*a*b*, target L* kept
//!
//! # Complexity
//! - Build: O(n log n + m log m) for n target and m reference samples
//! - Apply: O(n log k), k = distinct target values

use rayon::prelude::*;
use tracing::debug;

use crate::analysis::EmpiricalCdf;
use crate::color_management::lab::{self, CHANNEL_NAMES, CHROMA};
use crate::error::{ImageRole, TransferWarning};
use crate::image::{RgbImage, quantize, rgb_channel};

/// Display names of the device channels, for diagnostics.
const RGB_NAMES: [&str; 3] = ["R", "G", "B"];

/// Monotonic lookup from each distinct target value to its matched value.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramMapping {
    /// Distinct target values, strictly increasing.
    source: Vec<f32>,
    /// Matched reference value for each entry of `source`.
    mapped: Vec<f32>,
}

impl HistogramMapping {
    /// Statistics phase: derive the mapping from both full distributions.
    pub fn build(target: &EmpiricalCdf, reference: &EmpiricalCdf) -> Self {
        let mapped = target
            .quantiles()
            .iter()
            .map(|&q| reference.value_at(q))
            .collect();
        Self {
            source: target.values().to_vec(),
            mapped,
        }
    }

    /// Matched value for one target sample.
    ///
    /// Exact for samples the mapping was built from. Unseen samples take the
    /// entry of the nearest distinct value at or below them.
    pub fn map(&self, value: f32) -> f32 {
        if self.source.is_empty() {
            return value;
        }
        let idx = self.source.partition_point(|v| v.total_cmp(&value).is_le());
        self.mapped[idx.saturating_sub(1)]
    }

    /// Mapping phase: remap every sample. Order-independent.
    pub fn apply(&self, samples: &[f32]) -> Vec<f32> {
        samples.par_iter().map(|&v| self.map(v)).collect()
    }
}

/// Match one channel's distribution onto a reference channel's.
///
/// A flat target channel maps to a single reference value (the reference
/// maximum); a flat reference channel maps everything onto its one value.
/// Neither case is an error.
pub fn match_channel(target: &[f32], reference: &[f32]) -> Vec<f32> {
    let mapping = HistogramMapping::build(
        &EmpiricalCdf::from_samples(target),
        &EmpiricalCdf::from_samples(reference),
    );
    mapping.apply(target)
}

/// Histogram-match each device channel independently.
pub fn match_rgb(target: &RgbImage, reference: &RgbImage) -> (RgbImage, Vec<TransferWarning>) {
    let mut warnings = Vec::new();
    let mut out = RgbImage::new(target.width(), target.height());

    for c in 0..3 {
        let t = rgb_channel(target, c);
        let r = rgb_channel(reference, c);
        let (t_cdf, r_cdf) = (EmpiricalCdf::from_samples(&t), EmpiricalCdf::from_samples(&r));
        collect_degenerate(&t_cdf, &r_cdf, RGB_NAMES[c], &mut warnings);
        debug!(
            channel = RGB_NAMES[c],
            target_levels = t_cdf.len(),
            reference_levels = r_cdf.len(),
            "histogram mapping built"
        );

        let matched = HistogramMapping::build(&t_cdf, &r_cdf).apply(&t);
        for (px, v) in out.pixels_mut().zip(matched) {
            px.0[c] = quantize(v);
        }
    }
    (out, warnings)
}

/// Histogram-match a* and b* in L*a*b*, keeping the target's L* untouched.
pub fn match_chroma(target: &RgbImage, reference: &RgbImage) -> (RgbImage, Vec<TransferWarning>) {
    let mut warnings = Vec::new();
    let mut t_lab = lab::to_perceptual(target);
    let r_lab = lab::to_perceptual(reference);

    for c in CHROMA {
        let t = t_lab.channel(c);
        let r = r_lab.channel(c);
        let (t_cdf, r_cdf) = (EmpiricalCdf::from_samples(&t), EmpiricalCdf::from_samples(&r));
        collect_degenerate(&t_cdf, &r_cdf, CHANNEL_NAMES[c], &mut warnings);
        debug!(
            channel = CHANNEL_NAMES[c],
            target_levels = t_cdf.len(),
            reference_levels = r_cdf.len(),
            "histogram mapping built"
        );

        let matched = HistogramMapping::build(&t_cdf, &r_cdf).apply(&t);
        t_lab.set_channel(c, &matched);
    }
    (lab::to_rgb(&t_lab), warnings)
}

fn collect_degenerate(
    target: &EmpiricalCdf,
    reference: &EmpiricalCdf,
    channel: &'static str,
    warnings: &mut Vec<TransferWarning>,
) {
    for (role, cdf) in [(ImageRole::Target, target), (ImageRole::Reference, reference)] {
        if cdf.is_degenerate() {
            warnings.push(TransferWarning::DegenerateStatistics { role, channel });
        }
    }
}
