//! Statistical color transfer (Reinhard et al., "Color Transfer between
//! Images", 2001).
//!
//! Both images are taken to L*a*b*, and every target channel is normalized
//! by its own statistics and rescaled to the reference's:
//!
//! ```text
//! out = (in − μ_target) × σ_ref / (σ_target + ε) + μ_ref
//! ```
//!
//! `ε` keeps flat target channels finite; a flat channel then collapses to
//! the reference mean.

use rayon::prelude::*;
use tracing::debug;

use crate::analysis::ChannelStats;
use crate::color_management::lab::{self, CHANNEL_NAMES, CHROMA, LIGHTNESS};
use crate::error::{ImageRole, TransferWarning};
use crate::image::{LabImage, RgbImage};

/// Floor added to the target standard deviation.
pub const EPSILON: f64 = 1e-6;

/// Fitted per-channel affine rescale from target to reference statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReinhardFit {
    /// Statistics of the target image.
    pub target: ChannelStats,
    /// Statistics of the reference image.
    pub reference: ChannelStats,
}

impl ReinhardFit {
    /// Statistics phase: gather both images' statistics.
    pub fn fit(target: &LabImage, reference: &LabImage) -> Self {
        let fit = Self {
            target: ChannelStats::compute(&target.pixels),
            reference: ChannelStats::compute(&reference.pixels),
        };
        debug!(
            target_mean = ?fit.target.mean,
            target_std = ?fit.target.std,
            reference_mean = ?fit.reference.mean,
            reference_std = ?fit.reference.std,
            "reinhard statistics gathered"
        );
        fit
    }

    /// Rescale a single L*a*b* pixel.
    pub fn apply_pixel(&self, px: [f32; 3]) -> [f32; 3] {
        let mut out = [0.0_f32; 3];
        for c in 0..3 {
            let scale = self.reference.std[c] / (self.target.std[c] + EPSILON);
            out[c] = ((px[c] as f64 - self.target.mean[c]) * scale + self.reference.mean[c]) as f32;
        }
        out
    }

    /// Mapping phase: rescale every pixel of `image`.
    pub fn apply(&self, image: &LabImage) -> LabImage {
        LabImage {
            width: image.width,
            height: image.height,
            pixels: image.pixels.par_iter().map(|&px| self.apply_pixel(px)).collect(),
        }
    }

    /// Flat channels on either side, as warnings.
    pub fn degenerate_channels(&self) -> Vec<TransferWarning> {
        let mut warnings = Vec::new();
        for (role, stats) in [
            (ImageRole::Target, &self.target),
            (ImageRole::Reference, &self.reference),
        ] {
            for c in 0..3 {
                if stats.is_flat(c) {
                    warnings.push(TransferWarning::DegenerateStatistics {
                        role,
                        channel: CHANNEL_NAMES[c],
                    });
                }
            }
        }
        warnings
    }
}

/// Full Reinhard transfer on all three L*a*b* channels.
pub fn transfer(target: &RgbImage, reference: &RgbImage) -> (RgbImage, Vec<TransferWarning>) {
    let t_lab = lab::to_perceptual(target);
    let r_lab = lab::to_perceptual(reference);
    let fit = ReinhardFit::fit(&t_lab, &r_lab);
    (lab::to_rgb(&fit.apply(&t_lab)), fit.degenerate_channels())
}

/// Reinhard transfer that keeps the target's lightness.
///
/// The full transfer is computed and quantized first; its a*/b* are then
/// recombined with the target's original L*.
pub fn transfer_preserving_luminance(
    target: &RgbImage,
    reference: &RgbImage,
) -> (RgbImage, Vec<TransferWarning>) {
    let (full, warnings) = transfer(target, reference);
    let mut combined = lab::to_perceptual(target);
    let full_lab = lab::to_perceptual(&full);

    combined
        .pixels
        .par_iter_mut()
        .zip(full_lab.pixels.par_iter())
        .for_each(|(dst, src)| {
            for c in CHROMA {
                dst[c] = src[c];
            }
        });
    debug_assert!(combined.pixels.iter().all(|px| px[LIGHTNESS].is_finite()));

    (lab::to_rgb(&combined), warnings)
}
