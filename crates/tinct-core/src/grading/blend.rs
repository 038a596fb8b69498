//! Intensity blend between the untouched target and the fully graded result.
//!
//! ```text
//! out = original × (1 − intensity) + transferred × intensity
//! ```
//!
//! The endpoints are short-circuited: `intensity = 0` returns the original
//! and `intensity = 1` the transferred image, byte for byte.

use rayon::prelude::*;

use crate::error::{Result, TransferError};
use crate::image::{RgbImage, ensure_same_dimensions, quantize};

/// Blend `transferred` over `original` by `intensity ∈ [0, 1]`.
pub fn blend(original: &RgbImage, transferred: &RgbImage, intensity: f32) -> Result<RgbImage> {
    if !(0.0..=1.0).contains(&intensity) {
        return Err(TransferError::InvalidInput(format!(
            "intensity must be within [0, 1], got {intensity}"
        )));
    }
    ensure_same_dimensions(original, transferred)?;

    if intensity == 0.0 {
        return Ok(original.clone());
    }
    if intensity == 1.0 {
        return Ok(transferred.clone());
    }

    let keep = 1.0 - intensity;
    let mut out = RgbImage::new(original.width(), original.height());
    let buf: &mut [u8] = &mut out;
    buf.par_iter_mut()
        .zip(original.as_raw().par_iter().zip(transferred.as_raw().par_iter()))
        .for_each(|(dst, (&a, &b))| {
            *dst = quantize(a as f32 * keep + b as f32 * intensity);
        });
    Ok(out)
}
