//! Image representations for the transfer pipeline.
//!
//! Device images at the boundary are plain 8-bit `image::RgbImage` buffers.
//! Perceptual math runs on [`LabImage`], a float raster in CIE L*a*b*.

pub use image::{Rgb, RgbImage};

use crate::error::{ImageRole, Result, TransferError};

/// Float raster in CIE L*a*b* (D65). Channel order is always `[L, a, b]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LabImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixel data, row-major. Length = width × height.
    pub pixels: Vec<[f32; 3]>,
}

impl LabImage {
    /// Copy one channel out as a flat sample vector.
    pub fn channel(&self, channel: usize) -> Vec<f32> {
        self.pixels.iter().map(|px| px[channel]).collect()
    }

    /// Overwrite one channel from a flat sample slice of matching length.
    pub fn set_channel(&mut self, channel: usize, values: &[f32]) {
        debug_assert_eq!(values.len(), self.pixels.len());
        for (px, &v) in self.pixels.iter_mut().zip(values) {
            px[channel] = v;
        }
    }
}

/// Copy one channel of an 8-bit RGB image out as float samples in `[0, 255]`.
pub fn rgb_channel(image: &RgbImage, channel: usize) -> Vec<f32> {
    image.pixels().map(|px| px.0[channel] as f32).collect()
}

/// Reject images the engine cannot process.
pub fn validate_rgb(image: &RgbImage, role: ImageRole) -> Result<()> {
    if image.width() == 0 || image.height() == 0 {
        return Err(TransferError::InvalidInput(format!(
            "{role} image is empty ({}x{})",
            image.width(),
            image.height()
        )));
    }
    Ok(())
}

/// Reject a pair of images whose dimensions differ.
pub fn ensure_same_dimensions(a: &RgbImage, b: &RgbImage) -> Result<()> {
    if a.dimensions() != b.dimensions() {
        return Err(TransferError::InvalidInput(format!(
            "dimension mismatch: {}x{} vs {}x{}",
            a.width(),
            a.height(),
            b.width(),
            b.height()
        )));
    }
    Ok(())
}

/// Round a float sample to the nearest 8-bit value, clamped to `[0, 255]`.
#[inline]
pub(crate) fn quantize(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}
