//! sRGB ↔ CIE L*a*b* conversion.
//!
//! Fixed assumptions: sRGB primaries with the IEC 61966-2-1 transfer curve,
//! D65 reference white. Changing either changes every numeric fixture.
//!
//! ```text
//! to_perceptual: u8 → [0,1] → decode sRGB → linear RGB → XYZ(D65) → L*a*b*
//! to_rgb:        L*a*b* → XYZ(D65) → linear RGB → clip [0,1] → encode sRGB → round to u8
//! ```
//!
//! Round trips are not bit-exact, but an 8-bit value survives a round trip
//! within one code value.

use palette::convert::FromColorUnclamped;
use palette::{Lab, LinSrgb, Srgb};
use rayon::prelude::*;

use crate::image::{LabImage, RgbImage, quantize};

/// Index of the lightness channel in a `[L, a, b]` triple.
pub const LIGHTNESS: usize = 0;

/// Indices of the two chroma channels in a `[L, a, b]` triple.
pub const CHROMA: [usize; 2] = [1, 2];

/// Display names of the L*a*b* channels, for diagnostics.
pub const CHANNEL_NAMES: [&str; 3] = ["L*", "a*", "b*"];

/// Convert one 8-bit sRGB pixel to L*a*b*.
pub fn rgb_to_lab_pixel(rgb: [u8; 3]) -> [f32; 3] {
    let encoded: Srgb<f32> = Srgb::new(rgb[0], rgb[1], rgb[2]).into_format();
    let linear: LinSrgb<f32> = encoded.into_linear();
    let lab: Lab = Lab::from_color_unclamped(linear);
    [lab.l, lab.a, lab.b]
}

/// Convert one L*a*b* pixel to 8-bit sRGB, clipping out-of-gamut values.
pub fn lab_to_rgb_pixel(lab: [f32; 3]) -> [u8; 3] {
    let lab: Lab = Lab::new(lab[0], lab[1], lab[2]);
    let linear: LinSrgb<f32> = LinSrgb::from_color_unclamped(lab);
    let clipped = LinSrgb::new(clip_unit(linear.red), clip_unit(linear.green), clip_unit(linear.blue));
    let encoded: Srgb<f32> = Srgb::from_linear(clipped);
    [
        quantize(encoded.red * 255.0),
        quantize(encoded.green * 255.0),
        quantize(encoded.blue * 255.0),
    ]
}

/// Convert a whole 8-bit image to L*a*b*.
pub fn to_perceptual(image: &RgbImage) -> LabImage {
    let pixels = image
        .as_raw()
        .par_chunks_exact(3)
        .map(|px| rgb_to_lab_pixel([px[0], px[1], px[2]]))
        .collect();
    LabImage {
        width: image.width(),
        height: image.height(),
        pixels,
    }
}

/// Convert a whole L*a*b* image back to 8-bit sRGB.
pub fn to_rgb(lab: &LabImage) -> RgbImage {
    let mut out = RgbImage::new(lab.width, lab.height);
    let buf: &mut [u8] = &mut out;
    buf.par_chunks_exact_mut(3)
        .zip(lab.pixels.par_iter())
        .for_each(|(dst, &px)| dst.copy_from_slice(&lab_to_rgb_pixel(px)));
    out
}

// Clipping in linear light is equivalent to clipping the encoded value:
// the sRGB curve is monotonic and fixes 0 and 1.
#[inline]
fn clip_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}
