//! 3D LUT model, `.cube` text serialization, and trilinear application.
//!
//! Entry order is the identity-cube traversal order: red varies fastest,
//! then green, then blue. Entry `i` holds the output color for grid point
//! `(i mod N, (i / N) mod N, i / N²)`.

use std::fmt::Write as _;

use rayon::prelude::*;

use crate::error::{Result, TransferError};
use crate::image::{RgbImage, quantize};

/// Largest grid size accepted when parsing.
pub const MAX_CUBE_SIZE: u32 = 256;

/// A 3D lookup table mapping input RGB to output RGB on a regular grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeLut {
    /// Title written on the `TITLE` line.
    pub title: String,
    /// Grid size per axis. Length of `data` = size³.
    pub size: u32,
    /// Minimum domain values per channel.
    pub domain_min: [f32; 3],
    /// Maximum domain values per channel.
    pub domain_max: [f32; 3],
    /// Output colors in traversal order, normalized to the domain.
    pub data: Vec<[f32; 3]>,
}

impl CubeLut {
    /// A LUT over the unit domain. Fails if `size < 2` or `data` is not
    /// `size³` long.
    pub fn new(title: impl Into<String>, size: u32, data: Vec<[f32; 3]>) -> Result<Self> {
        if size < 2 {
            return Err(TransferError::InvalidInput(format!(
                "LUT size must be at least 2, got {size}"
            )));
        }
        let expected = u64::from(size).pow(3);
        if data.len() as u64 != expected {
            return Err(TransferError::InvalidLutSize {
                resolution: size,
                expected,
                actual: data.len() as u64,
            });
        }
        Ok(Self {
            title: title.into(),
            size,
            domain_min: [0.0; 3],
            domain_max: [1.0; 3],
            data,
        })
    }

    /// The no-op LUT of the given size.
    pub fn identity(size: u32) -> Result<Self> {
        let n = size as usize;
        let step = 1.0 / size.saturating_sub(1).max(1) as f32;
        let data = (0..n * n * n)
            .map(|i| {
                [
                    (i % n) as f32 * step,
                    ((i / n) % n) as f32 * step,
                    (i / (n * n)) as f32 * step,
                ]
            })
            .collect();
        Self::new("Identity", size, data)
    }

    /// Serialize to `.cube` text.
    pub fn to_cube_string(&self) -> String {
        // ~27 bytes per entry line
        let mut out = String::with_capacity(128 + self.data.len() * 27);
        let _ = writeln!(out, "TITLE \"{}\"", sanitize_title(&self.title));
        let _ = writeln!(out, "LUT_3D_SIZE {}", self.size);
        let _ = writeln!(
            out,
            "DOMAIN_MIN {:.1} {:.1} {:.1}",
            self.domain_min[0], self.domain_min[1], self.domain_min[2]
        );
        let _ = writeln!(
            out,
            "DOMAIN_MAX {:.1} {:.1} {:.1}",
            self.domain_max[0], self.domain_max[1], self.domain_max[2]
        );
        for [r, g, b] in &self.data {
            let _ = writeln!(out, "{r:.6} {g:.6} {b:.6}");
        }
        out
    }

    /// Parse `.cube` text.
    ///
    /// Accepts `TITLE`, `LUT_3D_SIZE`, `DOMAIN_MIN`, `DOMAIN_MAX`, `#`
    /// comments and blank lines. 1D LUTs are rejected.
    pub fn from_cube_str(text: &str) -> Result<Self> {
        let mut title = String::new();
        let mut size: Option<u32> = None;
        let mut domain_min = [0.0_f32; 3];
        let mut domain_max = [1.0_f32; 3];
        let mut data = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let malformed = |reason: String| TransferError::MalformedCube {
                line: line_no,
                reason,
            };

            if let Some(rest) = line.strip_prefix("TITLE") {
                title = rest.trim().trim_matches('"').to_owned();
            } else if let Some(rest) = line.strip_prefix("LUT_3D_SIZE") {
                let n: u32 = rest
                    .trim()
                    .parse()
                    .map_err(|e| malformed(format!("bad LUT_3D_SIZE: {e}")))?;
                if !(2..=MAX_CUBE_SIZE).contains(&n) {
                    return Err(malformed(format!("LUT_3D_SIZE {n} outside [2, {MAX_CUBE_SIZE}]")));
                }
                size = Some(n);
            } else if let Some(rest) = line.strip_prefix("DOMAIN_MIN") {
                domain_min = parse_triple(rest).map_err(malformed)?;
            } else if let Some(rest) = line.strip_prefix("DOMAIN_MAX") {
                domain_max = parse_triple(rest).map_err(malformed)?;
            } else if line.starts_with("LUT_1D_SIZE") {
                return Err(malformed("expected a 3D LUT, got 1D".into()));
            } else if line.starts_with(|c: char| c.is_ascii_alphabetic()) {
                // Unknown keywords (e.g. LUT_3D_INPUT_RANGE) are skipped.
                continue;
            } else {
                data.push(parse_triple(line).map_err(malformed)?);
            }
        }

        let Some(size) = size else {
            return Err(TransferError::MalformedCube {
                line: 0,
                reason: "missing LUT_3D_SIZE".into(),
            });
        };
        let mut lut = Self::new(title, size, data)?;
        lut.domain_min = domain_min;
        lut.domain_max = domain_max;
        Ok(lut)
    }

    /// Position of grid point `[r, g, b]` in `data` for a LUT of `size`.
    #[inline]
    pub fn entry_index(size: u32, [r, g, b]: [u32; 3]) -> usize {
        let s = size as usize;
        r as usize + g as usize * s + b as usize * s * s
    }

    /// Look up one RGB triple (in domain units) with trilinear interpolation.
    /// Inputs outside the domain are clamped to its edge.
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let s = self.size as usize;
        let n = (s - 1) as f32;

        let mut coords = [0.0_f32; 3];
        for c in 0..3 {
            let range = self.domain_max[c] - self.domain_min[c];
            let t = if range.abs() < 1e-10 {
                0.0
            } else {
                ((rgb[c] - self.domain_min[c]) / range).clamp(0.0, 1.0)
            };
            coords[c] = t * n;
        }

        let r0 = (coords[0] as usize).min(s - 2);
        let g0 = (coords[1] as usize).min(s - 2);
        let b0 = (coords[2] as usize).min(s - 2);
        let fr = coords[0] - r0 as f32;
        let fg = coords[1] - g0 as f32;
        let fb = coords[2] - b0 as f32;

        let at = |r: usize, g: usize, b: usize| {
            self.data[Self::entry_index(self.size, [r as u32, g as u32, b as u32])]
        };
        let c000 = at(r0, g0, b0);
        let c100 = at(r0 + 1, g0, b0);
        let c010 = at(r0, g0 + 1, b0);
        let c110 = at(r0 + 1, g0 + 1, b0);
        let c001 = at(r0, g0, b0 + 1);
        let c101 = at(r0 + 1, g0, b0 + 1);
        let c011 = at(r0, g0 + 1, b0 + 1);
        let c111 = at(r0 + 1, g0 + 1, b0 + 1);

        let mut out = [0.0_f32; 3];
        for c in 0..3 {
            let c00 = c000[c] + (c100[c] - c000[c]) * fr;
            let c10 = c010[c] + (c110[c] - c010[c]) * fr;
            let c01 = c001[c] + (c101[c] - c001[c]) * fr;
            let c11 = c011[c] + (c111[c] - c011[c]) * fr;
            let c0 = c00 + (c10 - c00) * fg;
            let c1 = c01 + (c11 - c01) * fg;
            out[c] = c0 + (c1 - c0) * fb;
        }
        out
    }

    /// Apply the LUT to every pixel of an 8-bit image.
    ///
    /// Pixels are mapped into the unit cube as `value / 255`; the LUT's
    /// domain should therefore be the unit domain.
    pub fn apply_image(&self, image: &RgbImage) -> RgbImage {
        let mut out = RgbImage::new(image.width(), image.height());
        let buf: &mut [u8] = &mut out;
        buf.par_chunks_exact_mut(3)
            .zip(image.as_raw().par_chunks_exact(3))
            .for_each(|(dst, src)| {
                let rgb = [src[0] as f32 / 255.0, src[1] as f32 / 255.0, src[2] as f32 / 255.0];
                let mapped = self.apply(rgb);
                for c in 0..3 {
                    dst[c] = quantize(mapped[c] * 255.0);
                }
            });
        out
    }
}

/// Keep the title on one line and inside its quotes.
fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| match c {
            '"' => '\'',
            '\r' | '\n' => ' ',
            other => other,
        })
        .collect()
}

fn parse_triple(text: &str) -> std::result::Result<[f32; 3], String> {
    let mut values = [0.0_f32; 3];
    let mut parts = text.split_whitespace();
    for v in &mut values {
        let token = parts.next().ok_or_else(|| format!("expected 3 values in '{text}'"))?;
        *v = token
            .parse()
            .map_err(|e| format!("bad number '{token}': {e}"))?;
    }
    if parts.next().is_some() {
        return Err(format!("expected 3 values in '{text}'"));
    }
    Ok(values)
}
