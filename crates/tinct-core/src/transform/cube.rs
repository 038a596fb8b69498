//! Identity cube generation and `.cube` encoding of a processed cube.
//!
//! An identity cube of level `L` is a square image of side `S = L³` holding
//! every point of an `R = L²` grid exactly once (`S² = R³`). Pixel `(x, y)`
//! has linear index `i = y × S + x`, and
//!
//! ```text
//! r = i mod R
//! g = (i / R) mod R
//! b = i / R²
//! ```
//!
//! Red varies fastest, blue slowest. The generator and the encoder both go
//! through [`grid_coordinate`], and the encoder stores each grid point at
//! [`CubeLut::entry_index`], so `.cube` entry order follows the grid and not
//! the pixel layout.

use tracing::debug;

use crate::error::{Result, TransferError};
use crate::image::{Rgb, RgbImage};
use crate::transform::lut::CubeLut;

/// Default cube level: 64³ grid in a 512×512 image.
pub const DEFAULT_LEVEL: u32 = 8;

/// Smallest level with more than one grid point per axis.
pub const MIN_LEVEL: u32 = 2;

/// Largest level accepted (4096×4096 image, 256³ grid).
pub const MAX_LEVEL: u32 = 16;

/// Dimensions derived from a cube level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CubeGeometry {
    /// Level `L`.
    pub level: u32,
    /// Grid points per axis, `L²`.
    pub resolution: u32,
    /// Image side in pixels, `L³`.
    pub side: u32,
}

impl CubeGeometry {
    /// Validate `level` and derive the grid and image sizes.
    pub fn from_level(level: u32) -> Result<Self> {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            return Err(TransferError::InvalidInput(format!(
                "cube level must be within [{MIN_LEVEL}, {MAX_LEVEL}], got {level}"
            )));
        }
        Ok(Self {
            level,
            resolution: level * level,
            side: level * level * level,
        })
    }

    /// Total grid points, `R³` (equal to `S²`).
    pub fn entries(&self) -> u64 {
        u64::from(self.resolution).pow(3)
    }
}

/// Grid coordinate `(r, g, b)` of linear index `index` on an `resolution`-grid.
#[inline]
pub fn grid_coordinate(index: u64, resolution: u32) -> [u32; 3] {
    let r = u64::from(resolution);
    [
        (index % r) as u32,
        ((index / r) % r) as u32,
        (index / (r * r)) as u32,
    ]
}

/// Synthesize the identity cube image for `level`.
///
/// Grid coordinate `c` becomes the 8-bit value `round(c × 255 / (R − 1))`.
pub fn generate_identity(level: u32) -> Result<RgbImage> {
    let geometry = CubeGeometry::from_level(level)?;
    let side = geometry.side;
    let resolution = geometry.resolution;
    let scale = 255.0 / (resolution - 1) as f64;
    debug!(level, resolution, side, "generating identity cube");

    Ok(RgbImage::from_fn(side, side, |x, y| {
        let index = u64::from(y) * u64::from(side) + u64::from(x);
        let coord = grid_coordinate(index, resolution);
        Rgb(coord.map(|c| (c as f64 * scale).round().clamp(0.0, 255.0) as u8))
    }))
}

/// Read a processed cube image back into a LUT.
///
/// The image must hold exactly `resolution³` pixels. Each pixel is located
/// on the grid with [`grid_coordinate`], using the image width as the row
/// stride, and stored at that grid point's LUT entry.
pub fn extract_lut(processed: &RgbImage, resolution: u32, title: &str) -> Result<CubeLut> {
    let expected = u64::from(resolution).pow(3);
    let actual = u64::from(processed.width()) * u64::from(processed.height());
    if resolution < 2 || actual != expected {
        return Err(TransferError::InvalidLutSize {
            resolution,
            expected,
            actual,
        });
    }

    let width = u64::from(processed.width());
    let mut data = vec![[0.0_f32; 3]; expected as usize];
    for (x, y, px) in processed.enumerate_pixels() {
        let index = u64::from(y) * width + u64::from(x);
        let entry = CubeLut::entry_index(resolution, grid_coordinate(index, resolution));
        data[entry] = px.0.map(|v| v as f32 / 255.0);
    }
    CubeLut::new(title, resolution, data)
}

/// Serialize a processed cube image to `.cube` text.
pub fn encode(processed: &RgbImage, resolution: u32, title: &str) -> Result<String> {
    let lut = extract_lut(processed, resolution, title)?;
    debug!(resolution, entries = lut.data.len(), "encoding cube LUT");
    Ok(lut.to_cube_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_for_default_level() {
        let g = CubeGeometry::from_level(DEFAULT_LEVEL).unwrap();
        assert_eq!(g.resolution, 64);
        assert_eq!(g.side, 512);
        assert_eq!(g.entries(), 262_144);
        assert_eq!(u64::from(g.side).pow(2), g.entries());
    }

    #[test]
    fn test_geometry_rejects_out_of_range_levels() {
        assert!(CubeGeometry::from_level(0).is_err());
        assert!(CubeGeometry::from_level(1).is_err());
        assert!(CubeGeometry::from_level(17).is_err());
    }

    #[test]
    fn test_grid_coordinate_is_red_fastest() {
        assert_eq!(grid_coordinate(0, 4), [0, 0, 0]);
        assert_eq!(grid_coordinate(1, 4), [1, 0, 0]);
        assert_eq!(grid_coordinate(4, 4), [0, 1, 0]);
        assert_eq!(grid_coordinate(16, 4), [0, 0, 1]);
        assert_eq!(grid_coordinate(63, 4), [3, 3, 3]);
    }

    #[test]
    fn test_identity_cube_level2_layout() {
        // R = 4, S = 8: each row of 8 pixels covers two red sweeps.
        let cube = generate_identity(2).unwrap();
        assert_eq!(cube.dimensions(), (8, 8));
        assert_eq!(cube.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(cube.get_pixel(1, 0).0, [85, 0, 0]);
        assert_eq!(cube.get_pixel(3, 0).0, [255, 0, 0]);
        assert_eq!(cube.get_pixel(4, 0).0, [0, 85, 0]);
        assert_eq!(cube.get_pixel(0, 2).0, [0, 0, 85]);
        assert_eq!(cube.get_pixel(7, 7).0, [255, 255, 255]);
    }

    #[test]
    fn test_identity_cube_has_every_color_once() {
        let cube = generate_identity(3).unwrap();
        let mut seen = std::collections::HashSet::new();
        for px in cube.pixels() {
            assert!(seen.insert(px.0), "duplicate {:?}", px.0);
        }
        assert_eq!(seen.len(), 729);
    }

    #[test]
    fn test_encode_rejects_wrong_pixel_count() {
        let cube = generate_identity(2).unwrap();
        let err = encode(&cube, 5, "x").unwrap_err();
        assert_eq!(
            err,
            TransferError::InvalidLutSize {
                resolution: 5,
                expected: 125,
                actual: 64
            }
        );
    }

    #[test]
    fn test_encode_identity_level2_lines() {
        let text = encode(&generate_identity(2).unwrap(), 4, "Identity").unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4 + 64);
        assert_eq!(lines[1], "LUT_3D_SIZE 4");
        assert_eq!(lines[4], "0.000000 0.000000 0.000000");
        assert_eq!(lines[4 + 1], "0.333333 0.000000 0.000000");
        assert_eq!(lines[4 + 4], "0.000000 0.333333 0.000000");
        assert_eq!(lines[4 + 16], "0.000000 0.000000 0.333333");
        assert_eq!(lines[4 + 63], "1.000000 1.000000 1.000000");
    }

    #[test]
    fn test_extract_lut_places_pixels_by_grid_coordinate() {
        // Tag each pixel with its own linear index so the entry it lands in
        // can be checked against grid_coordinate.
        let resolution = 4;
        let image = RgbImage::from_fn(8, 8, |x, y| Rgb([(y * 8 + x) as u8, 0, 0]));
        let lut = extract_lut(&image, resolution, "tagged").unwrap();
        for index in 0..64u64 {
            let entry = CubeLut::entry_index(resolution, grid_coordinate(index, resolution));
            assert_eq!(lut.data[entry][0], index as f32 / 255.0, "pixel {index}");
        }
    }

    #[test]
    fn test_extract_lut_from_identity_cube_is_identity() {
        let lut = extract_lut(&generate_identity(3).unwrap(), 9, "id").unwrap();
        let reference = CubeLut::identity(9).unwrap();
        for (a, b) in lut.data.iter().zip(&reference.data) {
            for c in 0..3 {
                assert!((a[c] - b[c]).abs() <= 0.5 / 255.0 + 1e-6, "{a:?} vs {b:?}");
            }
        }
    }
}
