//! Image decoding and encoding at the host boundary.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat};
use tinct_core::RgbImage;
use tracing::debug;

/// Load an image from disk as 8-bit RGB.
///
/// Supports common formats via the `image` crate (PNG, JPEG, TIFF, ...).
/// Alpha is dropped and higher bit depths are reduced to 8 bits.
pub fn load_image(path: &Path) -> Result<RgbImage, ImageLoadError> {
    let bytes = std::fs::read(path)?;
    let rgb = decode_image(&bytes)?;
    debug!(path = %path.display(), width = rgb.width(), height = rgb.height(), "decoded image");
    Ok(rgb)
}

/// Decode an in-memory encoded image as 8-bit RGB. The format is sniffed
/// from the leading bytes.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, ImageLoadError> {
    let img = image::load_from_memory(bytes).map_err(ImageLoadError::Decode)?;
    Ok(to_rgb8(img))
}

/// Encode an image as PNG bytes.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, ImageLoadError> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(ImageLoadError::Encode)?;
    Ok(buf.into_inner())
}

/// Write an image to disk as PNG.
pub fn save_png(image: &RgbImage, path: &Path) -> Result<(), ImageLoadError> {
    std::fs::write(path, encode_png(image)?)?;
    Ok(())
}

fn to_rgb8(img: DynamicImage) -> RgbImage {
    match img {
        DynamicImage::ImageRgb8(rgb) => rgb,
        other => other.to_rgb8(),
    }
}

/// Errors that can occur while reading or writing images.
#[derive(Debug, thiserror::Error)]
pub enum ImageLoadError {
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),
    #[error("failed to encode image: {0}")]
    Encode(image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
