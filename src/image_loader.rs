//! Image loading for calibration and masking
//!
//! Decodes common formats through the `image` crate and hands back 8-bit
//! RGB buffers, or converts straight to [`HsvImage`].
//!
//! Supported: JPEG, PNG, GIF (first frame), WebP, TIFF, BMP, TGA, PNM, QOI.

use image::{DynamicImage, ImageReader, RgbImage};
use std::path::Path;

use crate::color::HsvImage;
use crate::error::{CalibrationError, Result};

/// Extensions accepted by [`load_image`], lowercase
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "tiff", "tif", "bmp", "tga", "pbm", "pgm", "ppm", "pnm",
    "qoi",
];

/// Check if a file extension is supported, ignoring case
pub fn is_supported_extension(ext: &str) -> bool {
    SUPPORTED_EXTENSIONS
        .iter()
        .any(|supported| supported.eq_ignore_ascii_case(ext))
}

/// Load an image from disk as 8-bit RGB
///
/// # Errors
///
/// Returns `CalibrationError::ImageLoadError` if:
/// - The extension is not a supported format
/// - File cannot be opened
/// - Decoding fails
pub fn load_image(path: &Path) -> Result<RgbImage> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    if !is_supported_extension(ext) {
        return Err(CalibrationError::ImageLoadError {
            message: format!("Unknown image format for file: {}", path.display()),
            source: None,
        });
    }

    let reader = ImageReader::open(path).map_err(|e| {
        CalibrationError::image_load(format!("Failed to open image file: {}", path.display()), e)
    })?;

    let img: DynamicImage = reader.decode().map_err(|e| {
        CalibrationError::image_load(format!("Failed to decode image: {}", path.display()), e)
    })?;

    let rgb = img.to_rgb8();
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(CalibrationError::InvalidImage {
            reason: format!("{} has no pixels", path.display()),
        });
    }

    tracing::debug!(path = %path.display(), width = rgb.width(), height = rgb.height(), "loaded image");
    Ok(rgb)
}

/// Load an image from disk and convert it to HSV
pub fn load_hsv(path: &Path) -> Result<HsvImage> {
    load_image(path).map(|rgb| HsvImage::from_rgb(&rgb))
}
