//! RGB/BGR to 8-bit HSV conversion
//!
//! Produces the compact HSV layout used by threshold documents:
//! - H in [0, 179] (degrees / 2, circular)
//! - S in [0, 255]
//! - V in [0, 255]

use image::{ImageBuffer, Rgb, RgbImage};
use palette::{FromColor, Hsv, Srgb};

use crate::constants::hue;
use crate::{CalibrationError, Result};

/// Converter between 8-bit RGB and 8-bit HSV
#[derive(Debug, Clone, Copy, Default)]
pub struct HsvConverter;

impl HsvConverter {
    pub fn new() -> Self {
        Self
    }

    /// Convert one RGB pixel (0-255 per channel) to `[h, s, v]`
    pub fn rgb_to_hsv(&self, r: u8, g: u8, b: u8) -> [u8; 3] {
        let srgb: Srgb<f32> = Srgb::new(r, g, b).into_format();
        let hsv: Hsv = Hsv::from_color(srgb);

        let degrees = hsv.hue.into_positive_degrees();
        // 359.x degrees rounds up to a full turn
        let h = ((degrees / 2.0).round() as i32).rem_euclid(hue::STEPS) as u8;
        let s = (hsv.saturation * 255.0).round().clamp(0.0, 255.0) as u8;
        let v = (hsv.value * 255.0).round().clamp(0.0, 255.0) as u8;

        [h, s, v]
    }

    /// Convert one BGR pixel to `[h, s, v]`
    pub fn bgr_to_hsv(&self, b: u8, g: u8, r: u8) -> [u8; 3] {
        self.rgb_to_hsv(r, g, b)
    }
}

/// Three-channel 8-bit image whose channels are H, S, V
#[derive(Debug, Clone, PartialEq)]
pub struct HsvImage {
    pixels: ImageBuffer<Rgb<u8>, Vec<u8>>,
}

impl HsvImage {
    /// Convert an RGB image
    pub fn from_rgb(image: &RgbImage) -> Self {
        let converter = HsvConverter::new();
        let (width, height) = image.dimensions();
        let pixels = ImageBuffer::from_fn(width, height, |x, y| {
            let [r, g, b] = image.get_pixel(x, y).0;
            Rgb(converter.rgb_to_hsv(r, g, b))
        });
        Self { pixels }
    }

    /// Convert a tightly packed, interleaved BGR byte buffer
    pub fn from_bgr_bytes(width: u32, height: u32, bgr: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if bgr.len() != expected {
            return Err(CalibrationError::InvalidImage {
                reason: format!(
                    "BGR buffer has {} bytes, expected {} for {}x{}",
                    bgr.len(),
                    expected,
                    width,
                    height
                ),
            });
        }

        let converter = HsvConverter::new();
        let data: Vec<u8> = bgr
            .chunks_exact(3)
            .flat_map(|px| converter.bgr_to_hsv(px[0], px[1], px[2]))
            .collect();

        Self::from_raw(width, height, data)
    }

    /// Wrap an interleaved buffer that already holds HSV values
    pub fn from_raw(width: u32, height: u32, hsv: Vec<u8>) -> Result<Self> {
        let len = hsv.len();
        let pixels = ImageBuffer::from_raw(width, height, hsv).ok_or_else(|| {
            CalibrationError::InvalidImage {
                reason: format!("HSV buffer of {} bytes does not fit {}x{}", len, width, height),
            }
        })?;
        Ok(Self { pixels })
    }

    /// Build an image by computing `[h, s, v]` for every pixel
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> [u8; 3],
    {
        Self {
            pixels: ImageBuffer::from_fn(width, height, |x, y| Rgb(f(x, y))),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// `[h, s, v]` at column `x`, row `y`; panics when out of bounds
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels.get_pixel(x, y).0
    }

    /// Iterate `[h, s, v]` triples in row-major order
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.pixels.pixels().map(|p| p.0)
    }
}

impl From<&RgbImage> for HsvImage {
    fn from(image: &RgbImage) -> Self {
        Self::from_rgb(image)
    }
}
