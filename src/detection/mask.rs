//! Binary segmentation masks from stored thresholds
//!
//! Each threshold range produces an inclusion mask (every channel within
//! its inclusive bounds); the final mask is the union of all of them.
//! Ranges are trusted as loaded: no statistics, no clamping.

use image::{GrayImage, Luma, Rgb, RgbImage};

use crate::calibration::{CalibrationDocument, ThresholdRange};
use crate::color::HsvImage;
use crate::constants::mask::{EXCLUDED, INCLUDED};
use crate::{CalibrationError, Result};

/// Builds single-channel masks (0 or 255) the size of the input image
#[derive(Debug, Clone, Copy, Default)]
pub struct MaskBuilder;

impl MaskBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Union of the inclusion masks of every range in `document`
    pub fn build(&self, image: &HsvImage, document: &CalibrationDocument) -> GrayImage {
        let (width, height) = image.dimensions();
        let mut mask = GrayImage::from_pixel(width, height, Luma([EXCLUDED]));
        for range in document.ranges() {
            union_into(&mut mask, &self.range_mask(image, range));
        }
        mask
    }

    /// Pixels of `image` inside one range
    pub fn range_mask(&self, image: &HsvImage, range: &ThresholdRange) -> GrayImage {
        let (width, height) = image.dimensions();
        GrayImage::from_fn(width, height, |x, y| {
            if range.contains(image.get(x, y)) {
                Luma([INCLUDED])
            } else {
                Luma([EXCLUDED])
            }
        })
    }

    /// Keep the pixels of `image` selected by `mask`, blacking out the rest
    pub fn apply(&self, image: &RgbImage, mask: &GrayImage) -> Result<RgbImage> {
        if image.dimensions() != mask.dimensions() {
            return Err(CalibrationError::InvalidImage {
                reason: format!(
                    "mask is {:?} but image is {:?}",
                    mask.dimensions(),
                    image.dimensions()
                ),
            });
        }

        Ok(RgbImage::from_fn(image.width(), image.height(), |x, y| {
            if is_included(mask, x, y) {
                *image.get_pixel(x, y)
            } else {
                Rgb([0, 0, 0])
            }
        }))
    }
}

/// Bitwise OR of `other` into `mask`; both must have the same size
pub fn union_into(mask: &mut GrayImage, other: &GrayImage) {
    for (dst, src) in mask.pixels_mut().zip(other.pixels()) {
        dst.0[0] |= src.0[0];
    }
}

pub fn is_included(mask: &GrayImage, x: u32, y: u32) -> bool {
    mask.get_pixel(x, y).0[0] != EXCLUDED
}

/// Fraction of pixels set in `mask`, 0.0 for an empty image
pub fn coverage(mask: &GrayImage) -> f32 {
    let total = mask.width() as usize * mask.height() as usize;
    if total == 0 {
        return 0.0;
    }
    let set = mask.pixels().filter(|p| p.0[0] != EXCLUDED).count();
    set as f32 / total as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::HsvTriple;

    fn range(lo: [i32; 3], hi: [i32; 3]) -> ThresholdRange {
        ThresholdRange::new(
            HsvTriple::new(lo[0], lo[1], lo[2]),
            HsvTriple::new(hi[0], hi[1], hi[2]),
        )
    }

    #[test]
    fn test_empty_document_masks_nothing() {
        let image = HsvImage::from_fn(3, 2, |_, _| [10, 10, 10]);
        let mask = MaskBuilder::new().build(&image, &CalibrationDocument::new());
        assert_eq!(mask.dimensions(), (3, 2));
        assert_eq!(coverage(&mask), 0.0);
    }

    #[test]
    fn test_union_of_two_ranges() {
        // column 0 matches A only, column 1 matches B only, column 2 neither
        let image = HsvImage::from_fn(3, 2, |x, _| match x {
            0 => [5, 100, 100],
            1 => [175, 100, 100],
            _ => [90, 100, 100],
        });
        let a = range([0, 50, 50], [15, 255, 255]);
        let b = range([170, 50, 50], [179, 255, 255]);
        let document = CalibrationDocument::from_ranges(vec![a, b]);

        let builder = MaskBuilder::new();
        let mask = builder.build(&image, &document);
        let mask_a = builder.range_mask(&image, &a);
        let mask_b = builder.range_mask(&image, &b);

        for y in 0..2 {
            assert!(is_included(&mask, 0, y));
            assert!(is_included(&mask, 1, y));
            assert!(!is_included(&mask, 2, y));
            for x in 0..3 {
                let expected = is_included(&mask_a, x, y) || is_included(&mask_b, x, y);
                assert_eq!(is_included(&mask, x, y), expected);
            }
        }
        assert!(!is_included(&mask_a, 1, 0));
        assert!(!is_included(&mask_b, 0, 0));
    }

    #[test]
    fn test_bounds_are_inclusive_on_every_channel() {
        let image = HsvImage::from_fn(4, 1, |x, _| match x {
            0 => [10, 20, 30],
            1 => [20, 40, 60],
            2 => [20, 41, 60],
            _ => [9, 30, 40],
        });
        let mask = MaskBuilder::new().range_mask(&image, &range([10, 20, 30], [20, 40, 60]));
        let row: Vec<u8> = mask.pixels().map(|p| p.0[0]).collect();
        assert_eq!(row, vec![INCLUDED, INCLUDED, EXCLUDED, EXCLUDED]);
    }

    #[test]
    fn test_apply_blacks_out_excluded_pixels() {
        let rgb = RgbImage::from_pixel(2, 1, Rgb([200, 100, 50]));
        let mut mask = GrayImage::new(2, 1);
        mask.put_pixel(1, 0, Luma([INCLUDED]));

        let out = MaskBuilder::new().apply(&rgb, &mask).unwrap();
        assert_eq!(out.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(out.get_pixel(1, 0), &Rgb([200, 100, 50]));

        assert!(MaskBuilder::new().apply(&rgb, &GrayImage::new(1, 1)).is_err());
    }
}
