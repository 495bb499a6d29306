//! # HSV Calibration
//!
//! A Rust crate for deriving color-segmentation thresholds from labeled
//! image regions and reusing them to mask later frames.
//!
//! This library provides:
//! - Per-label channel statistics (min, max, mean, sample stddev) over
//!   user-selected rectangles
//! - Threshold ranges of `mean ± k·stddev`, with hue wraparound split into
//!   two ranges
//! - YAML threshold documents, one per lighting condition
//! - Binary masks built from the union of stored ranges
//!
//! ## Example
//!
//! ```rust,no_run
//! use hsv_calibration::{
//!     build_mask, calibrate_and_save, image_loader, CalibrationCondition, CalibrationConfig,
//!     Label, LabelRegions, Region, ThresholdStore,
//! };
//! use std::path::Path;
//!
//! let config = CalibrationConfig::default();
//! let frame = image_loader::load_hsv(Path::new("frame.png"))?;
//!
//! let mut regions = LabelRegions::new();
//! regions.push(Label::Red, Region::new(40, 30, 16, 16));
//! calibrate_and_save(&frame, &regions, CalibrationCondition::Sunny, &config)?;
//!
//! let thresholds = ThresholdStore::from_config(&config).load_or_empty(CalibrationCondition::Sunny);
//! let mask = build_mask(&frame, &thresholds);
//! println!("mask: {}x{}", mask.width(), mask.height());
//! # Ok::<(), hsv_calibration::CalibrationError>(())
//! ```

use std::path::PathBuf;

use image::GrayImage;

pub mod calibration;
pub mod color;
pub mod config;
pub mod constants;
pub mod detection;
pub mod error;
pub mod image_loader;

pub use calibration::{
    CalibrationCondition, CalibrationDocument, HsvTriple, Label, LabelRegions, Region,
    RegionSelection, ThresholdRange, ThresholdStore, ThresholdSynthesizer,
};
pub use color::{Channel, ChannelStatistics, HsvImage, LabelStatistics, RegionAnalyzer};
pub use config::{CalibrationConfig, RegionPolicy};
pub use detection::MaskBuilder;
pub use error::{CalibrationError, Result};

/// Build the threshold document for `regions` over `image`
///
/// Pure: nothing is written. Labels without pixels are skipped.
///
/// # Errors
///
/// Returns `RegionOutOfBounds` when the config rejects regions that
/// extend past the image.
pub fn calibrate(
    image: &HsvImage,
    regions: &LabelRegions,
    config: &CalibrationConfig,
) -> Result<CalibrationDocument> {
    CalibrationDocument::build(image, regions, config)
}

/// Build the threshold document and persist it for `condition` in the
/// configured storage directory, returning the written path
pub fn calibrate_and_save(
    image: &HsvImage,
    regions: &LabelRegions,
    condition: CalibrationCondition,
    config: &CalibrationConfig,
) -> Result<PathBuf> {
    config.validate()?;
    let document = calibrate(image, regions, config)?;
    ThresholdStore::from_config(config).save(condition, &document)
}

/// Mask of the pixels of `image` inside any range of `document`
pub fn build_mask(image: &HsvImage, document: &CalibrationDocument) -> GrayImage {
    MaskBuilder::new().build(image, document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_calibrate_then_mask_selects_calibrated_color() {
        let image = HsvImage::from_fn(8, 8, |x, _| if x < 4 { [60, 200, 200] } else { [120, 200, 200] });
        let mut regions = LabelRegions::new();
        regions.push(Label::Green, Region::new(0, 0, 2, 2));

        let document = calibrate(&image, &regions, &CalibrationConfig::default()).unwrap();
        assert_eq!(document.len(), 1);

        let mask = build_mask(&image, &document);
        for (x, _, px) in mask.enumerate_pixels() {
            assert_eq!(px.0[0] != 0, x < 4);
        }
    }

    #[test]
    fn test_calibrate_and_save_writes_condition_file() {
        let dir = tempdir().unwrap();
        let config = CalibrationConfig {
            storage_dir: dir.path().to_path_buf(),
            ..CalibrationConfig::default()
        };
        let image = HsvImage::from_fn(2, 2, |_, _| [30, 30, 30]);
        let mut regions = LabelRegions::new();
        regions.push(Label::Yellow, Region::new(0, 0, 2, 2));

        let path =
            calibrate_and_save(&image, &regions, CalibrationCondition::Overcast, &config).unwrap();
        assert_eq!(path, dir.path().join("overcast.yml"));
        let loaded = ThresholdStore::new(dir.path()).load(CalibrationCondition::Overcast).unwrap();
        assert_eq!(loaded.len(), 1);
    }
}
