//! Threshold calibration
//!
//! This module turns labeled regions into per-color HSV threshold ranges
//! and persists them per lighting condition.

pub mod document;
pub mod label;
pub mod region;
pub mod thresholds;

pub use document::{CalibrationDocument, ThresholdStore};
pub use label::{CalibrationCondition, Label};
pub use region::{LabelRegions, Region, RegionSelection};
pub use thresholds::{HsvTriple, ThresholdRange, ThresholdSynthesizer};
