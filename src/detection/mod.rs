//! Threshold-based segmentation
//!
//! This module rebuilds binary masks from stored threshold documents.

pub mod mask;

pub use mask::MaskBuilder;
