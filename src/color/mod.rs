//! Color space conversion and region statistics
//!
//! This module converts camera frames to 8-bit HSV and computes per-channel
//! statistics over the regions a user selected for each color label.

pub mod analysis;
pub mod channel;
pub mod conversion;

pub use analysis::{ChannelAccumulator, ChannelStatistics, HsvAccumulator, LabelStatistics, RegionAnalyzer};
pub use channel::Channel;
pub use conversion::{HsvConverter, HsvImage};
