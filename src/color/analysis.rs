//! Per-label channel statistics over selected regions
//!
//! Scans every pixel covered by every region of a label and reports, for
//! each HSV channel, the min, max, mean and sample standard deviation.
//!
//! - Regions are visited outer, pixels inner, so pixels shared by two
//!   overlapping regions are sampled once per region.
//! - Accumulation is integer-only (count, sum, sum of squares), so the
//!   result does not depend on scan order and partial scans can be merged.
//! - A label that covers no pixels yields `None` rather than zeroed stats.

use tracing::{debug, warn};

use super::{Channel, HsvImage};
use crate::calibration::{Label, LabelRegions, Region};
use crate::config::RegionPolicy;
use crate::{CalibrationError, Result};

/// Summary of one channel over a label's pixels, truncated to integers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelStatistics {
    pub min: i32,
    pub max: i32,
    pub mean: i32,
    pub stddev: i32,
}

/// Statistics of all three channels for one label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelStatistics {
    pub hue: ChannelStatistics,
    pub saturation: ChannelStatistics,
    pub value: ChannelStatistics,
    /// Number of samples, counting overlapping pixels once per region
    pub pixel_count: u64,
}

impl LabelStatistics {
    pub fn channel(&self, channel: Channel) -> &ChannelStatistics {
        match channel {
            Channel::Hue => &self.hue,
            Channel::Saturation => &self.saturation,
            Channel::Value => &self.value,
        }
    }
}

/// Running min/max/sum/sum-of-squares for one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelAccumulator {
    count: u64,
    sum: u64,
    sum_sq: u64,
    min: u8,
    max: u8,
}

impl Default for ChannelAccumulator {
    fn default() -> Self {
        Self {
            count: 0,
            sum: 0,
            sum_sq: 0,
            min: u8::MAX,
            max: u8::MIN,
        }
    }
}

impl ChannelAccumulator {
    pub fn push(&mut self, sample: u8) {
        let s = sample as u64;
        self.count += 1;
        self.sum += s;
        self.sum_sq += s * s;
        self.min = self.min.min(sample);
        self.max = self.max.max(sample);
    }

    /// Combine with an accumulator over a disjoint set of samples
    pub fn merge(&mut self, other: &ChannelAccumulator) {
        self.count += other.count;
        self.sum += other.sum;
        self.sum_sq += other.sum_sq;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Final statistics, `None` when no sample was pushed
    ///
    /// The standard deviation uses N-1 normalization; with a single
    /// sample it is 0.
    pub fn finish(&self) -> Option<ChannelStatistics> {
        if self.count == 0 {
            return None;
        }

        let n = self.count as u128;
        let sum = self.sum as u128;
        let mean = self.sum as f64 / self.count as f64;

        let stddev = if self.count > 1 {
            // n * sum((x - mean)^2) == n * sum_sq - sum^2, exact in integers
            let scaled = (n * self.sum_sq as u128).saturating_sub(sum * sum);
            let variance = scaled as f64 / (n * (n - 1)) as f64;
            variance.sqrt()
        } else {
            0.0
        };

        Some(ChannelStatistics {
            min: self.min as i32,
            max: self.max as i32,
            mean: mean as i32,
            stddev: stddev as i32,
        })
    }
}

/// Accumulators for all three channels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HsvAccumulator {
    channels: [ChannelAccumulator; 3],
}

impl HsvAccumulator {
    pub fn push(&mut self, pixel: [u8; 3]) {
        for (acc, sample) in self.channels.iter_mut().zip(pixel) {
            acc.push(sample);
        }
    }

    pub fn merge(&mut self, other: &HsvAccumulator) {
        for (acc, rhs) in self.channels.iter_mut().zip(other.channels.iter()) {
            acc.merge(rhs);
        }
    }

    pub fn count(&self) -> u64 {
        self.channels[Channel::Hue.index()].count()
    }

    pub fn finish(&self) -> Option<LabelStatistics> {
        Some(LabelStatistics {
            hue: self.channels[Channel::Hue.index()].finish()?,
            saturation: self.channels[Channel::Saturation.index()].finish()?,
            value: self.channels[Channel::Value.index()].finish()?,
            pixel_count: self.count(),
        })
    }
}

/// Computes [`LabelStatistics`] from labeled regions over an HSV image
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionAnalyzer {
    policy: RegionPolicy,
}

impl RegionAnalyzer {
    /// Create an analyzer that clips regions to the image
    pub fn new() -> Self {
        Self {
            policy: RegionPolicy::Clip,
        }
    }

    /// Create an analyzer with an explicit out-of-bounds policy
    pub fn with_policy(policy: RegionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RegionPolicy {
        self.policy
    }

    /// Statistics for one label, `None` if its regions cover no pixels
    ///
    /// # Errors
    ///
    /// Returns `RegionOutOfBounds` under [`RegionPolicy::Reject`] when a
    /// region extends past the image.
    pub fn analyze_label(
        &self,
        image: &HsvImage,
        label: Label,
        regions: &[Region],
    ) -> Result<Option<LabelStatistics>> {
        // Fresh per label so nothing leaks between labels
        let mut acc = HsvAccumulator::default();

        for region in regions {
            let Some(region) = self.resolve(image, label, region)? else {
                continue;
            };
            acc.merge(&scan_region(image, &region));
        }

        let stats = acc.finish();
        match &stats {
            Some(s) => debug!(
                %label,
                pixels = s.pixel_count,
                h_mean = s.hue.mean,
                h_stddev = s.hue.stddev,
                s_mean = s.saturation.mean,
                v_mean = s.value.mean,
                "label statistics"
            ),
            None => debug!(%label, regions = regions.len(), "label covers no pixels"),
        }
        Ok(stats)
    }

    /// Statistics for every label in processing order
    pub fn analyze_all(
        &self,
        image: &HsvImage,
        regions: &LabelRegions,
    ) -> Result<Vec<(Label, Option<LabelStatistics>)>> {
        regions
            .iter()
            .map(|(label, list)| Ok((label, self.analyze_label(image, label, list)?)))
            .collect()
    }

    /// Apply the out-of-bounds policy to a region
    fn resolve(&self, image: &HsvImage, label: Label, region: &Region) -> Result<Option<Region>> {
        let (width, height) = image.dimensions();
        if region.fits_within(width, height) {
            return Ok(Some(*region));
        }

        match self.policy {
            RegionPolicy::Reject => Err(CalibrationError::RegionOutOfBounds {
                label,
                region: *region,
                width,
                height,
            }),
            RegionPolicy::Clip => {
                let clipped = region.clip_to(width, height);
                warn!(%label, ?region, ?clipped, width, height, "region clipped to image bounds");
                Ok(clipped)
            }
        }
    }
}

/// Accumulate every pixel of an in-bounds region
fn scan_region(image: &HsvImage, region: &Region) -> HsvAccumulator {
    let mut acc = HsvAccumulator::default();
    let x0 = region.x as u32;
    let y0 = region.y as u32;
    for y in y0..y0 + region.height {
        for x in x0..x0 + region.width {
            acc.push(image.get(x, y));
        }
    }
    acc
}
