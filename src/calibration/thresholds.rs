//! Threshold range synthesis
//!
//! Turns a label's channel statistics into one or two inclusive HSV boxes
//! of `mean ± k·stddev` per channel.
//!
//! Saturation and value are clamped to [0, 255]. Hue is circular over
//! [0, 179]: when the interval crosses the seam it is emitted as two
//! non-wrapping boxes, one hugging 0 and one hugging 179. Existing
//! threshold files depend on the exact bounds produced here, so the
//! split stays an approximation of the circular wedge.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::{Channel, LabelStatistics};
use crate::constants::hue;

/// Integer bound per HSV channel, persisted as `{ h, s, v }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HsvTriple {
    pub h: i32,
    pub s: i32,
    pub v: i32,
}

impl HsvTriple {
    pub fn new(h: i32, s: i32, v: i32) -> Self {
        Self { h, s, v }
    }

    pub fn get(&self, channel: Channel) -> i32 {
        match channel {
            Channel::Hue => self.h,
            Channel::Saturation => self.s,
            Channel::Value => self.v,
        }
    }

    /// True when every component lies inside its channel domain
    pub fn in_domain(&self) -> bool {
        Channel::ALL
            .into_iter()
            .all(|c| (0..=c.max_value()).contains(&self.get(c)))
    }
}

/// Inclusive lower/upper HSV bounds used as a pixel inclusion test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThresholdRange {
    pub mins: HsvTriple,
    pub maxs: HsvTriple,
}

impl ThresholdRange {
    pub fn new(mins: HsvTriple, maxs: HsvTriple) -> Self {
        Self { mins, maxs }
    }

    /// True if every channel of `pixel` lies within the bounds
    pub fn contains(&self, pixel: [u8; 3]) -> bool {
        Channel::ALL.into_iter().all(|c| {
            let sample = pixel[c.index()] as i32;
            self.mins.get(c) <= sample && sample <= self.maxs.get(c)
        })
    }
}

/// Builds threshold ranges from label statistics
#[derive(Debug, Clone, Copy)]
pub struct ThresholdSynthesizer {
    num_stddevs: u32,
}

impl Default for ThresholdSynthesizer {
    fn default() -> Self {
        Self::new(crate::constants::defaults::NUM_STDDEVS)
    }
}

impl ThresholdSynthesizer {
    /// Create a synthesizer spanning `num_stddevs` on each side of the mean
    pub fn new(num_stddevs: u32) -> Self {
        Self { num_stddevs }
    }

    pub fn num_stddevs(&self) -> u32 {
        self.num_stddevs
    }

    /// Ranges for one label: none when undefined, two when hue wraps
    pub fn synthesize(&self, stats: Option<&LabelStatistics>) -> Vec<ThresholdRange> {
        let Some(stats) = stats else {
            return Vec::new();
        };

        let (h_lo, h_hi) = self.bounds(stats, Channel::Hue);
        let (s_lo, s_hi) = self.bounds(stats, Channel::Saturation);
        let (v_lo, v_hi) = self.bounds(stats, Channel::Value);

        let range = |lo: i32, hi: i32| {
            ThresholdRange::new(
                HsvTriple::new(clamp_hue(lo), s_lo, v_lo),
                HsvTriple::new(clamp_hue(hi), s_hi, v_hi),
            )
        };

        let ranges = if h_lo < hue::MIN {
            vec![range(hue::MIN, h_hi), range(hue::MAX - h_lo.abs(), hue::MAX)]
        } else if h_hi > hue::MAX {
            vec![range(hue::MIN, h_hi - hue::MAX), range(h_lo, hue::MAX)]
        } else {
            vec![range(h_lo, h_hi)]
        };

        debug!(
            h_lo,
            h_hi,
            ranges = ranges.len(),
            "synthesized threshold ranges"
        );
        ranges
    }

    /// `mean ± k·stddev` before any clamping
    fn raw_bounds(&self, stats: &LabelStatistics, channel: Channel) -> (i32, i32) {
        let c = stats.channel(channel);
        let spread = (self.num_stddevs as i64 * c.stddev as i64)
            .clamp(i32::MIN as i64, i32::MAX as i64) as i32;
        (c.mean.saturating_sub(spread), c.mean.saturating_add(spread))
    }

    /// Circular channels keep their raw bounds for the split; linear
    /// channels are clamped to their domain
    fn bounds(&self, stats: &LabelStatistics, channel: Channel) -> (i32, i32) {
        let (lo, hi) = self.raw_bounds(stats, channel);
        if channel.is_circular() {
            return (lo, hi);
        }
        let max = channel.max_value();
        (lo.clamp(0, max), hi.clamp(0, max))
    }
}

/// Keep hue inside its domain when the interval overflows on both sides
fn clamp_hue(h: i32) -> i32 {
    h.clamp(hue::MIN, hue::MAX)
}
