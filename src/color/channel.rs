//! HSV channel identifiers and their value domains

use crate::constants::{hue, linear};

/// One axis of the cylindrical color space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Hue,
    Saturation,
    Value,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Hue, Channel::Saturation, Channel::Value];

    /// Position of the channel inside an `[h, s, v]` triple
    pub fn index(self) -> usize {
        self as usize
    }

    /// Largest value the channel can hold; the smallest is always 0
    pub fn max_value(self) -> i32 {
        match self {
            Channel::Hue => hue::MAX,
            Channel::Saturation | Channel::Value => linear::MAX,
        }
    }

    /// Hue wraps around: 0 and its maximum are neighbours
    pub fn is_circular(self) -> bool {
        matches!(self, Channel::Hue)
    }
}
