//! Color labels and calibration conditions
//!
//! Both are closed sets: a calibration always covers the same six colors,
//! and thresholds are stored per lighting condition.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::storage::DOCUMENT_EXTENSION;
use crate::{CalibrationError, Result};

/// Color identifier a user assigns to drawn regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Blue,
    Green,
    Orange,
    Purple,
    Red,
    Yellow,
}

impl Label {
    /// Every label in processing order (alphabetical by name)
    pub const ALL: [Label; 6] = [
        Label::Blue,
        Label::Green,
        Label::Orange,
        Label::Purple,
        Label::Red,
        Label::Yellow,
    ];

    /// Stable lowercase name
    pub fn name(self) -> &'static str {
        match self {
            Label::Blue => "blue",
            Label::Green => "green",
            Label::Orange => "orange",
            Label::Purple => "purple",
            Label::Red => "red",
            Label::Yellow => "yellow",
        }
    }

    /// Color used to outline this label's regions, as (B, G, R)
    pub fn display_bgr(self) -> [u8; 3] {
        match self {
            Label::Blue => [255, 0, 0],
            Label::Green => [0, 255, 0],
            Label::Orange => [0, 128, 255],
            Label::Purple => [204, 0, 204],
            Label::Red => [0, 0, 255],
            Label::Yellow => [0, 255, 255],
        }
    }

    /// Position of this label in [`Label::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Label {
    type Err = CalibrationError;

    fn from_str(s: &str) -> Result<Self> {
        Label::ALL
            .into_iter()
            .find(|label| label.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CalibrationError::InvalidParameter {
                parameter: "label".to_string(),
                value: s.to_string(),
            })
    }
}

/// Named lighting context selecting which threshold document is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalibrationCondition {
    Sunny,
    Cloudy,
    Overcast,
}

impl CalibrationCondition {
    pub const ALL: [CalibrationCondition; 3] = [
        CalibrationCondition::Sunny,
        CalibrationCondition::Cloudy,
        CalibrationCondition::Overcast,
    ];

    /// File stem of the persisted document
    pub fn name(self) -> &'static str {
        match self {
            CalibrationCondition::Sunny => "sunny",
            CalibrationCondition::Cloudy => "cloudy",
            CalibrationCondition::Overcast => "overcast",
        }
    }

    /// File name of the persisted document, e.g. `sunny.yml`
    pub fn file_name(self) -> String {
        format!("{}.{}", self.name(), DOCUMENT_EXTENSION)
    }
}

impl fmt::Display for CalibrationCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CalibrationCondition {
    type Err = CalibrationError;

    fn from_str(s: &str) -> Result<Self> {
        CalibrationCondition::ALL
            .into_iter()
            .find(|condition| condition.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CalibrationError::InvalidParameter {
                parameter: "condition".to_string(),
                value: s.to_string(),
            })
    }
}
