//! Channel domains and calibration defaults
//!
//! The HSV layout follows the common 8-bit convention: hue is stored as
//! degrees / 2 so the full circle fits in a byte, saturation and value use
//! the full byte range.

/// Hue channel domain (circular: 0 and `MAX` are adjacent)
pub mod hue {
    /// Smallest representable hue
    pub const MIN: i32 = 0;

    /// Largest representable hue (358 degrees / 2)
    pub const MAX: i32 = 179;

    /// Number of distinct hue steps around the circle
    pub const STEPS: i32 = MAX + 1;
}

/// Saturation and value share the same linear domain
pub mod linear {
    /// Smallest saturation / value
    pub const MIN: i32 = 0;

    /// Largest saturation / value
    pub const MAX: i32 = 255;
}

/// Calibration defaults
pub mod defaults {
    /// Standard deviations on either side of the mean
    pub const NUM_STDDEVS: u32 = 1;

    /// Directory holding per-condition threshold documents
    pub const STORAGE_DIR: &str = ".";
}

/// Persistence naming
pub mod storage {
    /// Extension of per-condition threshold documents
    pub const DOCUMENT_EXTENSION: &str = "yml";
}

/// Mask pixel values
pub mod mask {
    /// Pixel satisfies at least one threshold range
    pub const INCLUDED: u8 = 255;

    /// Pixel satisfies no threshold range
    pub const EXCLUDED: u8 = 0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hue_domain() {
        assert_eq!(hue::STEPS, 180);
        assert!(hue::MAX < linear::MAX);
    }

    #[test]
    fn test_mask_values_distinct() {
        assert_ne!(mask::INCLUDED, mask::EXCLUDED);
    }
}
