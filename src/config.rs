//! Configuration for threshold calibration.
//!
//! Configuration can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use hsv_calibration::CalibrationConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = CalibrationConfig::from_json_file(Path::new("calibration.json"))?;
//!
//! // Or use defaults
//! let config = CalibrationConfig::default();
//! # Ok::<(), hsv_calibration::CalibrationError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::defaults;
use crate::{CalibrationError, Result};

/// What to do with a region that extends past the image
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionPolicy {
    /// Use only the part of the region inside the image
    #[default]
    Clip,
    /// Fail the calibration with `RegionOutOfBounds`
    Reject,
}

/// Tunable parameters for building and storing thresholds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Standard deviations on either side of the mean (0 collapses each
    /// range to the mean)
    pub num_stddevs: u32,

    /// Directory holding `<condition>.yml` threshold documents
    pub storage_dir: PathBuf,

    /// Handling of regions that extend past the image
    pub region_policy: RegionPolicy,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            num_stddevs: defaults::NUM_STDDEVS,
            storage_dir: PathBuf::from(defaults::STORAGE_DIR),
            region_policy: RegionPolicy::Clip,
        }
    }
}

impl CalibrationConfig {
    /// Reject settings that cannot produce a usable store
    pub fn validate(&self) -> Result<()> {
        if self.storage_dir.as_os_str().is_empty() {
            return Err(CalibrationError::InvalidParameter {
                parameter: "storage_dir".to_string(),
                value: String::new(),
            });
        }
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CalibrationError::io(path, e))?;
        let config: Self = serde_json::from_str(&content).map_err(|e| CalibrationError::ConfigError {
            message: format!("{}: {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| CalibrationError::ConfigError {
            message: e.to_string(),
        })?;
        std::fs::write(path, json).map_err(|e| CalibrationError::io(path, e))?;
        Ok(())
    }
}
