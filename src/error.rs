//! Error types for the hsv_calibration library

use std::path::PathBuf;
use thiserror::Error;

use crate::calibration::{Label, Region};

/// Result type alias for hsv_calibration operations
pub type Result<T> = std::result::Result<T, CalibrationError>;

/// Error types for calibration, persistence and masking operations
#[derive(Error, Debug)]
pub enum CalibrationError {
    /// Image file could not be loaded or decoded
    #[error("Failed to load image: {message}")]
    ImageLoadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Image buffer does not describe a usable image
    #[error("Invalid image: {reason}")]
    InvalidImage { reason: String },

    /// A persisted threshold document is missing fields, has wrong types,
    /// or carries bounds outside their channel domain
    #[error("Corrupt calibration data: {message}")]
    CorruptCalibrationData {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Thresholds could not be encoded for writing
    #[error("Failed to serialize calibration data: {message}")]
    SerializationError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Region extends past the image and the active policy rejects it
    #[error("Region {region:?} for {label} lies outside the {width}x{height} image")]
    RegionOutOfBounds {
        label: Label,
        region: Region,
        width: u32,
        height: u32,
    },

    /// Filesystem access failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be parsed or serialized
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },
}

impl CalibrationError {
    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoadError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a corrupt calibration data error with an underlying cause
    pub fn corrupt<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::CorruptCalibrationData {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a corrupt calibration data error from a validation failure
    pub fn corrupt_value(message: impl Into<String>) -> Self {
        Self::CorruptCalibrationData {
            message: message.into(),
            source: None,
        }
    }

    /// Create a serialization error with an underlying cause
    pub fn serialization<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::SerializationError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an I/O error bound to the path that failed
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if this error indicates a recoverable condition
    ///
    /// A corrupt document means "no thresholds for that condition" and an
    /// out-of-bounds region can be redrawn; neither should stop a pipeline.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CalibrationError::CorruptCalibrationData { .. }
                | CalibrationError::RegionOutOfBounds { .. }
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            CalibrationError::ImageLoadError { .. } => {
                "Could not load the image. Please check the file format and try again.".to_string()
            }
            CalibrationError::CorruptCalibrationData { .. } => {
                "The saved calibration is damaged. Please recalibrate this condition.".to_string()
            }
            CalibrationError::RegionOutOfBounds { label, .. } => {
                format!("A {} selection lies outside the image. Please redraw it.", label)
            }
            CalibrationError::Io { path, .. } => {
                format!("Could not access {}.", path.display())
            }
            _ => "Calibration failed. Please check the input and try again.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupt_is_recoverable() {
        let err = CalibrationError::corrupt_value("missing field `mins`");
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn test_io_not_recoverable() {
        let err = CalibrationError::io(
            "sunny.yml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("sunny.yml"));
    }

    #[test]
    fn test_serialization_failure_not_reported_as_damage() {
        let err = CalibrationError::serialization(
            "Failed to serialize thresholds",
            std::io::Error::new(std::io::ErrorKind::Other, "encoder failed"),
        );
        assert!(!err.is_recoverable());
        assert!(!err.user_message().contains("damaged"));
    }

    #[test]
    fn test_out_of_bounds_message_names_label() {
        let err = CalibrationError::RegionOutOfBounds {
            label: Label::Red,
            region: Region::new(8, 8, 4, 4),
            width: 10,
            height: 10,
        };
        assert!(err.is_recoverable());
        assert!(err.user_message().contains("red"));
    }
}
