//! Calibration documents and their on-disk store
//!
//! A [`CalibrationDocument`] is the ordered list of threshold ranges for one
//! lighting condition. It persists as YAML:
//!
//! ```yaml
//! colors:
//!   - mins: { h: 0,  s: 40,  v: 60 }
//!     maxs: { h: 25, s: 200, v: 255 }
//! ```
//!
//! [`ThresholdStore`] keeps one such file per [`CalibrationCondition`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{CalibrationCondition, LabelRegions, ThresholdRange, ThresholdSynthesizer};
use crate::color::{HsvImage, RegionAnalyzer};
use crate::config::CalibrationConfig;
use crate::constants::storage::DOCUMENT_EXTENSION;
use crate::{CalibrationError, Result};

/// Threshold ranges for every calibrated label under one condition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDocument")]
pub struct CalibrationDocument {
    colors: Vec<ThresholdRange>,
}

/// On-disk shape before the `colors` key is known to hold a sequence
#[derive(Deserialize)]
struct RawDocument {
    colors: Option<Vec<ThresholdRange>>,
}

impl TryFrom<RawDocument> for CalibrationDocument {
    type Error = String;

    fn try_from(raw: RawDocument) -> std::result::Result<Self, Self::Error> {
        raw.colors
            .map(Self::from_ranges)
            .ok_or_else(|| "missing `colors` sequence".to_string())
    }
}

impl CalibrationDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ranges(ranges: Vec<ThresholdRange>) -> Self {
        Self { colors: ranges }
    }

    /// Aggregate and synthesize every label in processing order
    ///
    /// Labels covering no pixels contribute nothing; a wrapping hue
    /// contributes two ranges.
    pub fn build(
        image: &HsvImage,
        regions: &LabelRegions,
        config: &CalibrationConfig,
    ) -> Result<Self> {
        let analyzer = RegionAnalyzer::with_policy(config.region_policy);
        let synthesizer = ThresholdSynthesizer::new(config.num_stddevs);

        let mut document = Self::new();
        for (label, stats) in analyzer.analyze_all(image, regions)? {
            let ranges = synthesizer.synthesize(stats.as_ref());
            if ranges.is_empty() {
                debug!(%label, "skipping label without pixels");
            }
            document.colors.extend(ranges);
        }
        Ok(document)
    }

    pub fn ranges(&self) -> &[ThresholdRange] {
        &self.colors
    }

    pub fn push(&mut self, range: ThresholdRange) {
        self.colors.push(range);
    }

    /// Append every range of `other`, keeping order
    pub fn merge(&mut self, other: &CalibrationDocument) {
        self.colors.extend_from_slice(&other.colors);
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Serialize to the YAML document format
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| CalibrationError::serialization("Failed to serialize thresholds", e))
    }

    /// Parse and validate a YAML document
    ///
    /// # Errors
    ///
    /// Returns `CorruptCalibrationData` for malformed YAML, missing fields,
    /// non-integer values or bounds outside their channel domain.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let document: Self = serde_yaml::from_str(yaml)
            .map_err(|e| CalibrationError::corrupt("Failed to parse thresholds", e))?;
        document.validate()?;
        Ok(document)
    }

    /// Check every bound against its channel domain
    pub fn validate(&self) -> Result<()> {
        for (i, range) in self.colors.iter().enumerate() {
            if !range.mins.in_domain() || !range.maxs.in_domain() {
                return Err(CalibrationError::corrupt_value(format!(
                    "range {} has bounds outside the HSV domain: mins {:?}, maxs {:?}",
                    i, range.mins, range.maxs
                )));
            }
        }
        Ok(())
    }
}

/// Directory of per-condition threshold documents (`sunny.yml`, ...)
#[derive(Debug, Clone)]
pub struct ThresholdStore {
    dir: PathBuf,
}

impl ThresholdStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &CalibrationConfig) -> Self {
        Self::new(&config.storage_dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the document for `condition`
    pub fn path_for(&self, condition: CalibrationCondition) -> PathBuf {
        self.dir.join(condition.file_name())
    }

    pub fn exists(&self, condition: CalibrationCondition) -> bool {
        self.path_for(condition).is_file()
    }

    /// Write `document` as the thresholds for `condition`, replacing any
    /// previous file
    ///
    /// The YAML goes to `<condition>.yml.tmp` first and is renamed over the
    /// target, so an interrupted save never leaves a partial document.
    pub fn save(
        &self,
        condition: CalibrationCondition,
        document: &CalibrationDocument,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| CalibrationError::io(&self.dir, e))?;

        let path = self.path_for(condition);
        let yaml = document.to_yaml_string()?;
        let tmp = path.with_extension(format!("{}.tmp", DOCUMENT_EXTENSION));
        fs::write(&tmp, yaml).map_err(|e| CalibrationError::io(&tmp, e))?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(CalibrationError::io(&path, e));
        }

        info!(%condition, path = %path.display(), ranges = document.len(), "saved thresholds");
        Ok(path)
    }

    /// Read the thresholds for `condition`
    pub fn load(&self, condition: CalibrationCondition) -> Result<CalibrationDocument> {
        let path = self.path_for(condition);
        let contents = fs::read_to_string(&path).map_err(|e| CalibrationError::io(&path, e))?;
        let document = CalibrationDocument::from_yaml_str(&contents)?;

        info!(%condition, path = %path.display(), ranges = document.len(), "loaded thresholds");
        Ok(document)
    }

    /// Read the thresholds for `condition`, treating any failure as
    /// "no thresholds"
    pub fn load_or_empty(&self, condition: CalibrationCondition) -> CalibrationDocument {
        match self.load(condition) {
            Ok(document) => document,
            Err(err) => {
                warn!(%condition, error = %err, "no usable thresholds for condition");
                CalibrationDocument::new()
            }
        }
    }

    /// Union of the thresholds of several conditions, skipping unusable ones
    pub fn load_merged(&self, conditions: &[CalibrationCondition]) -> CalibrationDocument {
        let mut merged = CalibrationDocument::new();
        for &condition in conditions {
            merged.merge(&self.load_or_empty(condition));
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::{HsvTriple, Label, Region};
    use tempfile::tempdir;

    fn sample_document() -> CalibrationDocument {
        CalibrationDocument::from_ranges(vec![
            ThresholdRange::new(HsvTriple::new(0, 40, 60), HsvTriple::new(25, 200, 255)),
            ThresholdRange::new(HsvTriple::new(170, 40, 60), HsvTriple::new(179, 200, 255)),
        ])
    }

    #[test]
    fn test_parse_flow_style_document() {
        let yaml = "colors:\n  - mins: { h: 0,  s: 40, v: 60 }\n    maxs: { h: 25, s: 200, v: 255 }\n  - mins: { h: 170, s: 40, v: 60 }\n    maxs: { h: 179, s: 200, v: 255 }\n";
        let document = CalibrationDocument::from_yaml_str(yaml).unwrap();
        assert_eq!(document, sample_document());
    }

    #[test]
    fn test_yaml_round_trip() {
        let document = sample_document();
        let yaml = document.to_yaml_string().unwrap();
        assert!(yaml.starts_with("colors:"));
        assert_eq!(CalibrationDocument::from_yaml_str(&yaml).unwrap(), document);
    }

    #[test]
    fn test_missing_field_is_corrupt() {
        let yaml = "colors:\n  - mins: { h: 0, s: 40 }\n    maxs: { h: 25, s: 200, v: 255 }\n";
        let err = CalibrationDocument::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, CalibrationError::CorruptCalibrationData { .. }));
    }

    #[test]
    fn test_null_colors_is_corrupt() {
        for yaml in ["colors:", "colors: ~", "colors: null\n"] {
            let err = CalibrationDocument::from_yaml_str(yaml).unwrap_err();
            assert!(
                matches!(err, CalibrationError::CorruptCalibrationData { .. }),
                "{yaml:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_empty_colors_list_is_valid() {
        let document = CalibrationDocument::from_yaml_str("colors: []").unwrap();
        assert!(document.is_empty());
        let yaml = CalibrationDocument::new().to_yaml_string().unwrap();
        assert!(CalibrationDocument::from_yaml_str(&yaml).unwrap().is_empty());
    }

    #[test]
    fn test_wrong_type_is_corrupt() {
        let yaml = "colors:\n  - mins: { h: low, s: 40, v: 60 }\n    maxs: { h: 25, s: 200, v: 255 }\n";
        assert!(matches!(
            CalibrationDocument::from_yaml_str(yaml),
            Err(CalibrationError::CorruptCalibrationData { .. })
        ));
        assert!(matches!(
            CalibrationDocument::from_yaml_str("thresholds: []"),
            Err(CalibrationError::CorruptCalibrationData { .. })
        ));
    }

    #[test]
    fn test_out_of_domain_is_corrupt() {
        let yaml = "colors:\n  - mins: { h: 0, s: 40, v: 60 }\n    maxs: { h: 200, s: 200, v: 255 }\n";
        assert!(matches!(
            CalibrationDocument::from_yaml_str(yaml),
            Err(CalibrationError::CorruptCalibrationData { .. })
        ));
    }

    #[test]
    fn test_build_skips_empty_labels() {
        let image = HsvImage::from_fn(4, 4, |x, _| if x < 2 { [10, 100, 150] } else { [90, 60, 60] });
        let mut regions = LabelRegions::new();
        regions.push(Label::Red, Region::new(0, 0, 2, 2));
        regions.push(Label::Blue, Region::new(2, 2, 2, 2));

        let document =
            CalibrationDocument::build(&image, &regions, &CalibrationConfig::default()).unwrap();

        // blue is processed before red
        assert_eq!(
            document.ranges(),
            &[
                ThresholdRange::new(HsvTriple::new(90, 60, 60), HsvTriple::new(90, 60, 60)),
                ThresholdRange::new(HsvTriple::new(10, 100, 150), HsvTriple::new(10, 100, 150)),
            ]
        );
    }

    #[test]
    fn test_store_save_and_load() {
        let dir = tempdir().unwrap();
        let store = ThresholdStore::new(dir.path().join("thresholds"));
        let document = sample_document();

        assert!(!store.exists(CalibrationCondition::Cloudy));
        let path = store.save(CalibrationCondition::Cloudy, &document).unwrap();
        assert!(path.ends_with("cloudy.yml"));
        assert!(store.exists(CalibrationCondition::Cloudy));
        assert_eq!(store.load(CalibrationCondition::Cloudy).unwrap(), document);
    }

    #[test]
    fn test_save_replaces_previous_and_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let store = ThresholdStore::new(dir.path());
        store.save(CalibrationCondition::Sunny, &sample_document()).unwrap();
        store.save(CalibrationCondition::Sunny, &CalibrationDocument::new()).unwrap();

        assert!(store.load(CalibrationCondition::Sunny).unwrap().is_empty());
        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["sunny.yml".to_string()]);
    }

    #[test]
    fn test_truncated_document_fails_strict_load() {
        let dir = tempdir().unwrap();
        let store = ThresholdStore::new(dir.path());
        fs::write(store.path_for(CalibrationCondition::Cloudy), "colors:\n").unwrap();

        let err = store.load(CalibrationCondition::Cloudy).unwrap_err();
        assert!(matches!(err, CalibrationError::CorruptCalibrationData { .. }));
        assert!(store.load_or_empty(CalibrationCondition::Cloudy).is_empty());
    }

    #[test]
    fn test_load_or_empty_on_missing_and_corrupt() {
        let dir = tempdir().unwrap();
        let store = ThresholdStore::new(dir.path());

        assert!(store.load(CalibrationCondition::Sunny).is_err());
        assert!(store.load_or_empty(CalibrationCondition::Sunny).is_empty());

        fs::write(store.path_for(CalibrationCondition::Overcast), "colors: [1, 2").unwrap();
        assert!(store.load_or_empty(CalibrationCondition::Overcast).is_empty());
    }

    #[test]
    fn test_load_merged_skips_unusable_conditions() {
        let dir = tempdir().unwrap();
        let store = ThresholdStore::new(dir.path());
        store.save(CalibrationCondition::Sunny, &sample_document()).unwrap();
        fs::write(store.path_for(CalibrationCondition::Cloudy), "nonsense").unwrap();

        let merged = store.load_merged(&CalibrationCondition::ALL);
        assert_eq!(merged, sample_document());
    }
}
