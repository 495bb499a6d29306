//! Labeled rectangular selections
//!
//! [`LabelRegions`] is the snapshot handed to the aggregator: one ordered
//! list of rectangles per label. [`RegionSelection`] is the editable model
//! behind an interactive selection tool (draw, undo, commit).

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{CalibrationCondition, CalibrationDocument, Label, ThresholdStore};
use crate::color::HsvImage;
use crate::config::CalibrationConfig;
use crate::Result;

/// Axis-aligned rectangle in image pixel coordinates
///
/// The origin may lie outside the image; width and height are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a region from two opposite corners of a drag, in any direction
    pub fn from_corners(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            x: x0.min(x1),
            y: y0.min(y1),
            width: x0.abs_diff(x1),
            height: y0.abs_diff(y1),
        }
    }

    /// Exclusive right edge
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Number of pixels covered
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when every covered pixel lies inside a `width` x `height` image
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x >= 0 && self.y >= 0 && self.right() <= width as i64 && self.bottom() <= height as i64
    }

    /// Intersection with a `width` x `height` image, `None` if nothing remains
    pub fn clip_to(&self, width: u32, height: u32) -> Option<Region> {
        let left = (self.x as i64).max(0);
        let top = (self.y as i64).max(0);
        let right = self.right().min(width as i64);
        let bottom = self.bottom().min(height as i64);

        if right <= left || bottom <= top {
            return None;
        }

        Some(Region {
            x: left as i32,
            y: top as i32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        })
    }
}

/// Ordered regions for every label
///
/// Indexed by [`Label`] so each of the six colors always has a (possibly
/// empty) list; serializes as a map from label name to regions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<Label, Vec<Region>>",
    into = "BTreeMap<Label, Vec<Region>>"
)]
pub struct LabelRegions {
    regions: [Vec<Region>; 6],
}

impl LabelRegions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a region to a label's list
    pub fn push(&mut self, label: Label, region: Region) {
        self.regions[label.index()].push(region);
    }

    /// Regions drawn for `label`, in drawing order
    pub fn get(&self, label: Label) -> &[Region] {
        &self.regions[label.index()]
    }

    /// Remove and return the most recent region for `label`
    pub fn pop(&mut self, label: Label) -> Option<Region> {
        self.regions[label.index()].pop()
    }

    /// Iterate labels in processing order with their regions
    pub fn iter(&self) -> impl Iterator<Item = (Label, &[Region])> + '_ {
        Label::ALL
            .into_iter()
            .map(move |label| (label, self.get(label)))
    }

    /// Total number of regions across all labels
    pub fn len(&self) -> usize {
        self.regions.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.regions.iter_mut().for_each(Vec::clear);
    }
}

impl From<BTreeMap<Label, Vec<Region>>> for LabelRegions {
    fn from(map: BTreeMap<Label, Vec<Region>>) -> Self {
        let mut regions = LabelRegions::new();
        for (label, list) in map {
            regions.regions[label.index()] = list;
        }
        regions
    }
}

impl From<LabelRegions> for BTreeMap<Label, Vec<Region>> {
    fn from(regions: LabelRegions) -> Self {
        Label::ALL
            .into_iter()
            .zip(regions.regions)
            .filter(|(_, list)| !list.is_empty())
            .collect()
    }
}

/// Editable selection state for an interactive calibration session
///
/// Regions are added for the working label; `undo` removes the most
/// recently drawn region whichever label it belongs to.
#[derive(Debug, Clone)]
pub struct RegionSelection {
    working_label: Label,
    regions: LabelRegions,
    history: Vec<Label>,
}

impl Default for RegionSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionSelection {
    /// Start an empty selection with blue as the working label
    pub fn new() -> Self {
        Self {
            working_label: Label::Blue,
            regions: LabelRegions::new(),
            history: Vec::new(),
        }
    }

    pub fn working_label(&self) -> Label {
        self.working_label
    }

    pub fn set_working_label(&mut self, label: Label) {
        self.working_label = label;
    }

    /// Add a region for the working label
    pub fn push(&mut self, region: Region) {
        self.push_for(self.working_label, region);
    }

    /// Add a region for an explicit label
    pub fn push_for(&mut self, label: Label, region: Region) {
        self.regions.push(label, region);
        self.history.push(label);
    }

    /// Remove the most recently drawn region
    pub fn undo(&mut self) -> Option<(Label, Region)> {
        let label = self.history.pop()?;
        self.regions.pop(label).map(|region| (label, region))
    }

    pub fn regions(&self) -> &LabelRegions {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn clear(&mut self) {
        self.regions.clear();
        self.history.clear();
    }

    /// Copy of the current regions, independent of later edits
    pub fn snapshot(&self) -> LabelRegions {
        self.regions.clone()
    }

    /// Build thresholds from the current regions, persist them for
    /// `condition`, then start over with an empty selection
    ///
    /// The selection is left untouched if building or saving fails.
    pub fn commit(
        &mut self,
        image: &HsvImage,
        condition: CalibrationCondition,
        store: &ThresholdStore,
        config: &CalibrationConfig,
    ) -> Result<PathBuf> {
        let document = CalibrationDocument::build(image, &self.regions, config)?;
        let path = store.save(condition, &document)?;
        self.clear();
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_normalizes_any_direction() {
        let expected = Region::new(2, 3, 5, 4);
        assert_eq!(Region::from_corners(2, 3, 7, 7), expected);
        assert_eq!(Region::from_corners(7, 7, 2, 3), expected);
        assert_eq!(Region::from_corners(7, 3, 2, 7), expected);
    }

    #[test]
    fn test_clip_to_image() {
        let region = Region::new(-2, 8, 5, 5);
        assert!(!region.fits_within(10, 10));
        assert_eq!(region.clip_to(10, 10), Some(Region::new(0, 8, 3, 2)));
        assert_eq!(Region::new(12, 0, 3, 3).clip_to(10, 10), None);
        assert!(Region::new(0, 0, 10, 10).fits_within(10, 10));
    }

    #[test]
    fn test_undo_pops_latest_across_labels() {
        let mut selection = RegionSelection::new();
        selection.push(Region::new(0, 0, 1, 1));
        selection.set_working_label(Label::Red);
        selection.push(Region::new(1, 1, 2, 2));
        selection.push_for(Label::Blue, Region::new(2, 2, 3, 3));

        assert_eq!(
            selection.undo(),
            Some((Label::Blue, Region::new(2, 2, 3, 3)))
        );
        assert_eq!(
            selection.undo(),
            Some((Label::Red, Region::new(1, 1, 2, 2)))
        );
        assert_eq!(selection.regions().get(Label::Blue).len(), 1);
        assert_eq!(selection.len(), 1);
        selection.undo();
        assert_eq!(selection.undo(), None);
        assert!(selection.regions().is_empty());
    }

    #[test]
    fn test_label_regions_json_map() {
        let mut regions = LabelRegions::new();
        regions.push(Label::Green, Region::new(1, 2, 3, 4));
        let json = serde_json::to_string(&regions).unwrap();
        assert_eq!(json, r#"{"green":[{"x":1,"y":2,"width":3,"height":4}]}"#);

        let back: LabelRegions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, regions);
        assert!(back.get(Label::Red).is_empty());
    }
}
