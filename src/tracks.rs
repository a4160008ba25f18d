//! Feature / trajectory table produced by detection and tracking.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cube::Timestamp;
use crate::error::Result;
use crate::labels::Label;

/// One detected feature at one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Time step index into the field's time axis
    pub frame: usize,
    /// Feature id, matching the values of the label volume at this frame
    pub feature: Label,
    /// Tracked cell this feature belongs to; `None` if unassigned
    #[serde(default)]
    pub cell: Option<Label>,
    /// Fractional pixel position along the first horizontal axis
    pub hdim_1: f64,
    /// Fractional pixel position along the second horizontal axis
    pub hdim_2: f64,
    /// Absolute time of the frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<Timestamp>,
    /// `time` formatted as `YYYY-MM-DD HH:MM:SS`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestr: Option<String>,
    /// Interpolated coordinate values, keyed by coordinate name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub coords: BTreeMap<String, f64>,
}

impl Feature {
    pub fn new(frame: usize, feature: Label, hdim_1: f64, hdim_2: f64) -> Self {
        Self {
            frame,
            feature,
            cell: None,
            hdim_1,
            hdim_2,
            time: None,
            timestr: None,
            coords: BTreeMap::new(),
        }
    }

    pub fn with_cell(mut self, cell: Label) -> Self {
        self.cell = Some(cell);
        self
    }

    /// Value of an attached coordinate column.
    pub fn coord(&self, name: &str) -> Option<f64> {
        self.coords.get(name).copied()
    }
}

/// Table of features, one row per feature per frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureTable {
    features: Vec<Feature>,
}

impl FeatureTable {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Feature> {
        self.features.iter_mut()
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Ids of all features belonging to `cell`, in table order.
    pub fn feature_ids_for_cell(&self, cell: Label) -> Vec<Label> {
        self.features
            .iter()
            .filter(|f| f.cell == Some(cell))
            .map(|f| f.feature)
            .collect()
    }

    /// Serialize as a JSON array of rows.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a FeatureTable {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

impl FromIterator<Feature> for FeatureTable {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
