//! Settings for masking and coordinate attachment.
//!
//! Settings can be stored as JSON, so a processing run can be reproduced with
//! the same vertical coordinate, bounding box buffer and spacing overrides.

use std::path::Path;

use ndarray::{ArrayView, Dimension, RemoveAxis};
use serde::{Deserialize, Serialize};

use crate::bbox::{Background, DEFAULT_BBOX_BUFFER, get_bounding_box};
use crate::cube::{Cube, DEFAULT_VERTICAL_COORD};
use crate::error::{Error, Result};
use crate::labels::Label;
use crate::mask;
use crate::spacing::get_spacings;
use crate::tracks::FeatureTable;

/// Log level setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    #[default]
    Warn,
    /// Show errors, warnings, and info messages
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current settings file format version.
/// Increment this when making breaking changes to the settings format.
pub const SETTINGS_VERSION: u32 = 1;

/// Processing settings.
///
/// Every field except `version` falls back to its default when missing from
/// a settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Version of the settings file format
    pub version: u32,

    /// Name of the coordinate along the vertical axis of 3D label volumes
    #[serde(default = "default_vertical_coord")]
    pub vertical_coord: String,

    /// Padding added around bounding boxes, in pixels
    #[serde(default = "default_bbox_buffer")]
    pub bbox_buffer: usize,

    /// Horizontal grid spacing in metres, overriding projection coordinates
    #[serde(default)]
    pub grid_spacing: Option<f64>,

    /// Time spacing in seconds, overriding the time coordinate
    #[serde(default)]
    pub time_spacing: Option<f64>,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_vertical_coord() -> String {
    DEFAULT_VERTICAL_COORD.to_string()
}

fn default_bbox_buffer() -> usize {
    DEFAULT_BBOX_BUFFER
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    /// Create settings with default values.
    pub fn new() -> Self {
        Self {
            version: SETTINGS_VERSION,
            vertical_coord: default_vertical_coord(),
            bbox_buffer: default_bbox_buffer(),
            grid_spacing: None,
            time_spacing: None,
            log_level: LogLevel::default(),
        }
    }

    /// Serialize the settings to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize settings from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if settings.version > SETTINGS_VERSION {
            return Err(Error::VersionTooNew {
                file_version: settings.version,
                supported_version: SETTINGS_VERSION,
            });
        }

        Ok(settings)
    }

    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to a JSON file, creating parent directories if needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        log::info!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Install `env_logger` at the configured level.
    ///
    /// Does nothing if a logger is already installed.
    pub fn init_logging(&self) {
        let _ = env_logger::Builder::new()
            .filter_level(self.log_level.to_level_filter())
            .try_init();
    }

    /// Grid and time spacing of `field` with the configured overrides.
    pub fn spacings<T>(&self, field: &Cube<T>) -> Result<(f64, f64)> {
        get_spacings(field, self.grid_spacing, self.time_spacing)
    }

    /// Bounding box of the nonzero region with the configured buffer.
    pub fn bounding_box<T, D>(&self, array: ArrayView<'_, T, D>) -> Vec<[usize; 2]>
    where
        T: Background,
        D: Dimension + RemoveAxis,
    {
        get_bounding_box(array, self.bbox_buffer)
    }

    /// [`mask::mask_features_surface`] over the configured vertical coordinate.
    pub fn mask_features_surface(
        &self,
        labels: &Cube<Label>,
        feature_ids: &[Label],
        masked: bool,
    ) -> Result<Cube<Label>> {
        mask::mask_features_surface(labels, feature_ids, masked, &self.vertical_coord)
    }

    /// [`mask::mask_features_columns`] over the configured vertical coordinate.
    pub fn mask_features_columns(
        &self,
        labels: &Cube<Label>,
        feature_ids: &[Label],
        masked: bool,
    ) -> Result<Cube<Label>> {
        mask::mask_features_columns(labels, feature_ids, masked, &self.vertical_coord)
    }

    /// [`mask::mask_cell_surface`] over the configured vertical coordinate.
    pub fn mask_cell_surface(
        &self,
        labels: &Cube<Label>,
        cell: Label,
        track: &FeatureTable,
        masked: bool,
    ) -> Result<Cube<Label>> {
        mask::mask_cell_surface(labels, cell, track, masked, &self.vertical_coord)
    }

    /// [`mask::mask_cell_columns`] over the configured vertical coordinate.
    pub fn mask_cell_columns(
        &self,
        labels: &Cube<Label>,
        cell: Label,
        track: &FeatureTable,
        masked: bool,
    ) -> Result<Cube<Label>> {
        mask::mask_cell_columns(labels, cell, track, masked, &self.vertical_coord)
    }

    /// [`mask::column_mask_from_2d`] over the configured vertical coordinate.
    pub fn column_mask_from_2d<T>(
        &self,
        mask_2d: &Cube<Label>,
        template: &Cube<T>,
    ) -> Result<Cube<Label>> {
        mask::column_mask_from_2d(mask_2d, template, &self.vertical_coord)
    }
}
