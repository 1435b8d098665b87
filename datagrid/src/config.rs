//! Grid configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Date format used to parse values in `date` columns.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Sizing and windowing configuration.
///
/// Widths and heights are in the host's layout unit (pixels for a
/// graphical host, cells for a terminal).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Width given to columns that do not declare one.
    pub default_width: u16,
    /// Minimum width for columns that do not declare one.
    pub min_width: u16,
    /// Width of the synthetic row-index column. Also its minimum.
    pub row_index_width: u16,
    /// Fixed height of every body row.
    pub row_height: u16,
    /// Fixed height of the windowed body viewport.
    pub viewport_height: u16,
    /// Row counts above this switch the body to windowed rendering.
    pub window_threshold: usize,
    /// Extra rows materialized above and below the viewport.
    pub overscan: usize,
    /// chrono format string for `date` columns.
    pub date_format: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            default_width: 150,
            min_width: 30,
            row_index_width: 50,
            row_height: 35,
            viewport_height: 500,
            window_threshold: 20,
            overscan: 2,
            date_format: DATE_FORMAT.to_string(),
        }
    }
}

impl GridConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, GridError> {
        let config: GridConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GridError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.min_width > self.default_width {
            return Err(GridError::invalid_config(
                "min_width",
                format!(
                    "{} exceeds default_width {}",
                    self.min_width, self.default_width
                ),
            ));
        }
        if self.row_height == 0 {
            return Err(GridError::invalid_config("row_height", "must be positive"));
        }
        if self.date_format.is_empty() {
            return Err(GridError::invalid_config("date_format", "must not be empty"));
        }
        Ok(())
    }

    /// Builder: set the viewport height.
    pub fn viewport_height(mut self, height: u16) -> Self {
        self.viewport_height = height;
        self
    }

    /// Builder: set the row height.
    pub fn row_height(mut self, height: u16) -> Self {
        self.row_height = height;
        self
    }
}
