//! Config discovery with terminal-cell defaults.

use std::fs;
use std::path::{Path, PathBuf};

use datagrid::config::GridConfig;
use datagrid::error::GridError;

use crate::error::AppError;
use crate::paths;

/// Lines taken by the search line, header and footer.
pub const CHROME_ROWS: u16 = 3;

/// Defaults sized in terminal cells.
pub fn cell_defaults(terminal_rows: u16) -> GridConfig {
    GridConfig {
        default_width: 16,
        min_width: 4,
        row_index_width: 5,
        row_height: 1,
        viewport_height: viewport_rows(terminal_rows),
        ..GridConfig::default()
    }
}

/// Body rows available in a terminal of `terminal_rows` lines.
pub fn viewport_rows(terminal_rows: u16) -> u16 {
    terminal_rows.saturating_sub(CHROME_ROWS).max(1)
}

/// Overlay a JSON config onto the cell defaults.
///
/// Fields missing from `json` keep the cell-sized value rather than the
/// library default.
pub fn merge(json: &str, base: &GridConfig) -> Result<GridConfig, GridError> {
    let mut merged = serde_json::to_value(base)?;
    let overlay: serde_json::Value = serde_json::from_str(json)?;
    if let (Some(target), serde_json::Value::Object(fields)) = (merged.as_object_mut(), overlay) {
        target.extend(fields);
    }
    GridConfig::from_json_str(&merged.to_string())
}

/// Load the config.
///
/// An explicit path must exist. Without one, `config.json` in the config
/// directory is used when present.
pub fn load(explicit: Option<&Path>, terminal_rows: u16) -> Result<GridConfig, AppError> {
    let base = cell_defaults(terminal_rows);
    let path: Option<PathBuf> = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => paths::config_file().filter(|p| p.exists()),
    };
    let Some(path) = path else {
        log::debug!("no config file, using cell defaults");
        return Ok(base);
    };

    let json = fs::read_to_string(&path).map_err(|e| AppError::load(&path, e.into()))?;
    let config = merge(&json, &base).map_err(|e| AppError::load(&path, e))?;
    log::info!("loaded config from {}", path.display());
    Ok(config)
}
