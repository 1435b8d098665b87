//! Error types for the edges of the grid engine.
//!
//! Grid operations themselves never fail. Errors only come from loading
//! configuration or datasets and from parsing link templates.

/// Error type for config, dataset and link template loading.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Reading a file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON input could not be decoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value is out of range.
    #[error("invalid config field '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// A link template has an unterminated or empty placeholder.
    #[error("invalid link template '{template}'")]
    InvalidLinkTemplate { template: String },
}

impl GridError {
    /// Creates a new invalid config error.
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// Creates a new invalid link template error.
    pub fn invalid_link_template(template: impl Into<String>) -> Self {
        Self::InvalidLinkTemplate {
            template: template.into(),
        }
    }
}
