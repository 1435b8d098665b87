//! Top-level errors for the terminal front end.

use std::path::PathBuf;

use datagrid::error::GridError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to load '{path}': {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: GridError,
    },

    #[error("failed to set up logging: {0}")]
    Logging(String),
}

impl AppError {
    pub fn load(path: impl Into<PathBuf>, source: GridError) -> Self {
        Self::Load {
            path: path.into(),
            source,
        }
    }
}
