use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing graph documents.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Invalid graph name: {0:?}")]
    InvalidName(String),

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OutputError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        OutputError::Io {
            path: path.into(),
            source,
        }
    }
}
