//! Collection-level failures.

use std::path::PathBuf;
use thiserror::Error;

use super::Taxonomy;

/// Errors that prevent a whole collection from loading.
///
/// Problems with individual records are not errors; they are collected in a
/// [`LoadReport`](super::LoadReport) instead.
#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid {taxonomy} collection JSON: {source}")]
    Json {
        taxonomy: Taxonomy,
        #[source]
        source: serde_json::Error,
    },

    #[error("{taxonomy} collection has no `{key}` object")]
    MissingCollection { taxonomy: Taxonomy, key: &'static str },
}

impl TaxonomyError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TaxonomyError::Io {
            path: path.into(),
            source,
        }
    }
}
