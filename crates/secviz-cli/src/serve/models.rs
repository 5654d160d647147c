//! API response models for the graph visualization server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

// =============================================================================
// Listing Models (for `/api/graphs`)
// =============================================================================

/// Response for `/api/graphs`.
#[derive(Debug, Serialize)]
pub struct GraphListing {
    /// Directory the documents are read from.
    pub graph_dir: String,
    pub graphs: Vec<GraphEntry>,
}

/// One generated graph document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEntry {
    /// Document name without the `.json` extension.
    pub name: String,
    /// `CWE` or `CAPEC`, if the name carries a known prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxonomy: Option<String>,
    /// Whether this is a `<TAXONOMY>-FULL` document.
    pub full: bool,
    /// File size in bytes.
    pub bytes: u64,
}

// =============================================================================
// Errors
// =============================================================================

/// Error body returned by the API.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Handler failures, rendered as JSON with a matching status code.
#[derive(Debug)]
pub enum ApiError {
    InvalidName(String),
    NotFound(String),
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidName(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::InvalidName(name) => format!("invalid graph name: {}", name),
            ApiError::NotFound(name) => format!("graph not found: {}", name),
            ApiError::Internal(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message(),
        };
        (self.status(), Json(body)).into_response()
    }
}
