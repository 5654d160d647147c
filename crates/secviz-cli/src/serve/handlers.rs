//! HTTP route handlers for the visualization server.
//!
//! Handlers only read what `secviz graph` wrote into the graph directory.

use std::io;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};

use super::library;
use super::models::{ApiError, GraphListing};
use super::templates;
use super::AppState;

// =============================================================================
// Page Handlers
// =============================================================================

/// GET `/` - Visualizer page.
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(templates::render_graph_page(&state.graph_dir))
}

// =============================================================================
// API Handlers
// =============================================================================

/// GET `/api/graphs` - Lists the generated documents.
pub async fn api_graphs(State(state): State<Arc<AppState>>) -> Result<Json<GraphListing>, ApiError> {
    let graphs = library::list_graphs(&state.graph_dir).map_err(|e| {
        tracing::error!("Failed to list {}: {}", state.graph_dir.display(), e);
        ApiError::Internal(e.to_string())
    })?;

    Ok(Json(GraphListing {
        graph_dir: state.graph_dir.display().to_string(),
        graphs,
    }))
}

/// GET `/api/graphs/{name}` - One node-link document, as written.
pub async fn api_graph(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let path = library::graph_path(&state.graph_dir, &name)
        .ok_or_else(|| ApiError::InvalidName(name.clone()))?;

    let body = match tokio::fs::read_to_string(&path).await {
        Ok(body) => body,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(ApiError::NotFound(name)),
        Err(e) => {
            tracing::error!("Failed to read {}: {}", path.display(), e);
            return Err(ApiError::Internal(e.to_string()));
        }
    };

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use tempfile::TempDir;

    fn state(dir: &TempDir) -> State<Arc<AppState>> {
        State(Arc::new(AppState {
            graph_dir: dir.path().to_path_buf(),
        }))
    }

    #[tokio::test]
    async fn test_api_graph_serves_document() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("CWE-284.json"), r#"{"nodes":[]}"#).unwrap();

        let response = api_graph(state(&dir), Path("CWE-284".to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_graph_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let err = api_graph(state(&dir), Path("../CWE-284".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidName(_)));
    }

    #[tokio::test]
    async fn test_api_graph_missing() {
        let dir = TempDir::new().unwrap();
        let err = api_graph(state(&dir), Path("CWE-1".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_api_graphs_lists_documents() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("CAPEC-FULL.json"), "{}").unwrap();

        let Json(listing) = api_graphs(state(&dir)).await.unwrap();
        assert_eq!(listing.graphs.len(), 1);
        assert!(listing.graphs[0].full);
        assert_eq!(listing.graphs[0].taxonomy.as_deref(), Some("CAPEC"));
    }
}
