//! Local web server for browsing the generated taxonomy graphs.
//!
//! Serves a single-page d3 force-layout viewer plus a small JSON API over
//! the graph directory written by `secviz graph`.
//!
//! # Module Structure
//!
//! - `handlers` - HTTP route handlers
//! - `library` - listing and locating graph documents on disk
//! - `models` - API response types
//! - `templates` - HTML/CSS/JS template rendering

mod handlers;
mod library;
mod models;
mod templates;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state for the server.
pub struct AppState {
    /// Directory holding the node-link documents.
    pub graph_dir: PathBuf,
}

// =============================================================================
// Server Configuration
// =============================================================================

/// Configuration for the visualization server.
pub struct ServeConfig {
    /// Port to listen on.
    pub port: u16,
    /// Whether to open the browser automatically.
    pub open_browser: bool,
    /// Directory holding the node-link documents.
    pub graph_dir: PathBuf,
}

impl From<&secviz_core::Config> for ServeConfig {
    fn from(config: &secviz_core::Config) -> Self {
        Self {
            port: config.serve.port,
            open_browser: config.serve.open_browser,
            graph_dir: config.output.graph_dir.clone(),
        }
    }
}

// =============================================================================
// Server Entry Point
// =============================================================================

/// Builds the router: the viewer page, the JSON API and the raw files.
pub fn router(state: Arc<AppState>) -> Router {
    let raw_files = ServeDir::new(&state.graph_dir);

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/graphs", get(handlers::api_graphs))
        .route("/api/graphs/{name}", get(handlers::api_graph))
        .nest_service("/graphs", raw_files)
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}

/// Start the visualization server.
pub async fn start_server(config: ServeConfig) -> Result<(), Box<dyn std::error::Error>> {
    if !config.graph_dir.is_dir() {
        tracing::warn!(
            "Graph directory {} does not exist yet; run `secviz graph` first",
            config.graph_dir.display()
        );
    }

    let state = Arc::new(AppState {
        graph_dir: config.graph_dir.clone(),
    });
    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let url = format!("http://localhost:{}", config.port);

    println!("Starting secviz visualization server...");
    println!("Graphs: {}", config.graph_dir.display());
    println!("Viewer: {}", url);
    println!("Press Ctrl+C to stop\n");

    if config.open_browser {
        if let Err(e) = open::that(&url) {
            eprintln!("Could not open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
