//! HTML template rendering for the graph visualization.
//!
//! Templates are stored as separate files for maintainability:
//! - `templates/index.html` - HTML structure
//! - `templates/styles.css` - CSS styles
//! - `templates/app.js` - d3 force-layout viewer
//!
//! Files are embedded at compile time using `include_str!`.

use std::path::Path;

const HTML_TEMPLATE: &str = include_str!("templates/index.html");
const STYLES: &str = include_str!("templates/styles.css");
const SCRIPT: &str = include_str!("templates/app.js");

/// Render the visualizer page.
///
/// Substitutes `{{GRAPH_DIR}}`, `{{STYLES}}` and `{{SCRIPT}}` in the template.
pub fn render_graph_page(graph_dir: &Path) -> String {
    HTML_TEMPLATE
        .replace("{{GRAPH_DIR}}", &html_escape(&graph_dir.display().to_string()))
        .replace("{{STYLES}}", STYLES)
        .replace("{{SCRIPT}}", SCRIPT)
}

/// Escape HTML special characters to prevent XSS.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
