//! Default values for secviz configuration.

// ============================================================================
// Files
// ============================================================================

/// Project-local config file name.
pub const CONFIG_FILE: &str = "secviz.toml";

/// Directory under the user config dir (`~/.config/secviz`).
pub const CONFIG_DIR_NAME: &str = "secviz";

/// User config file name inside [`CONFIG_DIR_NAME`].
pub const USER_CONFIG_FILE: &str = "config.toml";

// ============================================================================
// Output Defaults
// ============================================================================

/// Directory receiving the generated graph documents.
pub const DEFAULT_GRAPH_DIR: &str = "gen/graphs";

/// Whether graph documents are written indented.
pub const DEFAULT_PRETTY: bool = true;

// ============================================================================
// Serve Defaults
// ============================================================================

/// Default port for the visualizer server.
pub const DEFAULT_PORT: u16 = 3333;

/// Whether `serve` opens a browser tab on start.
pub const DEFAULT_OPEN_BROWSER: bool = true;

// ============================================================================
// Environment
// ============================================================================

pub const ENV_CWE_JSON: &str = "SECVIZ_CWE_JSON";
pub const ENV_CAPEC_JSON: &str = "SECVIZ_CAPEC_JSON";
pub const ENV_GRAPH_DIR: &str = "SECVIZ_GRAPH_DIR";
pub const ENV_PORT: &str = "SECVIZ_PORT";
