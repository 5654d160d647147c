//! Configuration management for secviz.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `secviz.toml` file
//! 3. User config `~/.config/secviz/config.toml`
//! 4. Built-in defaults (lowest priority)
//!
//! Command-line flags are applied on top by the binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Taxonomy collection inputs.
    pub input: InputConfig,

    /// Graph document output.
    pub output: OutputConfig,

    /// Visualizer server.
    pub serve: ServeConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./secviz.toml` (project local)
    /// 2. `~/.config/secviz/config.toml` (user config)
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(CONFIG_FILE).exists() {
            return Self::from_file(CONFIG_FILE);
        }

        if let Some(user_config) = Self::user_config_path() {
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Path of the user-level config file, if a config dir exists.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(USER_CONFIG_FILE))
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from TOML text, without environment overrides.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Keys are the `SECVIZ_*` environment variable names.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(path) = lookup(ENV_CWE_JSON) {
            self.input.cwe_json = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup(ENV_CAPEC_JSON) {
            self.input.capec_json = Some(PathBuf::from(path));
        }
        if let Some(dir) = lookup(ENV_GRAPH_DIR) {
            self.output.graph_dir = PathBuf::from(dir);
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.serve.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("{} is not a port: {:?}", ENV_PORT, port)))?;
        }
        self.validate()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.output.graph_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("output.graph_dir is empty".to_string()));
        }
        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        Config::default().to_toml_string()
    }

    /// Render this configuration as TOML.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

/// Input collection paths. Unset inputs are skipped by `secviz graph`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// CWE collection JSON (`{"CWEs": {...}}`).
    pub cwe_json: Option<PathBuf>,

    /// CAPEC collection JSON (`{"Capecs": {...}}`).
    pub capec_json: Option<PathBuf>,
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for the generated graph documents.
    pub graph_dir: PathBuf,

    /// Write indented JSON.
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            graph_dir: PathBuf::from(DEFAULT_GRAPH_DIR),
            pretty: DEFAULT_PRETTY,
        }
    }
}

/// Visualizer server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    pub port: u16,

    /// Open the visualizer in a browser on start.
    pub open_browser: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            open_browser: DEFAULT_OPEN_BROWSER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output.graph_dir, PathBuf::from(DEFAULT_GRAPH_DIR));
        assert_eq!(config.serve.port, DEFAULT_PORT);
        assert!(config.input.cwe_json.is_none());
    }

    #[test]
    fn test_config_to_toml() {
        let toml_str = Config::default_config_string();
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("[serve]"));
    }

    #[test]
    fn test_port_override_must_parse() {
        let mut config = Config::default();
        let result = config.apply_overrides(|key| (key == ENV_PORT).then(|| "http".to_string()));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
