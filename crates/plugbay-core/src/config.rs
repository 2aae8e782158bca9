//! Host configuration.
//!
//! Defaults, TOML file loading and environment overrides live here so the
//! CLI and tests do not duplicate them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HostError, Result};

/// Environment variable names.
pub mod env_vars {
    /// Overrides the plugin directory.
    pub const PLUGIN_DIR: &str = "PLUGBAY_PLUGIN_DIR";
    /// Switches CLI logging to JSON output.
    pub const LOG_JSON: &str = "PLUGBAY_LOG_JSON";
}

/// Default plugin directory, relative to the working directory.
pub const DEFAULT_PLUGIN_DIR: &str = "plugins";

/// Host configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Directory scanned for loadable plugin libraries.
    pub plugin_dir: PathBuf,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            plugin_dir: PathBuf::from(DEFAULT_PLUGIN_DIR),
        }
    }
}

impl HostConfig {
    /// Create a configuration for a specific plugin directory.
    pub fn new(plugin_dir: impl Into<PathBuf>) -> Self {
        Self {
            plugin_dir: plugin_dir.into(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| HostError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        toml::from_str(&raw)
            .map_err(|e| HostError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Apply environment variable overrides.
    pub fn apply_env(mut self) -> Self {
        if let Ok(dir) = std::env::var(env_vars::PLUGIN_DIR) {
            if !dir.is_empty() {
                self.plugin_dir = PathBuf::from(dir);
            }
        }
        self
    }
}
