//! Configuration loading

use crate::domains::VolleyConfig;
use crate::error::ConfigResult;
use std::path::Path;

/// Configuration loader
#[derive(Debug, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from a YAML file
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<VolleyConfig> {
        let content = std::fs::read_to_string(path)?;
        self.from_yaml(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml(&self, content: &str) -> ConfigResult<VolleyConfig> {
        let config: VolleyConfig = serde_yaml::from_str(content)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback to defaults
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<VolleyConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => Ok(VolleyConfig::default()),
        }
    }
}
