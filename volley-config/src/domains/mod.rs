//! Domain-specific configuration modules

pub mod http;
pub mod server;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Main Volley configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VolleyConfig {
    /// Outbound HTTP transport configuration
    #[serde(default)]
    pub http: http::HttpConfig,

    /// Dashboard server configuration
    #[serde(default)]
    pub server: server::ServerConfig,
}

impl VolleyConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.http.validate()?;
        self.server.validate()?;
        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = VolleyConfig::default();
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}
