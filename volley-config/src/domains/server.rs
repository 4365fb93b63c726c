//! Dashboard server configuration
//!
//! Listen address, team grouping and layout settings that the original
//! deployment carried as process globals, reshaped into an explicit config
//! domain constructed once at startup.

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, Validatable};
use serde::{Deserialize, Serialize};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address for the dashboard
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Teams used for grouping jobs
    #[serde(default = "default_teams")]
    pub teams: Vec<String>,

    /// Render pages with the shared layout
    #[serde(default = "crate::domains::utils::default_true")]
    pub show_layout: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            teams: default_teams(),
            show_layout: true,
        }
    }
}

impl Validatable for ServerConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.bind_addr, "bind_addr", self.domain_name())?;
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|e| self.validation_error(format!("bind_addr is not a socket address: {}", e)))?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "server"
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_teams() -> Vec<String> {
    vec!["default".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_bind_addr_rejected() {
        let config = ServerConfig {
            bind_addr: "not-an-address".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
