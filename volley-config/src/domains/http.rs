//! Outbound HTTP transport configuration
//!
//! Defaults for the per-run transport options; individual jobs can override
//! timeout, keep-alive and compression when a run is started.

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_timeout"
    )]
    pub timeout: Duration,

    /// Reuse connections between requests
    #[serde(default = "crate::domains::utils::default_true")]
    pub keep_alive: bool,

    /// Accept and decompress gzip response bodies
    #[serde(default = "crate::domains::utils::default_true")]
    pub compression: bool,

    /// Skip TLS certificate validation (test-traffic mode)
    #[serde(default = "crate::domains::utils::default_false")]
    pub insecure_tls: bool,

    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            keep_alive: true,
            compression: true,
            insecure_tls: false,
            user_agent: default_user_agent(),
        }
    }
}

impl Validatable for HttpConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.timeout.as_secs(), "timeout", self.domain_name())?;
        validate_required_string(&self.user_agent, "user_agent", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "http"
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_user_agent() -> String {
    "Volley/0.1".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = HttpConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.keep_alive);
        assert!(config.compression);
        assert!(!config.insecure_tls);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = HttpConfig {
            timeout: Duration::from_secs(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
