//! Per-run transport options and client construction

use crate::errors::HttpError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use volley_config::HttpConfig;

/// Transport options for one load-test run
///
/// These are per-run configuration, not global state: every run carries its
/// own copy, seeded from [`volley_config::HttpConfig`] and overridable when
/// the run is started.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportOptions {
    /// Per-request timeout
    #[serde(with = "volley_config::serde_duration")]
    pub timeout: Duration,

    /// Reuse connections between requests
    pub keep_alive: bool,

    /// Accept and decompress gzip response bodies
    pub compression: bool,

    /// Skip TLS certificate validation (test-traffic mode)
    pub insecure_tls: bool,

    /// User agent string
    pub user_agent: String,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            keep_alive: true,
            compression: true,
            insecure_tls: false,
            user_agent: "Volley/0.1".to_string(),
        }
    }
}

impl From<&HttpConfig> for TransportOptions {
    fn from(config: &HttpConfig) -> Self {
        Self {
            timeout: config.timeout,
            keep_alive: config.keep_alive,
            compression: config.compression,
            insecure_tls: config.insecure_tls,
            user_agent: config.user_agent.clone(),
        }
    }
}

impl TransportOptions {
    /// Build a reqwest client honoring these options
    ///
    /// Drivers call this once per worker (fixed-concurrency) or once per
    /// period (fixed-rate); the client itself is cheaply cloneable.
    pub fn build_client(&self) -> Result<reqwest::Client, HttpError> {
        debug!(
            timeout_secs = self.timeout.as_secs(),
            keep_alive = self.keep_alive,
            compression = self.compression,
            "building attack client"
        );
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.clone());
        if !self.keep_alive {
            // An empty idle pool forces a fresh connection per request
            builder = builder.pool_max_idle_per_host(0);
        }
        if !self.compression {
            builder = builder.no_gzip();
        }
        if self.insecure_tls {
            builder = builder.danger_accept_invalid_certs(true);
        }
        builder.build().map_err(HttpError::ClientBuild)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_config() {
        let config = HttpConfig {
            timeout: Duration::from_secs(3),
            keep_alive: false,
            compression: false,
            insecure_tls: true,
            ..Default::default()
        };
        let options = TransportOptions::from(&config);
        assert_eq!(options.timeout, Duration::from_secs(3));
        assert!(!options.keep_alive);
        assert!(!options.compression);
        assert!(options.insecure_tls);
        assert_eq!(options.user_agent, config.user_agent);
    }

    #[test]
    fn test_build_client() {
        let options = TransportOptions {
            keep_alive: false,
            compression: false,
            insecure_tls: true,
            ..Default::default()
        };
        assert!(options.build_client().is_ok());
    }
}
