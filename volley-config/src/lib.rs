//! Domain-driven configuration management for Volley
//!
//! This crate provides modular configuration split by functional domains,
//! with validation, defaults, and YAML file loading. The process constructs
//! one [`VolleyConfig`] at startup and passes it by reference into the
//! components that need it; nothing reads ambient global state.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

// Re-export domain configurations
pub use domains::{http::HttpConfig, server::ServerConfig, VolleyConfig};

// Re-export utilities
pub use domains::utils::serde_duration;
