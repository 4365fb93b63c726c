//! HTTP transport layer for Volley
//!
//! This crate owns the pieces of the outbound HTTP surface that load drivers
//! share: the method enum, the per-run transport options, reqwest client
//! construction, and the normalization of transport failures into stable
//! reason strings.

pub mod errors;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use errors::{failure_reason, HttpError};
pub use transport::TransportOptions;
pub use types::{HttpMethod, HttpMethodError};
