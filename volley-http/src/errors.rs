//! HTTP error types and failure-reason normalization

use std::error::Error as StdError;

/// Error type for HTTP transport operations
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header name: {0}")]
    InvalidHeaderName(String),

    #[error("Invalid header value for '{0}'")]
    InvalidHeaderValue(String),
}

/// Reduce a transport failure to a stable reason string
///
/// Reasons key the per-period error histogram, so they must not embed
/// request-specific detail such as the target URL. Timeouts and connection
/// failures are the common cases and get their own buckets; anything else
/// falls back to the error's own rendering.
pub fn failure_reason(err: reqwest::Error) -> String {
    if err.is_timeout() {
        return "request timed out".to_string();
    }
    let err = err.without_url();
    if err.is_connect() {
        return match innermost_source(&err) {
            Some(cause) => format!("connection failed: {}", cause),
            None => "connection failed".to_string(),
        };
    }
    err.to_string()
}

fn innermost_source(err: &dyn StdError) -> Option<String> {
    let mut source = err.source()?;
    while let Some(next) = source.source() {
        source = next;
    }
    Some(source.to_string())
}
