//! Per-request outcomes

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What one executed request produced: a status code or a failure reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The request completed with an HTTP status code
    Status(u16),
    /// The request failed in transport (timeout, refused connection, DNS,
    /// TLS); the reason is a normalized description, never a status code
    Error(String),
}

/// The result of one executed request
///
/// Produced by a period driver, consumed once by the metrics aggregation;
/// never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub elapsed: Duration,
    pub verdict: Verdict,
}

impl Outcome {
    pub fn success(elapsed: Duration, status: u16) -> Self {
        Self {
            elapsed,
            verdict: Verdict::Status(status),
        }
    }

    pub fn failure(elapsed: Duration, reason: impl Into<String>) -> Self {
        Self {
            elapsed,
            verdict: Verdict::Error(reason.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.verdict, Verdict::Status(_))
    }
}
