//! Aggregated per-period reports

use crate::job::Intensity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Aggregated metrics for one completed period
///
/// Appended to the run's report list in period order and never mutated
/// afterward; consumers plot the list to see ramp behavior over time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Intensity the period was configured with
    pub intensity: Intensity,
    /// Wall-clock duration the period actually ran
    pub duration: Duration,
    /// Total requests issued, successes and failures together
    pub requests: u64,
    /// successes * 100 / total, or 0 when no requests were issued
    pub success_ratio: f64,
    /// Successful responses per second of period duration
    pub qps: f64,
    /// Mean latency over successful requests, zero when there were none
    pub latency_mean: Duration,
    pub latency_p95: Duration,
    pub latency_p99: Duration,
    /// Successful responses keyed by status code
    pub status_codes: HashMap<String, u64>,
    /// Failures keyed by normalized reason
    pub errors: HashMap<String, u64>,
}

impl Report {
    /// Number of successful requests in this period
    pub fn successes(&self) -> u64 {
        self.status_codes.values().sum()
    }

    /// Number of failed requests in this period
    pub fn failures(&self) -> u64 {
        self.errors.values().sum()
    }
}
