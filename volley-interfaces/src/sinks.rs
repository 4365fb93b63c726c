//! Write-side collaborator contracts
//!
//! Both sinks are best-effort from the engine's point of view: a failed write
//! is logged and the run carries on. Losing telemetry is preferable to losing
//! completed network test results.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use volley_core::{Job, JobId, Report, RunLogId, RunState};

/// Errors from sink collaborators
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Sink write failed: {0}")]
    WriteFailed(String),
}

/// Publishes the job's live intensity for external observers
///
/// Called once per period transition with the period's intensity magnitude,
/// and once with 0 when the run completes or aborts.
#[async_trait]
pub trait LiveStateSink: Send + Sync {
    async fn publish_intensity(&self, job: JobId, value: u64) -> Result<(), SinkError>;
}

/// Persists the historical record of a run
#[async_trait]
pub trait RunLogSink: Send + Sync {
    /// Record that a run is starting; returns the log identifier the end
    /// record will be written under.
    async fn record_start(
        &self,
        job: &Job,
        comment: &str,
        started_at: DateTime<Utc>,
    ) -> Result<RunLogId, SinkError>;

    /// Record the terminal state of a run with its full ordered report list.
    /// This write is the authoritative historical record. An early-stopped
    /// run still terminates as [`RunState::Completed`], with a shorter list.
    async fn record_end(
        &self,
        log: RunLogId,
        reports: &[Report],
        ended_at: DateTime<Utc>,
        state: RunState,
    ) -> Result<(), SinkError>;
}
