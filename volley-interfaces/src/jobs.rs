//! Read-only access to stored job definitions

use async_trait::async_trait;
use thiserror::Error;
use volley_core::{Job, JobId};

/// Errors from the job source collaborator
#[derive(Error, Debug)]
pub enum JobSourceError {
    #[error("Job not found: {0}")]
    NotFound(JobId),

    #[error("Job source unavailable: {0}")]
    Unavailable(String),
}

/// Read-only fetch of a job definition by identifier
///
/// A fetch failure is fatal to starting a run; the engine never mutates
/// stored job definitions through this interface.
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn fetch(&self, id: JobId) -> Result<Job, JobSourceError>;
}
