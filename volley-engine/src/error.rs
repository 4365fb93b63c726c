//! Engine error types

use thiserror::Error;
use volley_core::{CoreError, JobId};
use volley_http::HttpError;
use volley_interfaces::JobSourceError;

/// Engine result type
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised by the attack engine
///
/// Everything here is fatal to *starting* a run or a period; per-request
/// network failures are not errors, they become failure outcomes.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("request pool is empty: hosts x seeds produced no requests")]
    EmptyPool,

    #[error("invalid job: {0}")]
    InvalidJob(#[from] CoreError),

    #[error("job {0} already has an active run")]
    AlreadyRunning(JobId),

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("failed to build latency histogram: {0}")]
    Metrics(#[from] hdrhistogram::CreationError),

    #[error("failed to fetch job: {0}")]
    JobSource(#[from] JobSourceError),
}
