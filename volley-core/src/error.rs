//! Core domain error types

use thiserror::Error;

/// Errors raised by domain-model validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("job has no target hosts")]
    NoHosts,

    #[error("job has no request seeds")]
    NoSeeds,

    #[error("job has no periods")]
    NoPeriods,

    #[error("period {index}: duration must be greater than zero")]
    ZeroDuration { index: usize },

    #[error("period {index}: intensity must be greater than zero")]
    ZeroIntensity { index: usize },
}
