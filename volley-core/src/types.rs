//! Shared identifier and state types

use serde::{Deserialize, Serialize};

/// Identifier of a stored job definition
pub type JobId = uuid::Uuid;

/// Identifier of a persisted run log
pub type RunLogId = uuid::Uuid;

/// Lifecycle state of a run as recorded in the run log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// The run is between start and terminal completion
    Running,
    /// The run finished, either through all periods or an early stop
    Completed,
}
