//! # Volley Interfaces
//!
//! Contracts between the attack engine and its external collaborators.
//!
//! The engine drives traffic and aggregates reports. Everything else (where
//! job definitions live, where live intensity is displayed, where run logs
//! are persisted) sits behind the traits in this crate. The dashboard and
//! its document store implement them; tests supply in-memory fakes.

pub mod jobs;
pub mod sinks;

// Re-export commonly used types
pub use jobs::{JobSource, JobSourceError};
pub use sinks::{LiveStateSink, RunLogSink, SinkError};
