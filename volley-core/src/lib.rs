//! Core domain models for Volley
//!
//! Jobs, request seeds, intensity periods, per-request outcomes, per-period
//! reports, and the concurrency-safe run registries. Everything here is plain
//! data plus validation; driving traffic lives in `volley-engine`.

pub mod error;
pub mod job;
pub mod outcome;
pub mod registry;
pub mod report;
pub mod types;

// Re-export main types
pub use error::CoreError;
pub use job::{Intensity, Job, Period, Seed, SeedBody};
pub use outcome::{Outcome, Verdict};
pub use registry::RunRegistry;
pub use report::Report;
pub use types::{JobId, RunLogId, RunState};
