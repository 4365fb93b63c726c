//! Volley attack engine
//!
//! Given a job definition, this crate materializes the request pool, drives
//! concurrent HTTP traffic against the targets period by period, aggregates
//! raw outcomes into reports, and cooperates with mid-run stop requests.
//!
//! The entry point is [`RampController`]: `launch` starts a fire-and-forget
//! run from a request handler, `run` drives one inline for embedders and
//! tests. Period execution is abstracted behind [`PeriodExecutor`] with two
//! drivers: a fixed-concurrency [`WorkerPool`] and a fixed-rate
//! [`RateDriver`], both producing the same stream of outcomes.

pub mod error;
pub mod executor;
pub mod metrics;
pub mod pool;
pub mod ramp;
pub mod rate;
pub mod worker;

// Re-export main types
pub use error::{EngineError, EngineResult};
pub use executor::PeriodExecutor;
pub use metrics::aggregate;
pub use pool::{RequestPool, RequestSource, ResolvedRequest, StaticTargets};
pub use ramp::{PreparedRun, RampController};
pub use rate::RateDriver;
pub use worker::WorkerPool;
