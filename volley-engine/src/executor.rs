//! Period executor abstraction

use crate::error::EngineResult;
use crate::pool::RequestSource;
use async_trait::async_trait;
use std::sync::Arc;
use volley_core::Outcome;

/// Executes one period of a ramp against a request source
///
/// The two intensity policies, a fixed worker count and a fixed dispatch
/// rate, implement this trait and produce the same stream of outcomes, so
/// the ramp controller selects a driver per period without caring which one
/// runs.
#[async_trait]
pub trait PeriodExecutor: Send + Sync {
    async fn execute(&self, source: Arc<dyn RequestSource>) -> EngineResult<Vec<Outcome>>;
}
