//! Fixed-rate period driver

use crate::error::EngineResult;
use crate::executor::PeriodExecutor;
use crate::pool::RequestSource;
use crate::worker::issue;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;
use volley_core::Outcome;
use volley_http::TransportOptions;

/// Dispatches requests at a target rate for a wall-clock duration
///
/// Dispatch is smoothed across the interval with a tick every 1/rate seconds
/// rather than issuing bursts. Each tick fires one request as its own task on
/// a shared client; outcomes stream back over a channel. Requests still in
/// flight when the duration elapses are awaited up to their own timeout, not
/// aborted.
#[derive(Debug, Clone)]
pub struct RateDriver {
    rate: u32,
    duration: Duration,
    transport: TransportOptions,
}

impl RateDriver {
    pub fn new(rate: u32, duration: Duration, transport: TransportOptions) -> Self {
        Self {
            rate,
            duration,
            transport,
        }
    }
}

#[async_trait]
impl PeriodExecutor for RateDriver {
    async fn execute(&self, source: Arc<dyn RequestSource>) -> EngineResult<Vec<Outcome>> {
        let client = self.transport.build_client()?;
        let mut ticker = tokio::time::interval(Duration::from_secs_f64(1.0 / f64::from(self.rate)));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let deadline = tokio::time::sleep(self.duration);
        tokio::pin!(deadline);

        let mut dispatched: u64 = 0;
        loop {
            tokio::select! {
                _ = &mut deadline => break,
                _ = ticker.tick() => {
                    let client = client.clone();
                    let request = source.draw();
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        // The receiver only goes away if the whole period is
                        // dropped; a send failure is not worth surfacing.
                        let _ = tx.send(issue(&client, request).await);
                    });
                    dispatched += 1;
                }
            }
        }

        // Drop our sender so the channel closes once in-flight requests end.
        drop(tx);
        let mut outcomes = Vec::with_capacity(dispatched as usize);
        while let Some(outcome) = rx.recv().await {
            outcomes.push(outcome);
        }
        debug!(dispatched, collected = outcomes.len(), "rate period drained");
        Ok(outcomes)
    }
}
