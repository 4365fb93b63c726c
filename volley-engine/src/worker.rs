//! Fixed-concurrency period driver

use crate::error::EngineResult;
use crate::executor::PeriodExecutor;
use crate::pool::{RequestSource, ResolvedRequest};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, warn};
use volley_core::Outcome;
use volley_http::{failure_reason, TransportOptions};

/// Drives a fixed number of parallel workers for a wall-clock duration
///
/// Each worker owns its own client and outcome buffer and loops draw /
/// execute / record until its elapsed time exceeds the period duration.
/// Workers do not coordinate; the buffers are concatenated after all workers
/// finish. Only the wall-clock bound is guaranteed, not a request count.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    concurrency: u32,
    duration: Duration,
    transport: TransportOptions,
}

impl WorkerPool {
    pub fn new(concurrency: u32, duration: Duration, transport: TransportOptions) -> Self {
        Self {
            concurrency,
            duration,
            transport,
        }
    }
}

#[async_trait]
impl PeriodExecutor for WorkerPool {
    async fn execute(&self, source: Arc<dyn RequestSource>) -> EngineResult<Vec<Outcome>> {
        let mut workers = JoinSet::new();
        for worker in 0..self.concurrency {
            let client = self.transport.build_client()?;
            let source = Arc::clone(&source);
            let duration = self.duration;
            workers.spawn(run_worker(worker, client, source, duration));
        }

        // No partial results: every worker must report done.
        let mut outcomes = Vec::new();
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(mut batch) => outcomes.append(&mut batch),
                Err(e) => warn!(error = %e, "attack worker panicked; its outcomes are lost"),
            }
        }
        Ok(outcomes)
    }
}

async fn run_worker(
    worker: u32,
    client: reqwest::Client,
    source: Arc<dyn RequestSource>,
    duration: Duration,
) -> Vec<Outcome> {
    let started = Instant::now();
    let mut outcomes = Vec::new();
    while started.elapsed() < duration {
        outcomes.push(issue(&client, source.draw()).await);
    }
    debug!(worker, requests = outcomes.len(), "worker finished");
    outcomes
}

/// Execute one request and record its outcome
///
/// A transport failure is recovered locally as a failure outcome; the caller
/// keeps issuing requests. The response body is drained so the connection can
/// be reused, and the drain counts toward the measured latency.
pub(crate) async fn issue(client: &reqwest::Client, request: ResolvedRequest) -> Outcome {
    let started = Instant::now();
    let result = client
        .request(request.method.into(), request.url)
        .headers(request.headers)
        .body(request.body)
        .send()
        .await;
    match result {
        Ok(response) => {
            let status = response.status().as_u16();
            let _ = response.bytes().await;
            Outcome::success(started.elapsed(), status)
        }
        Err(err) => Outcome::failure(started.elapsed(), failure_reason(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::RequestPool;
    use volley_core::{Job, Verdict};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn stub_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        server
    }

    fn pool_for(host: String) -> Arc<dyn RequestSource> {
        let mut job = Job::new("worker-test");
        job.hosts = vec![host];
        Arc::new(RequestPool::build(&job).unwrap())
    }

    #[tokio::test]
    async fn test_workers_hit_stub_until_duration_elapses() {
        let server = stub_server().await;
        let pool = pool_for(server.address().to_string());
        let driver = WorkerPool::new(4, Duration::from_millis(300), TransportOptions::default());

        let started = Instant::now();
        let outcomes = driver.execute(pool).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(300));
        assert!(!outcomes.is_empty());
        assert!(outcomes.iter().all(|o| o.verdict == Verdict::Status(200)));
    }

    #[tokio::test]
    async fn test_refused_connection_yields_failure_outcomes() {
        // Bind then drop a listener so the port is closed.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let pool = pool_for(format!("127.0.0.1:{}", port));
        let driver = WorkerPool::new(2, Duration::from_millis(200), TransportOptions::default());

        let outcomes = driver.execute(pool).await.unwrap();
        assert!(!outcomes.is_empty());
        assert!(outcomes
            .iter()
            .all(|o| matches!(o.verdict, Verdict::Error(_))));
    }
}
