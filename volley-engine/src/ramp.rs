//! Ramp control: the per-run state machine

use crate::error::{EngineError, EngineResult};
use crate::executor::PeriodExecutor;
use crate::metrics::aggregate;
use crate::pool::{RequestPool, RequestSource};
use crate::rate::RateDriver;
use crate::worker::WorkerPool;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use volley_core::{Intensity, Job, JobId, Report, RunRegistry, RunState};
use volley_interfaces::{JobSource, LiveStateSink, RunLogSink};

/// Owns the run registries and drives jobs through their period sequences
///
/// One controller instance is shared by the whole process; arbitrarily many
/// distinct jobs can run at once, but a job id can have at most one active
/// run. Stop requests are cooperative: they are checked between periods only,
/// so cancellation latency is bounded by the duration of the current period.
pub struct RampController {
    running: Arc<RunRegistry>,
    stopping: Arc<RunRegistry>,
    jobs: Arc<dyn JobSource>,
    live: Arc<dyn LiveStateSink>,
    logs: Arc<dyn RunLogSink>,
}

impl RampController {
    pub fn new(
        jobs: Arc<dyn JobSource>,
        live: Arc<dyn LiveStateSink>,
        logs: Arc<dyn RunLogSink>,
    ) -> Self {
        Self {
            running: Arc::new(RunRegistry::new()),
            stopping: Arc::new(RunRegistry::new()),
            jobs,
            live,
            logs,
        }
    }

    /// Whether a run for this job is between start and terminal completion
    pub fn is_running(&self, id: JobId) -> bool {
        self.running.exists(id)
    }

    /// Whether a stop is pending for this job
    pub fn is_stop_requested(&self, id: JobId) -> bool {
        self.stopping.exists(id)
    }

    /// Request a cooperative stop of an active run
    ///
    /// Returns whether the request was accepted. A job that is not running
    /// cannot have a pending stop, so the request is dropped in that case.
    pub fn request_stop(&self, id: JobId) -> bool {
        if !self.running.exists(id) {
            debug!(job_id = %id, "stop requested for a job that is not running");
            return false;
        }
        self.stopping.put(id);
        // The run may have finished between the check and the put; take the
        // entry back so a terminal job never sits in the stop set.
        if !self.running.exists(id) {
            self.stopping.delete(id);
            debug!(job_id = %id, "run finished while the stop was being requested");
            return false;
        }
        info!(job_id = %id, "stop requested; takes effect at the next period boundary");
        true
    }

    /// Fetch a job and launch its run in the background
    ///
    /// The fallible part (fetch, validation, pool materialization, duplicate
    /// detection) happens synchronously so the caller gets configuration
    /// problems back; the period loop is then spawned fire-and-forget.
    /// Completion is observed through the live-state and run-log sinks.
    pub async fn launch(&self, id: JobId, comment: &str) -> EngineResult<()> {
        let job = self.jobs.fetch(id).await?;
        let prepared = self.prepare(job, comment)?;
        tokio::spawn(prepared.execute());
        Ok(())
    }

    /// Drive a run to completion inline and return its reports
    pub async fn run(&self, job: Job, comment: &str) -> EngineResult<Vec<Report>> {
        Ok(self.prepare(job, comment)?.execute().await)
    }

    /// Validate and register a run without executing it yet
    ///
    /// On success the job id is already a member of the running set; the
    /// returned [`PreparedRun`] must be executed to release it again.
    fn prepare(&self, job: Job, comment: &str) -> EngineResult<PreparedRun> {
        job.validate()?;
        let pool = RequestPool::build(&job)?;
        if !self.running.try_put(job.id) {
            return Err(EngineError::AlreadyRunning(job.id));
        }
        Ok(PreparedRun {
            job,
            comment: comment.to_string(),
            source: Arc::new(pool),
            running: Arc::clone(&self.running),
            stopping: Arc::clone(&self.stopping),
            live: Arc::clone(&self.live),
            logs: Arc::clone(&self.logs),
        })
    }
}

/// A validated, registered run that has not started driving traffic yet
pub struct PreparedRun {
    job: Job,
    comment: String,
    source: Arc<dyn RequestSource>,
    running: Arc<RunRegistry>,
    stopping: Arc<RunRegistry>,
    live: Arc<dyn LiveStateSink>,
    logs: Arc<dyn RunLogSink>,
}

impl PreparedRun {
    /// Run the period loop to its terminal state
    ///
    /// Periods execute strictly sequentially; each period's intensity is
    /// published before it starts, its outcomes are aggregated into a report
    /// appended in period order, and a pending stop request ends the ramp at
    /// the period boundary. Cleanup always runs: the job id leaves the
    /// running set, live intensity resets to zero, and the report list is
    /// handed to the run-log sink.
    pub async fn execute(self) -> Vec<Report> {
        let job_id = self.job.id;
        info!(job_id = %job_id, name = %self.job.name, periods = self.job.periods.len(), "ramp run starting");

        let log = match self
            .logs
            .record_start(&self.job, &self.comment, Utc::now())
            .await
        {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(job_id = %job_id, error = %e, "run log start write failed; continuing without a log record");
                None
            }
        };

        let mut reports = Vec::with_capacity(self.job.periods.len());
        for (index, period) in self.job.periods.iter().enumerate() {
            info!(job_id = %job_id, period = index, intensity = %period.intensity, "period starting");
            if let Err(e) = self
                .live
                .publish_intensity(job_id, period.intensity.value())
                .await
            {
                warn!(job_id = %job_id, error = %e, "live intensity write failed");
            }

            let driver: Box<dyn PeriodExecutor> = match period.intensity {
                Intensity::Concurrency(c) => Box::new(WorkerPool::new(
                    c,
                    period.duration,
                    self.job.transport.clone(),
                )),
                Intensity::Rate(r) => Box::new(RateDriver::new(
                    r,
                    period.duration,
                    self.job.transport.clone(),
                )),
            };
            let outcomes = match driver.execute(Arc::clone(&self.source)).await {
                Ok(outcomes) => outcomes,
                Err(e) => {
                    error!(job_id = %job_id, period = index, error = %e, "period driver failed; ending ramp early");
                    break;
                }
            };
            match aggregate(&outcomes, period.intensity, period.duration) {
                Ok(report) => reports.push(report),
                Err(e) => {
                    error!(job_id = %job_id, period = index, error = %e, "report aggregation failed; ending ramp early");
                    break;
                }
            }

            if self.stopping.exists(job_id) {
                self.stopping.delete(job_id);
                info!(job_id = %job_id, completed = reports.len(), "stop request consumed; remaining periods skipped");
                break;
            }
        }

        self.running.delete(job_id);
        // A stop requested during a period whose driver failed was never
        // consumed at a boundary; drop it here so a terminal job is absent
        // from both registries.
        self.stopping.delete(job_id);
        if let Err(e) = self.live.publish_intensity(job_id, 0).await {
            warn!(job_id = %job_id, error = %e, "live intensity reset failed");
        }
        if let Some(log) = log {
            if let Err(e) = self
                .logs
                .record_end(log, &reports, Utc::now(), RunState::Completed)
                .await
            {
                error!(job_id = %job_id, error = %e, "run log end write failed; this run's reports were not persisted");
            }
        }
        info!(job_id = %job_id, reports = reports.len(), "ramp run completed");
        reports
    }
}
