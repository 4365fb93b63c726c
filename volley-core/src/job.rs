//! Job definitions: seeds, intensity periods and validation

use crate::error::CoreError;
use crate::types::JobId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use volley_http::{HttpMethod, TransportOptions};

/// One variant of request shape drawn from a job's seed pool
///
/// Header and query values are JSON scalars or arrays of scalars; an array
/// header produces one header occurrence per element, in order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Seed {
    pub headers: HashMap<String, JsonValue>,
    pub params: HashMap<String, JsonValue>,
    pub body: SeedBody,
}

/// Request body carried by a seed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedBody {
    /// Pre-serialized payload sent as-is (e.g. a JSON document)
    Raw(String),
    /// Key/value map form-encoded when the request pool is built
    Form(HashMap<String, JsonValue>),
}

impl Default for SeedBody {
    fn default() -> Self {
        SeedBody::Form(HashMap::new())
    }
}

/// Intensity of one period: a fixed worker count or a target request rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    /// Fixed number of concurrent workers
    Concurrency(u32),
    /// Target dispatch rate in requests per second
    Rate(u32),
}

impl Intensity {
    /// Numeric magnitude, as published to the live-state sink
    pub fn value(&self) -> u64 {
        match self {
            Intensity::Concurrency(c) => u64::from(*c),
            Intensity::Rate(r) => u64::from(*r),
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intensity::Concurrency(c) => write!(f, "concurrency={}", c),
            Intensity::Rate(r) => write!(f, "rate={}/s", r),
        }
    }
}

/// One step of a ramp: an intensity held for a wall-clock duration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Period {
    pub intensity: Intensity,
    #[serde(with = "volley_config::serde_duration")]
    pub duration: Duration,
}

/// A stored load-test job definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub name: String,
    /// Request path (plus optional base query string) applied to every host
    pub url: String,
    /// Host pool for randomized choice, e.g. "localhost:8000"
    pub hosts: Vec<String>,
    pub method: HttpMethod,
    pub seeds: Vec<Seed>,
    pub periods: Vec<Period>,
    #[serde(default)]
    pub transport: TransportOptions,
    pub created_at: DateTime<Utc>,
}

impl Job {
    /// Create a job with the defaults a freshly created dashboard entry gets:
    /// one localhost host, one empty seed, one 10-worker 5-second period.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            name: name.into(),
            url: "/".to_string(),
            hosts: vec!["localhost:8000".to_string()],
            method: HttpMethod::Get,
            seeds: vec![Seed::default()],
            periods: vec![Period {
                intensity: Intensity::Concurrency(10),
                duration: Duration::from_secs(5),
            }],
            transport: TransportOptions::default(),
            created_at: Utc::now(),
        }
    }

    /// Validate that this job can start a run
    ///
    /// Checked before the job id is registered as running; a job that fails
    /// here never enters the Running state.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.hosts.is_empty() {
            return Err(CoreError::NoHosts);
        }
        if self.seeds.is_empty() {
            return Err(CoreError::NoSeeds);
        }
        if self.periods.is_empty() {
            return Err(CoreError::NoPeriods);
        }
        for (index, period) in self.periods.iter().enumerate() {
            if period.duration.is_zero() {
                return Err(CoreError::ZeroDuration { index });
            }
            if period.intensity.value() == 0 {
                return Err(CoreError::ZeroIntensity { index });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_job_is_valid() {
        let job = Job::new("smoke");
        assert!(job.validate().is_ok());
        assert_eq!(job.hosts, vec!["localhost:8000"]);
        assert_eq!(job.seeds.len(), 1);
        assert_eq!(job.periods.len(), 1);
    }

    #[test]
    fn test_validate_rejects_empty_periods() {
        let mut job = Job::new("empty-periods");
        job.periods.clear();
        assert_eq!(job.validate(), Err(CoreError::NoPeriods));
    }

    #[test]
    fn test_validate_rejects_zero_duration() {
        let mut job = Job::new("zero-duration");
        job.periods.push(Period {
            intensity: Intensity::Rate(50),
            duration: Duration::from_secs(0),
        });
        assert_eq!(job.validate(), Err(CoreError::ZeroDuration { index: 1 }));
    }

    #[test]
    fn test_validate_rejects_zero_intensity() {
        let mut job = Job::new("zero-intensity");
        job.periods[0].intensity = Intensity::Concurrency(0);
        assert_eq!(job.validate(), Err(CoreError::ZeroIntensity { index: 0 }));
    }

    #[test]
    fn test_intensity_value() {
        assert_eq!(Intensity::Concurrency(10).value(), 10);
        assert_eq!(Intensity::Rate(250).value(), 250);
    }

    #[test]
    fn test_job_round_trips_through_json() {
        let mut job = Job::new("serde");
        job.seeds[0].body = SeedBody::Raw("{\"k\":1}".to_string());
        let encoded = serde_json::to_string(&job).unwrap();
        let decoded: Job = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.id, job.id);
        assert!(matches!(decoded.seeds[0].body, SeedBody::Raw(_)));
    }
}
