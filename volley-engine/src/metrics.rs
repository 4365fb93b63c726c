//! Reduction of raw outcomes into per-period reports

use crate::error::EngineResult;
use hdrhistogram::Histogram;
use std::collections::HashMap;
use std::time::Duration;
use volley_core::{Intensity, Outcome, Report, Verdict};

/// Aggregate one period's outcomes into an immutable report
///
/// Successes feed the latency estimator and the status-code histogram;
/// failures feed the error histogram under a normalized reason. Throughput
/// counts successful work only: QPS is successes divided by the period's
/// wall-clock duration, and failures never contribute latency samples.
pub fn aggregate(
    outcomes: &[Outcome],
    intensity: Intensity,
    duration: Duration,
) -> EngineResult<Report> {
    let mut status_codes: HashMap<String, u64> = HashMap::new();
    let mut errors: HashMap<String, u64> = HashMap::new();
    // Auto-resizing histogram over microseconds; 3 significant figures is
    // plenty for P95/P99 over request latencies.
    let mut latencies = Histogram::<u64>::new(3)?;
    let mut latency_sum = Duration::ZERO;
    let mut successes: u64 = 0;
    let mut failures: u64 = 0;

    for outcome in outcomes {
        match &outcome.verdict {
            Verdict::Status(code) => {
                successes += 1;
                latency_sum += outcome.elapsed;
                // `record` (not `saturating_record`) so the auto-resize path
                // runs; with auto-resize it is effectively infallible.
                let _ = latencies.record(outcome.elapsed.as_micros() as u64);
                *status_codes.entry(code.to_string()).or_insert(0) += 1;
            }
            Verdict::Error(reason) => {
                failures += 1;
                *errors.entry(normalize_reason(reason)).or_insert(0) += 1;
            }
        }
    }

    let total = successes + failures;
    let success_ratio = if total == 0 {
        0.0
    } else {
        successes as f64 * 100.0 / total as f64
    };
    let qps = successes as f64 / duration.as_secs_f64();
    let (latency_mean, latency_p95, latency_p99) = if successes == 0 {
        (Duration::ZERO, Duration::ZERO, Duration::ZERO)
    } else {
        (
            latency_sum / successes as u32,
            Duration::from_micros(latencies.value_at_quantile(0.95)),
            Duration::from_micros(latencies.value_at_quantile(0.99)),
        )
    };

    Ok(Report {
        intensity,
        duration,
        requests: total,
        success_ratio,
        qps,
        latency_mean,
        latency_p95,
        latency_p99,
        status_codes,
        errors,
    })
}

/// Normalize a failure reason into a histogram key
///
/// Dots are collapsed to colons so structurally similar errors (for example
/// distinct dotted module paths in upstream error strings) merge into one
/// bucket. The normalization is lossy on purpose: it keeps the histogram
/// small at the cost of occasionally merging unrelated reasons.
fn normalize_reason(reason: &str) -> String {
    reason.replace('.', ":")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success(millis: u64) -> Outcome {
        Outcome::success(Duration::from_millis(millis), 200)
    }

    #[test]
    fn test_counts_and_ratio() {
        let outcomes = vec![
            success(10),
            success(20),
            Outcome::success(Duration::from_millis(30), 503),
            Outcome::failure(Duration::from_millis(5), "request timed out"),
        ];
        let report = aggregate(&outcomes, Intensity::Concurrency(4), Duration::from_secs(2)).unwrap();

        assert_eq!(report.requests, 4);
        assert_eq!(report.successes() + report.failures(), report.requests);
        assert_eq!(report.success_ratio, 75.0);
        assert_eq!(report.status_codes.get("200"), Some(&2));
        assert_eq!(report.status_codes.get("503"), Some(&1));
        assert_eq!(report.errors.get("request timed out"), Some(&1));
    }

    #[test]
    fn test_qps_counts_successes_only() {
        let outcomes = vec![
            success(10),
            success(10),
            success(10),
            success(10),
            Outcome::failure(Duration::from_millis(1), "connection failed"),
        ];
        let report = aggregate(&outcomes, Intensity::Rate(50), Duration::from_secs(2)).unwrap();
        assert_eq!(report.qps, 2.0);
    }

    #[test]
    fn test_p99_at_least_p95() {
        let outcomes: Vec<Outcome> = (1..=200).map(success).collect();
        let report = aggregate(&outcomes, Intensity::Concurrency(10), Duration::from_secs(1)).unwrap();
        assert!(report.latency_p99 >= report.latency_p95);
        assert!(report.latency_p95 >= Duration::from_millis(150));
    }

    #[test]
    fn test_zero_successes_report_zero_latency() {
        let outcomes = vec![
            Outcome::failure(Duration::from_millis(1), "connection failed: refused"),
            Outcome::failure(Duration::from_millis(1), "connection failed: refused"),
        ];
        let report = aggregate(&outcomes, Intensity::Concurrency(2), Duration::from_secs(1)).unwrap();
        assert_eq!(report.success_ratio, 0.0);
        assert_eq!(report.qps, 0.0);
        assert_eq!(report.latency_mean, Duration::ZERO);
        assert_eq!(report.latency_p95, Duration::ZERO);
        assert_eq!(report.latency_p99, Duration::ZERO);
        assert!(report.status_codes.is_empty());
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_empty_outcomes_report_zero_ratio() {
        let report = aggregate(&[], Intensity::Concurrency(1), Duration::from_secs(1)).unwrap();
        assert_eq!(report.requests, 0);
        assert_eq!(report.success_ratio, 0.0);
    }

    #[test]
    fn test_reason_normalization_merges_dotted_paths() {
        let outcomes = vec![
            Outcome::failure(Duration::from_millis(1), "io.timeout"),
            Outcome::failure(Duration::from_millis(1), "io:timeout"),
        ];
        let report = aggregate(&outcomes, Intensity::Concurrency(1), Duration::from_secs(1)).unwrap();
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors.get("io:timeout"), Some(&2));
    }

    #[test]
    fn test_mean_latency() {
        let outcomes = vec![success(10), success(20), success(30)];
        let report = aggregate(&outcomes, Intensity::Concurrency(3), Duration::from_secs(1)).unwrap();
        assert_eq!(report.latency_mean, Duration::from_millis(20));
    }
}
