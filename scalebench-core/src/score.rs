// SPDX-License-Identifier: Apache-2.0

//! Raw run records and the result scorer.
//!
//! A benchmark repeat produces a [`RawRunResult`] - per-action latency
//! samples plus access-log request counts. The scorer reduces one raw
//! result into a scalar [`RunScore`]: responsiveness index, throughput,
//! and error rate.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ExploreError, ExploreResult};
use crate::types::HardwareConfiguration;

/// Action types included in scoring. Raw results may contain extra
/// bookkeeping actions (warmup navigation, login churn from the user
/// simulator); only these count towards the responsiveness index and
/// error rate.
pub const BENCHMARKED_ACTIONS: &[&str] = &[
    "view_issue",
    "search",
    "create_issue",
    "edit_issue",
    "browse_board",
    "login",
];

/// Latency at or below this counts as fully satisfied (Apdex T).
const SATISFIED_THRESHOLD_MS: u64 = 1_000;
/// Latency at or below this counts as tolerating (Apdex 4T); above is unsatisfied.
const TOLERATING_THRESHOLD_MS: u64 = 4_000;

/// Completion status of a persisted benchmark repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// The repeat ran the full workload and produced complete metrics.
    Completed,
    /// The workload or the system under test failed partway through.
    Failed,
    /// The repeat was cancelled before producing usable metrics.
    Aborted,
}

impl RunStatus {
    /// Whether a persisted repeat with this status may be reused instead of
    /// re-running the benchmark. Only fully completed repeats qualify;
    /// partial history is kept on disk but never scored.
    pub fn is_reusable(&self) -> bool {
        matches!(self, RunStatus::Completed)
    }
}

/// One timed user action from a benchmark repeat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionSample {
    /// Action type name (e.g. `search`).
    pub action: String,
    /// Observed latency in milliseconds.
    pub latency_ms: u64,
    /// Whether the action failed (error response or client-side failure).
    pub failed: bool,
}

/// Raw result of one benchmark repeat, as persisted to the run directory.
///
/// Ownership of this data belongs to durable storage; in-memory scores hold
/// only an opaque handle back to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRunResult {
    /// Completion status of the repeat.
    pub status: RunStatus,
    /// When the repeat started.
    pub started_at: DateTime<Utc>,
    /// Per-action latency samples.
    pub action_samples: Vec<ActionSample>,
    /// Total request count derived from the access log.
    pub total_requests: u64,
    /// Wall-clock duration of the measured window, in seconds.
    pub duration_secs: f64,
    /// Execution failure marker, set by the benchmark executor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

/// Opaque handle to the persisted raw data behind a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunHandle(PathBuf);

impl RunHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// One repeat's outcome reduced to a scalar quality vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunScore {
    pub configuration: HardwareConfiguration,
    /// Satisfaction-weighted latency score in [0, 1]; near 1.0 is fast.
    pub responsiveness_index: f64,
    /// Requests per second over the measured window.
    pub throughput: f64,
    /// Failed fraction of benchmarked actions, in [0, 1].
    pub error_rate: f64,
    /// Where the raw metrics behind this score live.
    pub raw: RunHandle,
}

/// Reduces raw per-action metrics into a [`RunScore`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultScorer;

impl ResultScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score one raw run result.
    ///
    /// Fails with `RunFailed` when the raw result carries an execution
    /// failure marker - a failed repeat must never be silently scored as
    /// zero.
    pub fn score(
        &self,
        configuration: &HardwareConfiguration,
        raw: &RawRunResult,
        handle: RunHandle,
    ) -> ExploreResult<RunScore> {
        if raw.status != RunStatus::Completed {
            return Err(ExploreError::RunFailed {
                configuration: configuration.clone(),
                detail: format!("run did not complete (status {:?})", raw.status),
            });
        }
        if let Some(failure) = &raw.failure {
            return Err(ExploreError::RunFailed {
                configuration: configuration.clone(),
                detail: failure.clone(),
            });
        }

        let benchmarked: Vec<&ActionSample> = raw
            .action_samples
            .iter()
            .filter(|s| BENCHMARKED_ACTIONS.contains(&s.action.as_str()))
            .collect();

        Ok(RunScore {
            configuration: configuration.clone(),
            responsiveness_index: responsiveness_index(&benchmarked),
            throughput: throughput(raw.total_requests, raw.duration_secs),
            error_rate: error_rate(&benchmarked),
            raw: handle,
        })
    }
}

/// Apdex-style satisfaction score over the filtered samples.
/// Fast actions count fully, tolerable ones half, slow or failed ones not
/// at all. Empty sample sets score 0.
fn responsiveness_index(samples: &[&ActionSample]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let weighted: f64 = samples
        .iter()
        .map(|s| {
            if s.failed || s.latency_ms > TOLERATING_THRESHOLD_MS {
                0.0
            } else if s.latency_ms <= SATISFIED_THRESHOLD_MS {
                1.0
            } else {
                0.5
            }
        })
        .sum();
    weighted / samples.len() as f64
}

/// Access-log request count scaled to a one-second unit.
fn throughput(total_requests: u64, duration_secs: f64) -> f64 {
    if duration_secs <= 0.0 {
        return 0.0;
    }
    total_requests as f64 / duration_secs
}

/// Failed-action fraction over the filtered samples.
fn error_rate(samples: &[&ActionSample]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let failed = samples.iter().filter(|s| s.failed).count();
    failed as f64 / samples.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InstanceClass, NodeCount};

    fn config() -> HardwareConfiguration {
        HardwareConfiguration::new(
            InstanceClass::new("small").unwrap(),
            NodeCount::new(2).unwrap(),
        )
    }

    fn sample(action: &str, latency_ms: u64, failed: bool) -> ActionSample {
        ActionSample {
            action: action.to_string(),
            latency_ms,
            failed,
        }
    }

    fn raw(samples: Vec<ActionSample>) -> RawRunResult {
        RawRunResult {
            status: RunStatus::Completed,
            started_at: Utc::now(),
            action_samples: samples,
            total_requests: 600,
            duration_secs: 60.0,
            failure: None,
        }
    }

    #[test]
    fn test_apdex_weighting() {
        let scorer = ResultScorer::new();
        let score = scorer
            .score(
                &config(),
                &raw(vec![
                    sample("search", 500, false),   // satisfied -> 1.0
                    sample("search", 2_000, false), // tolerating -> 0.5
                    sample("search", 9_000, false), // unsatisfied -> 0.0
                    sample("search", 500, true),    // failed -> 0.0
                ]),
                RunHandle::new("/tmp/run/1"),
            )
            .unwrap();
        assert!((score.responsiveness_index - 0.375).abs() < 1e-9);
        assert!((score.error_rate - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_whitelist_filtering() {
        let scorer = ResultScorer::new();
        let score = scorer
            .score(
                &config(),
                &raw(vec![
                    sample("search", 500, false),
                    // Not in the benchmarked set - must not dilute the index.
                    sample("warmup_navigation", 20_000, true),
                ]),
                RunHandle::new("/tmp/run/1"),
            )
            .unwrap();
        assert!((score.responsiveness_index - 1.0).abs() < 1e-9);
        assert!((score.error_rate - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_throughput_per_second() {
        let scorer = ResultScorer::new();
        let score = scorer
            .score(
                &config(),
                &raw(vec![sample("login", 100, false)]),
                RunHandle::new("/tmp/run/1"),
            )
            .unwrap();
        assert!((score.throughput - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_failed_run_propagates() {
        let scorer = ResultScorer::new();
        let mut r = raw(vec![sample("search", 500, false)]);
        r.status = RunStatus::Failed;
        let err = scorer
            .score(&config(), &r, RunHandle::new("/tmp/run/1"))
            .unwrap_err();
        assert!(matches!(err, ExploreError::RunFailed { .. }));
    }

    #[test]
    fn test_failure_marker_propagates() {
        let scorer = ResultScorer::new();
        let mut r = raw(vec![sample("search", 500, false)]);
        r.failure = Some("virtual users lost connection".to_string());
        let err = scorer
            .score(&config(), &r, RunHandle::new("/tmp/run/1"))
            .unwrap_err();
        assert!(matches!(err, ExploreError::RunFailed { .. }));
    }

    #[test]
    fn test_reusable_statuses() {
        assert!(RunStatus::Completed.is_reusable());
        assert!(!RunStatus::Failed.is_reusable());
        assert!(!RunStatus::Aborted.is_reusable());
    }
}
