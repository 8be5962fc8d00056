// SPDX-License-Identifier: Apache-2.0

//! End-to-end exploration tests with a scripted benchmark executor.
//!
//! These tests verify the complete flow: decision policy, run cache reuse,
//! bounded execution, aggregation gates, and the final summary.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tempfile::TempDir;

use scalebench_core::{
    ActionSample, BenchmarkExecutor, ConfigurationOutcome, ExplorationConfig,
    ExplorationScheduler, ExploreError, ExploreResult, HardwareConfiguration, InstanceClass,
    NodeCount, PolicyThresholds, RawRunResult, RunStatus,
};

/// Scripted executor: responsiveness is a function of the configuration
/// (and optionally the repeat ordinal), built from Apdex sample mixes.
struct ScriptedExecutor {
    executions: AtomicUsize,
    script: Box<dyn Fn(&HardwareConfiguration, usize) -> ExploreResult<RawRunResult> + Send + Sync>,
}

impl ScriptedExecutor {
    fn new(
        script: impl Fn(&HardwareConfiguration, usize) -> ExploreResult<RawRunResult>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            executions: AtomicUsize::new(0),
            script: Box::new(script),
        }
    }
}

#[async_trait]
impl BenchmarkExecutor for ScriptedExecutor {
    async fn execute(
        &self,
        configuration: &HardwareConfiguration,
        _workspace: &Path,
    ) -> ExploreResult<RawRunResult> {
        let ordinal = self.executions.fetch_add(1, Ordering::SeqCst);
        (self.script)(configuration, ordinal)
    }
}

/// Build a completed raw result whose responsiveness index is
/// `0.5 + satisfied / (2 * total)`: `satisfied` fast samples, the rest
/// tolerating.
fn raw_with_apdex(satisfied: usize, total: usize) -> RawRunResult {
    let mut samples = Vec::with_capacity(total);
    for i in 0..total {
        samples.push(ActionSample {
            action: "search".to_string(),
            latency_ms: if i < satisfied { 400 } else { 2_000 },
            failed: false,
        });
    }
    RawRunResult {
        status: RunStatus::Completed,
        started_at: Utc::now(),
        action_samples: samples,
        total_requests: 300,
        duration_secs: 60.0,
        failure: None,
    }
}

fn exploration_config(
    classes: &[&str],
    max_nodes: u32,
    repeats: usize,
    results_dir: &Path,
) -> ExplorationConfig {
    ExplorationConfig {
        instance_classes: classes
            .iter()
            .map(|c| InstanceClass::new(*c).unwrap())
            .collect(),
        max_node_count: NodeCount::new(max_nodes).unwrap(),
        repeats,
        worker_pool_size: 3,
        overall_deadline: Duration::from_secs(60),
        results_dir: results_dir.to_path_buf(),
        thresholds: PolicyThresholds::default(),
    }
}

#[tokio::test]
async fn improving_trend_explores_the_whole_class() {
    let dir = TempDir::new().unwrap();
    // Responsiveness climbs 0.6, 0.7, 0.8, 0.9, 0.95 with node count.
    let executor = ScriptedExecutor::new(|config, _| {
        let satisfied = match config.node_count.value() {
            1 => 4,
            2 => 8,
            3 => 12,
            4 => 16,
            _ => 18,
        };
        Ok(raw_with_apdex(satisfied, 20))
    });

    let scheduler = ExplorationScheduler::new(
        executor,
        exploration_config(&["small"], 5, 2, dir.path()),
    );
    let summary = scheduler.explore().await.unwrap();

    assert_eq!(summary.rows.len(), 5);
    assert!(!summary.has_failures());
    for row in &summary.rows {
        assert!(
            matches!(row, ConfigurationOutcome::Completed { .. }),
            "expected {} to be explored",
            row.configuration()
        );
    }

    // Two repeats per configuration, freshly numbered 1 and 2.
    let store = scheduler.store();
    for nodes in 1..=5 {
        let config = HardwareConfiguration::new(
            InstanceClass::new("small").unwrap(),
            NodeCount::new(nodes).unwrap(),
        );
        let runs = store.list_prior_runs(&config);
        assert_eq!(runs.iter().map(|r| r.value()).collect::<Vec<_>>(), [1, 2]);
    }
}

#[tokio::test]
async fn flat_trend_stops_at_the_availability_floor() {
    let dir = TempDir::new().unwrap();
    // Identical responsiveness at every node count: adding nodes buys nothing.
    let executor = ScriptedExecutor::new(|_, _| Ok(raw_with_apdex(16, 20)));

    let scheduler = ExplorationScheduler::new(
        executor,
        exploration_config(&["small"], 5, 2, dir.path()),
    );
    let summary = scheduler.explore().await.unwrap();

    let explored: Vec<u32> = summary
        .rows
        .iter()
        .filter(|r| matches!(r, ConfigurationOutcome::Completed { .. }))
        .map(|r| r.configuration().node_count.value())
        .collect();
    let skipped: Vec<u32> = summary
        .rows
        .iter()
        .filter(|r| matches!(r, ConfigurationOutcome::Skipped { .. }))
        .map(|r| r.configuration().node_count.value())
        .collect();

    // 1-3 are mandatory baseline sizes; 4 and 5 fall to diminishing returns.
    assert_eq!(explored, [1, 2, 3]);
    assert_eq!(skipped, [4, 5]);
    for row in &summary.rows {
        if let ConfigurationOutcome::Skipped { decision } = row {
            assert_eq!(decision.reason, "diminishing returns from added nodes");
        }
    }
}

#[tokio::test]
async fn second_invocation_reuses_everything() {
    let dir = TempDir::new().unwrap();

    let scheduler = ExplorationScheduler::new(
        ScriptedExecutor::new(|_, _| Ok(raw_with_apdex(16, 20))),
        exploration_config(&["small"], 3, 2, dir.path()),
    );
    let first = scheduler.explore().await.unwrap();
    assert!(!first.has_failures());

    // A brand-new scheduler over the same results directory: the run cache
    // covers every repeat, so zero fresh executions happen.
    let rerun_executor = ScriptedExecutor::new(|_, _| {
        panic!("no fresh execution expected on a fully cached rerun")
    });
    let scheduler2 = ExplorationScheduler::new(
        rerun_executor,
        exploration_config(&["small"], 3, 2, dir.path()),
    );
    let second = scheduler2.explore().await.unwrap();

    assert_eq!(second.rows.len(), 3);
    assert!(!second.has_failures());
}

#[tokio::test]
async fn failed_class_does_not_block_siblings() {
    let dir = TempDir::new().unwrap();
    let executor = ScriptedExecutor::new(|config, _| {
        if config.instance_class.as_str() == "flaky" {
            Err(ExploreError::ExecutorFailed {
                configuration: config.clone(),
                detail: "instance lease denied".to_string(),
            })
        } else {
            Ok(raw_with_apdex(16, 20))
        }
    });

    let scheduler = ExplorationScheduler::new(
        executor,
        exploration_config(&["flaky", "steady"], 2, 1, dir.path()),
    );
    let summary = scheduler.explore().await.unwrap();

    // All four configurations report a status; nothing is silently lost.
    assert_eq!(summary.rows.len(), 4);

    let by_class = |class: &str| {
        summary
            .rows
            .iter()
            .filter(|r| r.configuration().instance_class.as_str() == class)
            .collect::<Vec<_>>()
    };

    assert!(by_class("flaky").iter().all(|r| r.is_failed()));
    assert!(by_class("steady")
        .iter()
        .all(|r| matches!(r, ConfigurationOutcome::Completed { .. })));
}

#[tokio::test]
async fn disagreeing_repeats_trip_the_spread_gate_and_export_triage() {
    let dir = TempDir::new().unwrap();
    // Repeats alternate between responsiveness 0.6 and 0.9: spread 0.3.
    let executor = ScriptedExecutor::new(|_, ordinal| {
        Ok(raw_with_apdex(if ordinal % 2 == 0 { 4 } else { 16 }, 20))
    });

    let scheduler = ExplorationScheduler::new(
        executor,
        exploration_config(&["small"], 1, 2, dir.path()),
    );
    let summary = scheduler.explore().await.unwrap();

    assert_eq!(summary.rows.len(), 1);
    match &summary.rows[0] {
        ConfigurationOutcome::Failed { error, .. } => {
            assert!(error.contains("result spread too big"), "got: {error}");
        }
        other => panic!("expected a failed row, got {other:?}"),
    }

    // The raw comparison landed in the triage directory for human review.
    let triage = dir.path().join("_triage");
    let exports: Vec<_> = std::fs::read_dir(triage).unwrap().collect();
    assert!(!exports.is_empty());

    // The repeats themselves are durable: the next invocation can reuse them.
    let config = HardwareConfiguration::new(
        InstanceClass::new("small").unwrap(),
        NodeCount::new(1).unwrap(),
    );
    assert_eq!(scheduler.store().list_prior_runs(&config).len(), 2);
}

#[tokio::test]
async fn partial_history_is_topped_up_not_rerun() {
    let dir = TempDir::new().unwrap();
    let config_one = HardwareConfiguration::new(
        InstanceClass::new("small").unwrap(),
        NodeCount::new(1).unwrap(),
    );

    // First pass: one repeat only.
    let scheduler = ExplorationScheduler::new(
        ScriptedExecutor::new(|_, _| Ok(raw_with_apdex(16, 20))),
        exploration_config(&["small"], 1, 1, dir.path()),
    );
    scheduler.explore().await.unwrap();

    // Second pass wants three repeats: exactly two fresh executions, with
    // identifiers continuing past the existing history.
    let executor = ScriptedExecutor::new(|_, _| Ok(raw_with_apdex(16, 20)));
    let scheduler = ExplorationScheduler::new(
        executor,
        exploration_config(&["small"], 1, 3, dir.path()),
    );
    let scores = scheduler.ensure_repeats(&config_one, 3).await.unwrap();

    assert_eq!(scores.len(), 3);
    assert_eq!(
        scheduler
            .store()
            .list_prior_runs(&config_one)
            .iter()
            .map(|r| r.value())
            .collect::<Vec<_>>(),
        [1, 2, 3]
    );
}
