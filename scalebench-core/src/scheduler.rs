// SPDX-License-Identifier: Apache-2.0

//! Exploration scheduling across a bounded worker pool.
//!
//! Instance classes are explored in parallel, one task per class. Within a
//! class, node counts are processed strictly in increasing order because
//! the decision policy reads the aggregated results of smaller
//! configurations. Each fresh benchmark repeat is its own asynchronous unit
//! of work gated by a shared semaphore - the ceiling on concurrently leased
//! external infrastructure, independent of how many classes are explored at
//! once.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::aggregate::{AggregatedResult, Aggregator};
use crate::config::ExplorationConfig;
use crate::error::{ExploreError, ExploreResult};
use crate::policy::DecisionPolicy;
use crate::report::{ConfigurationOutcome, DiagnosticExporter, ExplorationSummary};
use crate::score::{RawRunResult, ResultScorer, RunScore};
use crate::space;
use crate::store::RunStore;
use crate::types::{HardwareConfiguration, InstanceClass, NodeCount, RunId};

/// External collaborator that runs one benchmark repeat against a
/// provisioned configuration and produces raw per-action metrics.
///
/// `workspace` is the repeat's run directory; the executor may drop logs
/// and artifacts there. Internal per-repeat timeouts are the executor's own
/// responsibility.
#[async_trait]
pub trait BenchmarkExecutor: Send + Sync {
    async fn execute(
        &self,
        configuration: &HardwareConfiguration,
        workspace: &Path,
    ) -> ExploreResult<RawRunResult>;
}

/// Drives the whole exploration run: decide, reuse, execute, aggregate.
pub struct ExplorationScheduler<E> {
    executor: Arc<E>,
    store: RunStore,
    scorer: ResultScorer,
    policy: DecisionPolicy,
    aggregator: Arc<Aggregator>,
    pool: Arc<Semaphore>,
    config: ExplorationConfig,
}

impl<E> Clone for ExplorationScheduler<E> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
            store: self.store.clone(),
            scorer: self.scorer,
            policy: self.policy,
            aggregator: Arc::clone(&self.aggregator),
            pool: Arc::clone(&self.pool),
            config: self.config.clone(),
        }
    }
}

impl<E> ExplorationScheduler<E>
where
    E: BenchmarkExecutor + 'static,
{
    pub fn new(executor: E, config: ExplorationConfig) -> Self {
        let store = RunStore::new(&config.results_dir);
        let exporter = DiagnosticExporter::new(config.results_dir.join("_triage"));
        Self {
            executor: Arc::new(executor),
            store,
            scorer: ResultScorer::new(),
            policy: DecisionPolicy::new(config.thresholds),
            aggregator: Arc::new(Aggregator::new(config.thresholds, exporter)),
            pool: Arc::new(Semaphore::new(config.worker_pool_size)),
            config,
        }
    }

    pub fn store(&self) -> &RunStore {
        &self.store
    }

    /// Explore the full configuration space and collect one outcome per
    /// configuration.
    ///
    /// Errors local to one configuration resolve as `Failed` rows; only the
    /// overall deadline aborts the run as a whole, cancelling whatever work
    /// is still in flight.
    pub async fn explore(&self) -> ExploreResult<ExplorationSummary> {
        let outcomes: Arc<DashMap<HardwareConfiguration, ConfigurationOutcome>> =
            Arc::new(DashMap::new());

        let mut tasks: Vec<JoinHandle<ExploreResult<()>>> = self
            .config
            .instance_classes
            .iter()
            .map(|class| {
                let scheduler = self.clone();
                let outcomes = Arc::clone(&outcomes);
                let class = class.clone();
                let max_nodes = self.config.max_node_count;
                tokio::spawn(
                    async move { scheduler.explore_class(class, max_nodes, outcomes).await },
                )
            })
            .collect();

        let joined =
            tokio::time::timeout(self.config.overall_deadline, join_all(tasks.iter_mut())).await;

        let results = match joined {
            Ok(results) => results,
            Err(_) => {
                // Cancel in-flight class tasks so no benchmark work keeps
                // running past the deadline the caller set.
                for task in &tasks {
                    task.abort();
                }
                return Err(ExploreError::DeadlineExceeded {
                    secs: self.config.overall_deadline.as_secs(),
                });
            }
        };

        for result in results {
            result.map_err(|err| ExploreError::TaskJoin {
                detail: err.to_string(),
            })??;
        }

        // Presentation order: caller-supplied class order, then node count.
        let mut rows = Vec::new();
        for configuration in
            space::enumerate(&self.config.instance_classes, self.config.max_node_count)?
        {
            if let Some((_, outcome)) = outcomes.remove(&configuration) {
                rows.push(outcome);
            }
        }
        Ok(ExplorationSummary::new(rows))
    }

    /// Sequential walk up the node counts of one instance class.
    ///
    /// `priors` only ever contains successfully aggregated results: a
    /// failed configuration is reported but never feeds the trend the
    /// policy judges.
    async fn explore_class(
        &self,
        class: InstanceClass,
        max_nodes: NodeCount,
        outcomes: Arc<DashMap<HardwareConfiguration, ConfigurationOutcome>>,
    ) -> ExploreResult<()> {
        let mut priors: Vec<AggregatedResult> = Vec::new();

        for nodes in 1..=max_nodes.value() {
            let configuration = HardwareConfiguration::new(class.clone(), NodeCount::new(nodes)?);
            let decision = self.policy.decide(&configuration, &priors);

            if !decision.worth_exploring {
                tracing::info!(
                    configuration = %configuration,
                    reason = %decision.reason,
                    "skipping configuration"
                );
                outcomes.insert(
                    configuration,
                    ConfigurationOutcome::Skipped { decision },
                );
                continue;
            }

            tracing::info!(
                configuration = %configuration,
                reason = %decision.reason,
                "exploring configuration"
            );

            match self.resolve(&configuration).await {
                Ok(aggregated) => {
                    priors.push(aggregated.clone());
                    outcomes.insert(
                        configuration,
                        ConfigurationOutcome::Completed {
                            decision,
                            aggregated,
                        },
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        configuration = %configuration,
                        error = %err,
                        "configuration failed"
                    );
                    outcomes.insert(
                        configuration,
                        ConfigurationOutcome::Failed {
                            decision,
                            error: err.to_string(),
                        },
                    );
                }
            }
        }

        Ok(())
    }

    async fn resolve(
        &self,
        configuration: &HardwareConfiguration,
    ) -> ExploreResult<AggregatedResult> {
        let scores = self
            .ensure_repeats(configuration, self.config.repeats)
            .await?;
        self.aggregator.aggregate(configuration, &scores)
    }

    /// Ensure `repeat_count` repeat scores exist for a configuration,
    /// reusing persisted history and running only the deficit.
    ///
    /// Returns the reused set as-is when it already covers the repeat
    /// count - extra history is never discarded. Any fresh execution
    /// failure fails the whole configuration; partial repeat sets are never
    /// presented as complete.
    pub async fn ensure_repeats(
        &self,
        configuration: &HardwareConfiguration,
        repeat_count: usize,
    ) -> ExploreResult<Vec<RunScore>> {
        let mut scores: Vec<RunScore> = self
            .store
            .list_prior_runs(configuration)
            .into_iter()
            .filter_map(|id| self.store.reuse(configuration, id, &self.scorer))
            .collect();

        if scores.len() >= repeat_count {
            tracing::debug!(
                configuration = %configuration,
                reused = scores.len(),
                "repeat deficit covered from persisted runs"
            );
            return Ok(scores);
        }

        let deficit = repeat_count - scores.len();
        tracing::info!(
            configuration = %configuration,
            reused = scores.len(),
            deficit,
            "running fresh benchmark repeats"
        );

        // Fresh identifiers continue monotonically past everything on disk.
        let mut run_id = self.store.next_run_id(configuration);
        let mut pending = Vec::with_capacity(deficit);

        for _ in 0..deficit {
            let id = run_id;
            run_id = run_id.next();
            pending.push(self.run_fresh(configuration, id));
        }

        // Wait for every repeat before surfacing the first failure, so no
        // repeat is abandoned mid-write. The repeats are joined in-task
        // rather than spawned: cancelling the class task cancels them too.
        let mut first_err: Option<ExploreError> = None;
        for result in join_all(pending).await {
            match result {
                Ok(score) => scores.push(score),
                Err(err) => {
                    if first_err.is_none() {
                        first_err = Some(err);
                    }
                }
            }
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(scores),
        }
    }

    /// One fresh benchmark repeat: lease a worker, execute, persist, score.
    async fn run_fresh(
        &self,
        configuration: &HardwareConfiguration,
        id: RunId,
    ) -> ExploreResult<RunScore> {
        let _permit = self
            .pool
            .acquire()
            .await
            .map_err(|err| ExploreError::TaskJoin {
                detail: format!("worker pool closed: {err}"),
            })?;

        let workspace = self.store.prepare_run_dir(configuration, id)?;
        let raw = self.executor.execute(configuration, &workspace).await?;
        // Durable before scoring: a crash past this point leaves
        // recoverable history for the next invocation.
        let handle = self.store.persist(configuration, id, &raw)?;
        self.scorer.score(configuration, &raw, handle)
    }
}
