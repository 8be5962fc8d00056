// SPDX-License-Identifier: Apache-2.0

//! Summary assembly and diagnostic export.
//!
//! The summary holds one row per configuration - explored, skipped, or
//! failed - ordered by caller-supplied instance-class order, then node
//! count. The diagnostic exporter writes pre-aggregation raw scores to a
//! triage directory when a quality gate trips.

use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use chrono::Utc;

use crate::aggregate::AggregatedResult;
use crate::error::{ExploreError, ExploreResult};
use crate::policy::ExplorationDecision;
use crate::score::RunScore;
use crate::types::HardwareConfiguration;

/// Terminal state of one configuration within an exploration run.
#[derive(Debug, Clone)]
pub enum ConfigurationOutcome {
    /// The decision policy recommended skipping; nothing was executed.
    Skipped { decision: ExplorationDecision },
    /// Repeats were ensured and passed the quality gates.
    Completed {
        decision: ExplorationDecision,
        aggregated: AggregatedResult,
    },
    /// A repeat execution failed or a quality gate tripped.
    Failed {
        decision: ExplorationDecision,
        error: String,
    },
}

impl ConfigurationOutcome {
    pub fn configuration(&self) -> &HardwareConfiguration {
        match self {
            ConfigurationOutcome::Skipped { decision }
            | ConfigurationOutcome::Completed { decision, .. }
            | ConfigurationOutcome::Failed { decision, .. } => &decision.configuration,
        }
    }

    pub fn decision(&self) -> &ExplorationDecision {
        match self {
            ConfigurationOutcome::Skipped { decision }
            | ConfigurationOutcome::Completed { decision, .. }
            | ConfigurationOutcome::Failed { decision, .. } => decision,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ConfigurationOutcome::Failed { .. })
    }
}

/// The collected result of a whole exploration run.
#[derive(Debug, Clone)]
pub struct ExplorationSummary {
    /// One row per configuration, in presentation order.
    pub rows: Vec<ConfigurationOutcome>,
}

impl ExplorationSummary {
    pub fn new(rows: Vec<ConfigurationOutcome>) -> Self {
        Self { rows }
    }

    /// Whether any configuration ended in a failed state.
    pub fn has_failures(&self) -> bool {
        self.rows.iter().any(|r| r.is_failed())
    }

    /// Render the summary as a fixed-width table, one row per
    /// configuration. Numeric columns are blank when the configuration was
    /// not explored; failed rows carry the error text instead.
    pub fn render_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<14} {:>5} {:<8} {:<42} {:>18} {:>18} {:>18}",
            "class", "nodes", "explore", "reason", "responsiveness", "throughput", "error rate"
        );
        let _ = writeln!(out, "{}", "-".repeat(128));

        for row in &self.rows {
            let decision = row.decision();
            let config = &decision.configuration;
            let (responsiveness, throughput, error_rate, note) = match row {
                ConfigurationOutcome::Completed { aggregated, .. } => (
                    format!(
                        "{:.3} (±{:.3})",
                        aggregated.responsiveness_index, aggregated.responsiveness_spread
                    ),
                    format!(
                        "{:.1} (±{:.1})",
                        aggregated.throughput, aggregated.throughput_spread
                    ),
                    format!(
                        "{:.3} (±{:.3})",
                        aggregated.error_rate, aggregated.error_rate_spread
                    ),
                    String::new(),
                ),
                ConfigurationOutcome::Skipped { .. } => {
                    (String::new(), String::new(), String::new(), String::new())
                }
                ConfigurationOutcome::Failed { error, .. } => (
                    String::new(),
                    String::new(),
                    String::new(),
                    format!("  FAILED: {error}"),
                ),
            };

            let _ = writeln!(
                out,
                "{:<14} {:>5} {:<8} {:<42} {:>18} {:>18} {:>18}{}",
                config.instance_class,
                config.node_count,
                if decision.worth_exploring { "yes" } else { "no" },
                decision.reason,
                responsiveness,
                throughput,
                error_rate,
                note
            );
        }

        out
    }
}

/// Writes pre-aggregation raw data for human triage when a quality gate
/// trips. Callers treat failures here as log-and-continue.
#[derive(Debug, Clone)]
pub struct DiagnosticExporter {
    triage_dir: PathBuf,
}

impl DiagnosticExporter {
    pub fn new(triage_dir: impl Into<PathBuf>) -> Self {
        Self {
            triage_dir: triage_dir.into(),
        }
    }

    /// Write the raw per-repeat scores for `configuration` to a timestamped
    /// JSON file in the triage directory.
    pub fn export_raw(
        &self,
        label: &str,
        scores: &[RunScore],
        configuration: &HardwareConfiguration,
    ) -> ExploreResult<PathBuf> {
        fs::create_dir_all(&self.triage_dir).map_err(|source| ExploreError::Io {
            context: "creating triage directory",
            source,
        })?;

        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%SZ");
        let filename = format!("{}_{}_{}.json", label, configuration.dir_key(), timestamp);
        let filepath = self.triage_dir.join(filename);

        let file = File::create(&filepath).map_err(|source| ExploreError::Io {
            context: "creating triage export file",
            source,
        })?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, scores).map_err(|err| ExploreError::Io {
            context: "serializing triage export",
            source: std::io::Error::other(err),
        })?;

        tracing::info!(
            configuration = %configuration,
            path = %filepath.display(),
            "exported raw scores for triage"
        );
        Ok(filepath)
    }
}
