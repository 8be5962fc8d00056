// SPDX-License-Identifier: Apache-2.0

//! Aggregation of repeat scores and the quality gates.
//!
//! Repeat measurements for one configuration are combined into mean and
//! spread statistics. The gates reject a result whose error rate or
//! responsiveness spread exceeds tolerance; the offending raw scores are
//! exported for human triage before the failure surfaces.

use serde::{Deserialize, Serialize};

use crate::error::{ExploreError, ExploreResult};
use crate::policy::PolicyThresholds;
use crate::report::DiagnosticExporter;
use crate::score::RunScore;
use crate::types::HardwareConfiguration;

/// Gate reason strings surfaced in `QualityGateViolation`.
pub const GATE_ERROR_RATE: &str = "error rate too high";
pub const GATE_SPREAD: &str = "result spread too big";

/// Statistically validated summary of all repeats for one configuration.
///
/// Spreads are `max - min` across the repeat set: 0 when only one repeat
/// exists, since there is nothing to compare. `repeats` is never empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedResult {
    pub configuration: HardwareConfiguration,
    pub responsiveness_index: f64,
    pub responsiveness_spread: f64,
    pub throughput: f64,
    pub throughput_spread: f64,
    pub error_rate: f64,
    pub error_rate_spread: f64,
    pub repeats: Vec<RunScore>,
}

impl AggregatedResult {
    #[cfg(test)]
    pub fn for_tests(configuration: HardwareConfiguration, responsiveness: f64) -> Self {
        use crate::score::RunHandle;

        Self {
            configuration: configuration.clone(),
            responsiveness_index: responsiveness,
            responsiveness_spread: 0.0,
            throughput: 100.0,
            throughput_spread: 0.0,
            error_rate: 0.0,
            error_rate_spread: 0.0,
            repeats: vec![RunScore {
                configuration,
                responsiveness_index: responsiveness,
                throughput: 100.0,
                error_rate: 0.0,
                raw: RunHandle::new("/dev/null"),
            }],
        }
    }
}

/// Combines repeat scores and enforces the quality gates.
pub struct Aggregator {
    thresholds: PolicyThresholds,
    exporter: DiagnosticExporter,
}

impl Aggregator {
    pub fn new(thresholds: PolicyThresholds, exporter: DiagnosticExporter) -> Self {
        Self {
            thresholds,
            exporter,
        }
    }

    /// Aggregate repeat scores for one configuration.
    ///
    /// Both gates are checked after the aggregate is produced, so the
    /// offending data is available for diagnostic export before the failure
    /// surfaces. Comparisons are strictly greater-than: boundary values
    /// pass.
    pub fn aggregate(
        &self,
        configuration: &HardwareConfiguration,
        scores: &[RunScore],
    ) -> ExploreResult<AggregatedResult> {
        if scores.is_empty() {
            return Err(ExploreError::EmptyAggregate {
                configuration: configuration.clone(),
            });
        }

        let responsiveness: Vec<f64> = scores.iter().map(|s| s.responsiveness_index).collect();
        let throughput: Vec<f64> = scores.iter().map(|s| s.throughput).collect();
        let error_rate: Vec<f64> = scores.iter().map(|s| s.error_rate).collect();

        let aggregated = AggregatedResult {
            configuration: configuration.clone(),
            responsiveness_index: mean(&responsiveness),
            responsiveness_spread: spread(&responsiveness),
            throughput: mean(&throughput),
            throughput_spread: spread(&throughput),
            error_rate: mean(&error_rate),
            error_rate_spread: spread(&error_rate),
            repeats: scores.to_vec(),
        };

        if aggregated.error_rate > self.thresholds.error_rate_ceiling {
            self.export_for_triage("error-rate", configuration, scores);
            return Err(ExploreError::QualityGateViolation {
                configuration: configuration.clone(),
                reason: GATE_ERROR_RATE.to_string(),
            });
        }

        if aggregated.responsiveness_spread > self.thresholds.spread_ceiling {
            self.export_for_triage("spread", configuration, scores);
            return Err(ExploreError::QualityGateViolation {
                configuration: configuration.clone(),
                reason: GATE_SPREAD.to_string(),
            });
        }

        Ok(aggregated)
    }

    /// Fire-and-forget: export failures are logged, never allowed to mask
    /// the quality-gate error.
    fn export_for_triage(
        &self,
        label: &str,
        configuration: &HardwareConfiguration,
        scores: &[RunScore],
    ) {
        if let Err(err) = self.exporter.export_raw(label, scores, configuration) {
            tracing::warn!(
                configuration = %configuration,
                error = %err,
                "diagnostic export failed"
            );
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// `max - min` across the repeat set; 0 for a single repeat.
fn spread(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let max = values.iter().cloned().fold(f64::MIN, f64::max);
    let min = values.iter().cloned().fold(f64::MAX, f64::min);
    max - min
}
