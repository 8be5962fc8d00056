// SPDX-License-Identifier: Apache-2.0

//! Decision policy for pruning the configuration search space.
//!
//! Implements the diminishing-returns stopping rule: a configuration is
//! worth benchmarking while adding nodes keeps improving responsiveness by
//! more than the improvement threshold. Configurations below the high
//! availability floor are always measured - they are mandatory baseline
//! deployment sizes regardless of trend.

use serde::{Deserialize, Serialize};

use crate::aggregate::AggregatedResult;
use crate::types::HardwareConfiguration;

/// Node counts below this are always explored.
pub const HIGH_AVAILABILITY_FLOOR: u32 = 4;

/// Decision reason strings surfaced in the summary table.
pub const REASON_HA_FLOOR: &str = "high availability floor";
pub const REASON_POSITIVE_IMPACT: &str = "positive marginal impact from added nodes";
pub const REASON_DIMINISHING_RETURNS: &str = "diminishing returns from added nodes";

/// Named policy constants, injected at construction.
///
/// Defaults match the reference behavior; tunable without code changes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PolicyThresholds {
    /// Minimum responsiveness-index gain per added node step to keep exploring.
    pub improvement_threshold: f64,
    /// Aggregated error rate above this fails the quality gate.
    pub error_rate_ceiling: f64,
    /// Responsiveness spread above this fails the quality gate.
    pub spread_ceiling: f64,
}

impl Default for PolicyThresholds {
    fn default() -> Self {
        Self {
            improvement_threshold: 0.01,
            error_rate_ceiling: 0.05,
            spread_ceiling: 0.10,
        }
    }
}

/// The decision whether a configuration is worth spending benchmark
/// resources on, with the reason surfaced to the operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorationDecision {
    pub configuration: HardwareConfiguration,
    pub worth_exploring: bool,
    pub reason: String,
}

/// Pure decision function over in-memory prior results. No failure modes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionPolicy {
    thresholds: PolicyThresholds,
}

impl DecisionPolicy {
    pub fn new(thresholds: PolicyThresholds) -> Self {
        Self { thresholds }
    }

    /// Decide whether `configuration` is worth exploring given the
    /// aggregated results already produced for smaller node counts of the
    /// same instance class, ordered by increasing node count.
    ///
    /// This is a stopping rule, not a hard limit: it only recommends
    /// skipping; callers decide whether to persist the skip.
    pub fn decide(
        &self,
        configuration: &HardwareConfiguration,
        prior_same_class: &[AggregatedResult],
    ) -> ExplorationDecision {
        if configuration.node_count.value() < HIGH_AVAILABILITY_FLOOR {
            return ExplorationDecision {
                configuration: configuration.clone(),
                worth_exploring: true,
                reason: REASON_HA_FLOOR.to_string(),
            };
        }

        // Vacuously true for fewer than two priors: keep exploring until a
        // trend exists to judge.
        let all_improving = prior_same_class.windows(2).all(|pair| {
            let delta = pair[1].responsiveness_index - pair[0].responsiveness_index;
            delta > self.thresholds.improvement_threshold
        });

        if all_improving {
            ExplorationDecision {
                configuration: configuration.clone(),
                worth_exploring: true,
                reason: REASON_POSITIVE_IMPACT.to_string(),
            }
        } else {
            ExplorationDecision {
                configuration: configuration.clone(),
                worth_exploring: false,
                reason: REASON_DIMINISHING_RETURNS.to_string(),
            }
        }
    }
}
