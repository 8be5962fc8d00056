// SPDX-License-Identifier: Apache-2.0

//! YAML configuration parser with strict schema validation.
//!
//! Validates the exploration configuration at startup. Any invalid field
//! results in a ValidationError that prevents the run from starting.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ExploreError, ExploreResult, ValidationError};
use crate::policy::PolicyThresholds;
use crate::types::{InstanceClass, NodeCount};

/// Raw configuration as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
struct RawExplorationConfig {
    instance_classes: Vec<String>,
    max_node_count: u32,
    #[serde(default = "default_repeats")]
    repeats: usize,
    #[serde(default = "default_worker_pool_size")]
    worker_pool_size: usize,
    #[serde(default = "default_overall_deadline_secs")]
    overall_deadline_secs: u64,
    #[serde(default = "default_results_dir")]
    results_dir: String,
    #[serde(default)]
    thresholds: RawThresholds,
}

/// Optional threshold overrides; defaults preserve reference behavior.
#[derive(Debug, Deserialize)]
struct RawThresholds {
    #[serde(default = "default_improvement_threshold")]
    improvement_threshold: f64,
    #[serde(default = "default_error_rate_ceiling")]
    error_rate_ceiling: f64,
    #[serde(default = "default_spread_ceiling")]
    spread_ceiling: f64,
}

fn default_repeats() -> usize {
    3
}

fn default_worker_pool_size() -> usize {
    4
}

fn default_overall_deadline_secs() -> u64 {
    3600 // one hour ceiling on total wait for submitted work
}

fn default_results_dir() -> String {
    "./scalebench-results".to_string()
}

fn default_improvement_threshold() -> f64 {
    0.01
}

fn default_error_rate_ceiling() -> f64 {
    0.05
}

fn default_spread_ceiling() -> f64 {
    0.10
}

impl Default for RawThresholds {
    fn default() -> Self {
        Self {
            improvement_threshold: default_improvement_threshold(),
            error_rate_ceiling: default_error_rate_ceiling(),
            spread_ceiling: default_spread_ceiling(),
        }
    }
}

/// Validated exploration configuration.
#[derive(Debug, Clone)]
pub struct ExplorationConfig {
    pub instance_classes: Vec<InstanceClass>,
    pub max_node_count: NodeCount,
    pub repeats: usize,
    pub worker_pool_size: usize,
    pub overall_deadline: Duration,
    pub results_dir: PathBuf,
    pub thresholds: PolicyThresholds,
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> ExploreResult<ExplorationConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ExploreError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|source| ExploreError::Io {
            context: "reading configuration file",
            source,
        })?;

        Self::load_str(&content)
    }

    /// Load and validate configuration from a YAML string.
    pub fn load_str(content: &str) -> ExploreResult<ExplorationConfig> {
        let raw: RawExplorationConfig =
            serde_yaml::from_str(content).map_err(|err| ExploreError::ConfigParse {
                message: err.to_string(),
            })?;

        Self::validate(raw)
    }

    fn validate(raw: RawExplorationConfig) -> ExploreResult<ExplorationConfig> {
        if raw.instance_classes.is_empty() {
            return Err(ValidationError::MissingRequiredField {
                field: "instance_classes",
                context: "exploration config".to_string(),
            }
            .into());
        }

        let instance_classes = raw
            .instance_classes
            .into_iter()
            .map(InstanceClass::new)
            .collect::<Result<Vec<_>, _>>()?;

        let max_node_count = NodeCount::new(raw.max_node_count)?;

        if raw.repeats == 0 {
            return Err(ValidationError::InvalidFieldValue {
                field: "repeats",
                value: raw.repeats.to_string(),
                reason: "Repeat count must be at least 1".to_string(),
            }
            .into());
        }

        if raw.worker_pool_size == 0 {
            return Err(ValidationError::InvalidFieldValue {
                field: "worker_pool_size",
                value: raw.worker_pool_size.to_string(),
                reason: "Worker pool must have at least one slot".to_string(),
            }
            .into());
        }

        Ok(ExplorationConfig {
            instance_classes,
            max_node_count,
            repeats: raw.repeats,
            worker_pool_size: raw.worker_pool_size,
            overall_deadline: Duration::from_secs(raw.overall_deadline_secs),
            results_dir: PathBuf::from(raw.results_dir),
            thresholds: PolicyThresholds {
                improvement_threshold: raw.thresholds.improvement_threshold,
                error_rate_ceiling: raw.thresholds.error_rate_ceiling,
                spread_ceiling: raw.thresholds.spread_ceiling,
            },
        })
    }
}
