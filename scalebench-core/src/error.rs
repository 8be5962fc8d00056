//! Custom error types for Scalebench.
//!
//! This module defines explicit enum error types as per coding guidelines.
//! No `Box<dyn Error>`, no `anyhow::Result` - all errors are strongly typed.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::HardwareConfiguration;

/// Top-level error type for the exploration controller.
/// All errors are explicit variants - no catch-all or generic handling.
#[derive(Debug, Error)]
pub enum ExploreError {
    // =========================================================================
    // Configuration Errors - Fail-Fast on Invalid Config
    // =========================================================================
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    // =========================================================================
    // Benchmark Execution Errors - Propagated Per Configuration
    // =========================================================================
    #[error("Benchmark run failed for {configuration}: {detail}")]
    RunFailed {
        configuration: HardwareConfiguration,
        detail: String,
    },

    #[error("Benchmark executor failed for {configuration}: {detail}")]
    ExecutorFailed {
        configuration: HardwareConfiguration,
        detail: String,
    },

    // =========================================================================
    // Aggregation Errors - Quality Gates
    // =========================================================================
    #[error("Quality gate violated for {configuration}: {reason}")]
    QualityGateViolation {
        configuration: HardwareConfiguration,
        reason: String,
    },

    #[error("Cannot aggregate an empty repeat set for {configuration}")]
    EmptyAggregate {
        configuration: HardwareConfiguration,
    },

    // =========================================================================
    // Scheduling Errors - Fatal for the Whole Run
    // =========================================================================
    #[error("Exploration deadline exceeded after {secs}s")]
    DeadlineExceeded { secs: u64 },

    #[error("Worker task failed: {detail}")]
    TaskJoin { detail: String },

    // =========================================================================
    // System Errors
    // =========================================================================
    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Validation errors cause immediate rejection at load time.
/// Used when configuration or identifiers are invalid and the exploration
/// cannot safely start.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {field} in {context}")]
    MissingRequiredField {
        field: &'static str,
        context: String,
    },

    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },
}

/// Result type alias using ExploreError.
pub type ExploreResult<T> = Result<T, ExploreError>;
