//! Scalebench Core Library
//!
//! Exploration controller for cluster benchmark configuration search.
//! Provides the configuration space enumerator, the diminishing-returns
//! decision policy, the disk-backed run cache, the bounded-concurrency
//! exploration scheduler, and the aggregation quality gates.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod policy;
pub mod report;
pub mod scheduler;
pub mod score;
pub mod space;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use aggregate::{AggregatedResult, Aggregator};
pub use config::{ConfigLoader, ExplorationConfig};
pub use error::{ExploreError, ExploreResult, ValidationError};
pub use policy::{DecisionPolicy, ExplorationDecision, PolicyThresholds};
pub use report::{ConfigurationOutcome, DiagnosticExporter, ExplorationSummary};
pub use scheduler::{BenchmarkExecutor, ExplorationScheduler};
pub use score::{ActionSample, RawRunResult, ResultScorer, RunHandle, RunScore, RunStatus};
pub use store::RunStore;
pub use types::{HardwareConfiguration, InstanceClass, NodeCount, RunId};
