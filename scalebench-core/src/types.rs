// SPDX-License-Identifier: Apache-2.0

//! Newtype wrappers for validated inputs.
//!
//! Following the "Newtype" pattern in Rust to ensure valid state by construction.
//! All types validate their invariants at creation time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Validated instance class identifier (e.g. `c5.large`).
/// Must be non-empty, max 64 chars, alphanumeric plus `.`, `-`, `_`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InstanceClass(String);

impl InstanceClass {
    /// Create a new InstanceClass with validation.
    pub fn new(class: impl Into<String>) -> Result<Self, ValidationError> {
        let class = class.into();

        if class.is_empty() {
            return Err(ValidationError::InvalidFieldValue {
                field: "instance_class",
                value: class,
                reason: "Instance class cannot be empty".to_string(),
            });
        }

        if class.len() > 64 {
            return Err(ValidationError::InvalidFieldValue {
                field: "instance_class",
                value: class.clone(),
                reason: format!("Instance class too long: {} chars (max 64)", class.len()),
            });
        }

        if !class
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == '_')
        {
            return Err(ValidationError::InvalidFieldValue {
                field: "instance_class",
                value: class,
                reason: "Instance class must contain only alphanumeric characters, dots, hyphens, and underscores".to_string(),
            });
        }

        Ok(Self(class))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for InstanceClass {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<InstanceClass> for String {
    fn from(class: InstanceClass) -> Self {
        class.0
    }
}

/// Validated cluster node count.
/// Must be at least 1 (a cluster has at least one node).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct NodeCount(u32);

impl NodeCount {
    /// Create a new NodeCount with validation.
    pub fn new(count: u32) -> Result<Self, ValidationError> {
        if count == 0 {
            return Err(ValidationError::InvalidFieldValue {
                field: "node_count",
                value: count.to_string(),
                reason: "Node count must be at least 1".to_string(),
            });
        }
        Ok(Self(count))
    }

    /// Get the inner count value.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for NodeCount {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NodeCount> for u32 {
    fn from(count: NodeCount) -> Self {
        count.0
    }
}

/// Identifier of one persisted benchmark repeat.
/// Run identifiers are the numeric subdirectory names under a configuration's
/// result directory, starting at 1 and strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(u32);

impl RunId {
    /// The first run identifier for a configuration with no history.
    pub const FIRST: RunId = RunId(1);

    /// Create a RunId from a raw value. Returns None for 0, which is never
    /// a valid on-disk run directory name.
    pub fn new(id: u32) -> Option<Self> {
        if id == 0 {
            None
        } else {
            Some(Self(id))
        }
    }

    /// The identifier following this one.
    pub fn next(&self) -> RunId {
        RunId(self.0 + 1)
    }

    /// Get the inner numeric value.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A hardware configuration under benchmark consideration:
/// an instance class paired with a cluster node count.
///
/// Immutable map key; equality and hash are by value. Created once by the
/// configuration space enumerator per exploration run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HardwareConfiguration {
    pub instance_class: InstanceClass,
    pub node_count: NodeCount,
}

impl HardwareConfiguration {
    pub fn new(instance_class: InstanceClass, node_count: NodeCount) -> Self {
        Self {
            instance_class,
            node_count,
        }
    }

    /// Deterministic on-disk directory key for this configuration.
    pub fn dir_key(&self) -> String {
        format!("{}_{}", self.instance_class, self.node_count)
    }
}

impl fmt::Display for HardwareConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.instance_class, self.node_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_class_valid() {
        assert!(InstanceClass::new("c5.large").is_ok());
        assert!(InstanceClass::new("m5-xlarge_v2").is_ok());
    }

    #[test]
    fn test_instance_class_invalid() {
        assert!(InstanceClass::new("").is_err());
        assert!(InstanceClass::new("has space").is_err());
        assert!(InstanceClass::new("x".repeat(65)).is_err());
    }

    #[test]
    fn test_node_count_zero_rejected() {
        assert!(NodeCount::new(0).is_err());
        assert!(NodeCount::new(1).is_ok());
    }

    #[test]
    fn test_run_id_ordering() {
        let first = RunId::FIRST;
        assert_eq!(first.value(), 1);
        assert_eq!(first.next().value(), 2);
        assert!(RunId::new(0).is_none());
    }

    #[test]
    fn test_dir_key_encoding() {
        let config = HardwareConfiguration::new(
            InstanceClass::new("c5.large").unwrap(),
            NodeCount::new(4).unwrap(),
        );
        assert_eq!(config.dir_key(), "c5.large_4");
        assert_eq!(config.to_string(), "c5.large/4");
    }

    #[test]
    fn test_configuration_equality() {
        let a = HardwareConfiguration::new(
            InstanceClass::new("small").unwrap(),
            NodeCount::new(2).unwrap(),
        );
        let b = HardwareConfiguration::new(
            InstanceClass::new("small").unwrap(),
            NodeCount::new(2).unwrap(),
        );
        assert_eq!(a, b);
    }
}
