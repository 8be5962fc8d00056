// SPDX-License-Identifier: Apache-2.0

//! Configuration space enumeration.

use crate::error::ExploreResult;
use crate::types::{HardwareConfiguration, InstanceClass, NodeCount};

/// Enumerate every `(instance class, node count)` pair with node counts
/// `1..=max_nodes`, preserving the caller-supplied class order. The order
/// is a display hint only; the scheduler determines actual execution order.
pub fn enumerate(
    classes: &[InstanceClass],
    max_nodes: NodeCount,
) -> ExploreResult<Vec<HardwareConfiguration>> {
    let mut configurations = Vec::with_capacity(classes.len() * max_nodes.value() as usize);
    for class in classes {
        for nodes in 1..=max_nodes.value() {
            configurations.push(HardwareConfiguration::new(
                class.clone(),
                NodeCount::new(nodes)?,
            ));
        }
    }
    Ok(configurations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_product() {
        let classes = vec![
            InstanceClass::new("small").unwrap(),
            InstanceClass::new("large").unwrap(),
        ];
        let configs = enumerate(&classes, NodeCount::new(3).unwrap()).unwrap();

        assert_eq!(configs.len(), 6);
        assert_eq!(configs[0].to_string(), "small/1");
        assert_eq!(configs[2].to_string(), "small/3");
        assert_eq!(configs[3].to_string(), "large/1");
        assert_eq!(configs[5].to_string(), "large/3");
    }

    #[test]
    fn test_single_node_space() {
        let classes = vec![InstanceClass::new("small").unwrap()];
        let configs = enumerate(&classes, NodeCount::new(1).unwrap()).unwrap();
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].node_count.value(), 1);
    }

    #[test]
    fn test_empty_class_list() {
        let configs = enumerate(&[], NodeCount::new(4).unwrap()).unwrap();
        assert!(configs.is_empty());
    }
}
