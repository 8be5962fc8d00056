// SPDX-License-Identifier: Apache-2.0

//! `scalebench runs` command - List persisted benchmark runs.
//!
//! Shows the run cache contents per configuration: which repeats exist on
//! disk and whether they are reusable.

use anyhow::Context;

use scalebench_core::{space, ConfigLoader, HardwareConfiguration, RunStore};

pub async fn execute(
    config_path: &str,
    class_filter: Option<&str>,
    nodes_filter: Option<u32>,
) -> anyhow::Result<()> {
    let config =
        ConfigLoader::load_file(config_path).context("loading exploration configuration")?;
    let store = RunStore::new(&config.results_dir);

    let mut total = 0usize;
    for configuration in space::enumerate(&config.instance_classes, config.max_node_count)? {
        if !matches_filter(&configuration, class_filter, nodes_filter) {
            continue;
        }

        let runs = store.list_prior_runs(&configuration);
        if runs.is_empty() {
            continue;
        }

        println!("{}:", configuration);
        for run_id in runs {
            total += 1;
            match store.load(&configuration, run_id) {
                Some(raw) => println!(
                    "  run {:>3}  {:<10} {} actions, started {}",
                    run_id,
                    format!("{:?}", raw.status).to_lowercase(),
                    raw.action_samples.len(),
                    raw.started_at.format("%Y-%m-%d %H:%M:%S")
                ),
                None => println!("  run {:>3}  unreadable (will not be reused)", run_id),
            }
        }
    }

    if total == 0 {
        println!(
            "No persisted runs under {}",
            config.results_dir.display()
        );
    } else {
        println!();
        println!("Total: {} persisted run(s)", total);
    }

    Ok(())
}

fn matches_filter(
    configuration: &HardwareConfiguration,
    class: Option<&str>,
    nodes: Option<u32>,
) -> bool {
    class.is_none_or(|c| configuration.instance_class.as_str() == c)
        && nodes.is_none_or(|n| configuration.node_count.value() == n)
}
