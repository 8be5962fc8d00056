// SPDX-License-Identifier: Apache-2.0

//! `scalebench explore` command - run the exploration and print the summary.

use anyhow::Context;

use scalebench_core::{
    ConfigLoader, DecisionPolicy, ExplorationScheduler, RunStore, space,
};

use crate::synthetic::SyntheticExecutor;

pub async fn execute(
    config_path: &str,
    repeats: Option<usize>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let mut config =
        ConfigLoader::load_file(config_path).context("loading exploration configuration")?;
    if let Some(repeats) = repeats {
        anyhow::ensure!(repeats >= 1, "repeat count must be at least 1");
        config.repeats = repeats;
    }

    if dry_run {
        return print_dry_run(&config);
    }

    tracing::info!(
        classes = config.instance_classes.len(),
        max_nodes = %config.max_node_count,
        repeats = config.repeats,
        "starting exploration"
    );

    let scheduler = ExplorationScheduler::new(SyntheticExecutor, config);
    let summary = scheduler.explore().await?;

    println!();
    println!("{}", summary.render_table());

    if summary.has_failures() {
        eprintln!("✗ One or more configurations failed; see the summary above.");
        std::process::exit(1);
    }
    Ok(())
}

/// Print first-pass decisions and cached-run coverage without executing
/// anything. Decisions shown are the ones an empty-history run would make;
/// trend-based skips can only appear once results exist.
fn print_dry_run(config: &scalebench_core::ExplorationConfig) -> anyhow::Result<()> {
    let store = RunStore::new(&config.results_dir);
    let policy = DecisionPolicy::new(config.thresholds);

    println!(
        "{:<14} {:>5} {:<8} {:<42} {:>12}",
        "class", "nodes", "explore", "reason", "cached runs"
    );
    println!("{}", "-".repeat(86));

    for configuration in space::enumerate(&config.instance_classes, config.max_node_count)? {
        let decision = policy.decide(&configuration, &[]);
        let cached = store.list_prior_runs(&configuration).len();
        println!(
            "{:<14} {:>5} {:<8} {:<42} {:>12}",
            configuration.instance_class,
            configuration.node_count,
            if decision.worth_exploring { "yes" } else { "no" },
            decision.reason,
            cached
        );
    }

    Ok(())
}
