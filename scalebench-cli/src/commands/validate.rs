// SPDX-License-Identifier: Apache-2.0

//! `scalebench validate` command - Validate configuration file.

use scalebench_core::ConfigLoader;

pub async fn execute(file: &str) -> anyhow::Result<()> {
    tracing::info!(file = %file, "Validating configuration");

    match ConfigLoader::load_file(file) {
        Ok(config) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Exploration Settings:");
            println!("  Max Node Count:     {}", config.max_node_count);
            println!("  Repeats:            {}", config.repeats);
            println!("  Worker Pool Size:   {}", config.worker_pool_size);
            println!(
                "  Overall Deadline:   {}s",
                config.overall_deadline.as_secs()
            );
            println!("  Results Directory:  {}", config.results_dir.display());
            println!(
                "  Thresholds:         improvement > {}, error rate ≤ {}, spread ≤ {}",
                config.thresholds.improvement_threshold,
                config.thresholds.error_rate_ceiling,
                config.thresholds.spread_ceiling
            );
            println!();
            println!("Instance Classes ({}):", config.instance_classes.len());
            for class in &config.instance_classes {
                println!("  - {}", class);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed:");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}
