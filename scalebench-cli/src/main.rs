// SPDX-License-Identifier: Apache-2.0

//! Scalebench CLI
//!
//! Command-line interface for the hardware-configuration exploration
//! controller.

use clap::{Parser, Subcommand};

mod commands;
mod synthetic;

/// Scalebench - hardware-configuration exploration for cluster benchmarks
#[derive(Parser)]
#[command(name = "scalebench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "scalebench.yaml")]
    pub config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the exploration and print the summary table
    Explore {
        /// Override the configured repeat count
        #[arg(short, long)]
        repeats: Option<usize>,

        /// Print decisions and cached-run coverage without executing
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        file: String,
    },

    /// List persisted benchmark runs per configuration
    Runs {
        /// Restrict to one instance class
        class: Option<String>,

        /// Restrict to one node count within the class
        nodes: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    match cli.command {
        Commands::Explore { repeats, dry_run } => {
            commands::explore::execute(&cli.config, repeats, dry_run).await
        }
        Commands::Validate { file } => commands::validate::execute(&file).await,
        Commands::Runs { class, nodes } => {
            commands::runs::execute(&cli.config, class.as_deref(), nodes).await
        }
    }
}
