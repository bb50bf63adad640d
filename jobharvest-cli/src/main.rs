// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! JobHarvest CLI - quota-aware job posting acquisition.
//!
//! # Examples
//!
//! ```bash
//! # Acquire postings for two titles
//! jobharvest run -q "M&A Analyst" -q "IB Associate"
//!
//! # Contact discovery with a run-level threshold
//! jobharvest run --class contact-discovery -q "Acme Corp" --threshold 10
//!
//! # Quota state for all providers
//! jobharvest quota
//!
//! # What would the orchestrator do right now?
//! jobharvest strategy --class record-acquisition
//!
//! # JSON output
//! jobharvest quota --format json --pretty
//!
//! # Write a default config
//! jobharvest config init
//! ```

mod commands;
mod sink;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{config, quota, run, strategy};

// ============================================================================
// CLI Definition
// ============================================================================

/// JobHarvest CLI - quota-aware multi-provider acquisition.
#[derive(Parser)]
#[command(name = "jobharvest")]
#[command(about = "Quota-aware job posting acquisition CLI")]
#[command(long_about = r#"
JobHarvest acquires job postings from configured external providers
under per-provider daily quotas, cascading to fallback providers when
the preferred ones are exhausted or failing.

Examples:
  jobharvest run -q "M&A Analyst"        # One acquisition run
  jobharvest quota                       # Daily quota state
  jobharvest strategy                    # Current provider preference
  jobharvest config init                 # Write default configuration
"#)]
#[command(version)]
#[command(author = "JobHarvest Contributors")]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Path to the configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run one acquisition against the configured providers.
    #[command(visible_alias = "r")]
    Run(run::RunArgs),

    /// Show per-provider daily quota state.
    #[command(visible_alias = "q")]
    Quota,

    /// Show the provider strategy the orchestrator would use now.
    #[command(visible_alias = "s")]
    Strategy(strategy::StrategyArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("jobharvest=debug,info")
    } else {
        EnvFilter::new("jobharvest=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Run(args) => run::run(args, &cli).await,
        Commands::Quota => quota::run(&cli).await,
        Commands::Strategy(args) => strategy::run(args, &cli).await,
        Commands::Config(args) => config::run(args, &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(1);
    }

    Ok(())
}
