//! The `run` command: execute one acquisition.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use jobharvest_acquire::AcquireOptions;
use jobharvest_core::OperationClass;

use crate::{Cli, OutputFormat};

/// Arguments for the run command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Operation class to run.
    #[arg(long, short = 'c', default_value = "record-acquisition")]
    pub class: OperationClass,

    /// Query to acquire (repeatable).
    #[arg(long, short = 'q', required = true)]
    pub query: Vec<String>,

    /// Minimum item count for the run before escalation kicks in.
    #[arg(long)]
    pub threshold: Option<u64>,

    /// Delay between queries in milliseconds.
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Maximum results per query.
    #[arg(long)]
    pub max_results: Option<u32>,

    /// Append acquired postings to this JSON-lines file.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Runs one acquisition and prints the result.
pub async fn run(args: &RunArgs, cli: &Cli) -> Result<()> {
    let config = super::load_config(cli.config.as_ref())?;
    let orchestrator = super::build_orchestrator(&config, args.output.as_ref())?;

    let options = AcquireOptions {
        min_results_threshold: args.threshold,
        per_query_delay_ms: args.delay_ms,
        max_results: args.max_results,
    };

    let result = orchestrator.acquire(args.class, &args.query, &options).await?;

    match cli.format {
        OutputFormat::Json => {
            let rendered = if cli.pretty {
                serde_json::to_string_pretty(&result)?
            } else {
                serde_json::to_string(&result)?
            };
            println!("{rendered}");
        }
        OutputFormat::Text => {
            println!("Strategy: {}", result.strategy_used);
            println!("Total items: {}", result.total);

            println!("\nBy provider:");
            for (provider, count) in &result.by_provider {
                println!("  {provider:<20} {count}");
            }

            println!("\nBy query:");
            for (query, outcome) in &result.by_query {
                match (&outcome.provider, &outcome.error) {
                    (Some(provider), _) => {
                        println!("  {query:<30} {:>5}  via {provider}", outcome.count);
                    }
                    (None, Some(error)) => {
                        println!("  {query:<30} {:>5}  FAILED: {error}", outcome.count);
                    }
                    (None, None) => println!("  {query:<30} {:>5}", outcome.count),
                }
            }

            if !result.is_complete() {
                println!("\n{} query(ies) failed", result.failed_queries().len());
            }
        }
    }

    Ok(())
}
