//! The `quota` command: show per-provider quota state.

use anyhow::Result;

use crate::{Cli, OutputFormat};

/// Prints the quota snapshot.
pub async fn run(cli: &Cli) -> Result<()> {
    let config = super::load_config(cli.config.as_ref())?;
    let orchestrator = super::build_orchestrator(&config, None)?;
    let snapshot = orchestrator.quota_snapshot();

    match cli.format {
        OutputFormat::Json => {
            let rendered = if cli.pretty {
                serde_json::to_string_pretty(&snapshot)?
            } else {
                serde_json::to_string(&snapshot)?
            };
            println!("{rendered}");
        }
        OutputFormat::Text => {
            println!(
                "{:<20} {:>6} {:>8} {:>10} {:>8}  {}",
                "PROVIDER", "USED", "LIMIT", "REMAINING", "PERCENT", "STATE"
            );
            for (name, status) in &snapshot {
                let limit = status
                    .limit
                    .map_or_else(|| "-".to_string(), |l| l.to_string());
                let remaining = status
                    .remaining
                    .map_or_else(|| "-".to_string(), |r| r.to_string());
                let state = if status.enabled { "enabled" } else { "disabled" };
                println!(
                    "{name:<20} {:>6} {limit:>8} {remaining:>10} {:>7.1}%  {state}",
                    status.used, status.percent
                );
            }
        }
    }

    Ok(())
}
