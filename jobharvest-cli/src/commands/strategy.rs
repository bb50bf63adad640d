//! The `strategy` command: show the current provider preference.

use anyhow::Result;
use clap::Args;
use jobharvest_core::OperationClass;

use crate::{Cli, OutputFormat};

/// Arguments for the strategy command.
#[derive(Args, Debug)]
pub struct StrategyArgs {
    /// Operation class to inspect; omit for all classes.
    #[arg(long, short = 'c')]
    pub class: Option<OperationClass>,
}

/// Prints the strategy the orchestrator would use right now.
pub async fn run(args: &StrategyArgs, cli: &Cli) -> Result<()> {
    let config = super::load_config(cli.config.as_ref())?;
    let orchestrator = super::build_orchestrator(&config, None)?;

    let classes: Vec<OperationClass> = match args.class {
        Some(class) => vec![class],
        None => OperationClass::all().to_vec(),
    };

    for class in classes {
        let strategy = orchestrator.strategy(class)?;
        match cli.format {
            OutputFormat::Json => {
                let rendered = if cli.pretty {
                    serde_json::to_string_pretty(&strategy)?
                } else {
                    serde_json::to_string(&strategy)?
                };
                println!("{rendered}");
            }
            OutputFormat::Text => {
                println!("{}", class.display_name());
                println!("  primary: {}", strategy.primary);
                println!("  reason:  {}", strategy.reason);
                let chain: Vec<String> = strategy
                    .fallback_chain
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                println!("  cascade: {}", chain.join(" -> "));
            }
        }
    }

    Ok(())
}
