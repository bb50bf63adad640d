//! The `config` command: inspect and initialize configuration.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use jobharvest_core::Config;

use crate::Cli;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Config action to perform.
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration.
    Show,
    /// Write a default configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration file path.
    Path,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => {
            let config = super::load_config(cli.config.as_ref())?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Init { force } => {
            let path = cli
                .config
                .clone()
                .unwrap_or_else(Config::default_path);
            if path.exists() && !force {
                anyhow::bail!(
                    "Config already exists at {} (use --force to overwrite)",
                    path.display()
                );
            }
            Config::default()
                .save_to(&path)
                .context("Failed to write config")?;
            println!("Wrote default config to {}", path.display());
        }
        ConfigAction::Path => {
            let path = cli.config.clone().unwrap_or_else(Config::default_path);
            println!("{}", path.display());
        }
    }

    Ok(())
}
