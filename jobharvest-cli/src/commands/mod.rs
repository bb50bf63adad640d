//! CLI subcommand implementations.

pub mod config;
pub mod quota;
pub mod run;
pub mod strategy;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use jobharvest_acquire::{
    Orchestrator, OrchestratorDefaults, QuotaTracker, StrategySelector, SystemClock,
};
use jobharvest_core::Config;
use jobharvest_providers::ProviderRegistry;

use crate::sink::JsonLinesSink;

/// Loads configuration from an explicit path or the default location.
pub fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load().context("Failed to load config")?,
    };
    config.validate_retry().context("Invalid retry settings")?;
    Ok(config)
}

/// Assembles the orchestrator from configuration.
pub fn build_orchestrator(config: &Config, output: Option<&PathBuf>) -> Result<Orchestrator> {
    let registry = ProviderRegistry::from_config(config).context("Failed to build providers")?;
    let tracker = Arc::new(QuotaTracker::from_config(config, Arc::new(SystemClock)));
    let selector = StrategySelector::new(config.routing.clone());

    let defaults = OrchestratorDefaults {
        per_query_delay_ms: config.general.per_query_delay_ms,
        min_results_threshold: config.general.min_results_threshold,
        max_results_per_query: config.general.max_results_per_query,
    };

    let mut orchestrator = Orchestrator::new(
        registry.into_map(),
        tracker,
        selector,
        config.retry.clone(),
    )
    .with_defaults(defaults);

    if let Some(path) = output {
        orchestrator = orchestrator.with_sink(Arc::new(JsonLinesSink::new(path)));
    }

    Ok(orchestrator)
}
