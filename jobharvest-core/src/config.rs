//! Configuration management.

use crate::error::CoreError;
use crate::models::{OperationClass, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Retry policy applied to every provider call.
    #[serde(default)]
    pub retry: RetryPolicy,
    /// Provider-specific configurations, keyed by provider name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Provider routing per operation class.
    #[serde(default)]
    pub routing: RoutingConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Fixed delay between queries against the same provider, in
    /// milliseconds. Applies even on success.
    #[serde(default = "default_per_query_delay_ms")]
    pub per_query_delay_ms: u64,
    /// Minimum item count a run should reach before the whole-run
    /// escalation pass kicks in. Zero disables escalation.
    #[serde(default)]
    pub min_results_threshold: u64,
    /// Default maximum results requested per query.
    #[serde(default = "default_max_results")]
    pub max_results_per_query: u32,
    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Provider-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Whether this provider is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Daily call budget. Absent means no daily gate (reserved for the
    /// universal fallback); zero means always blocked.
    pub daily_limit: Option<u32>,
    /// Whether exhausting this provider cascades to the next one.
    #[serde(default = "default_true")]
    pub fallback_allowed: bool,
    /// HTTP endpoint for the generic provider client.
    pub endpoint: Option<String>,
    /// Environment variable name for the API key.
    pub api_key_env: Option<String>,
}

/// Ordered provider routing for one operation class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationRouting {
    /// High-priority providers, tried in order.
    pub providers: Vec<String>,
    /// Universal fallback provider. Must stay enabled in configuration
    /// or the operation class cannot make progress.
    pub fallback: String,
}

/// Routing for all operation classes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Routing for record acquisition.
    #[serde(default = "default_record_acquisition_routing")]
    pub record_acquisition: OperationRouting,
    /// Routing for contact discovery.
    #[serde(default = "default_contact_discovery_routing")]
    pub contact_discovery: OperationRouting,
}

impl RoutingConfig {
    /// Returns the routing for the given operation class.
    pub fn for_class(&self, class: OperationClass) -> &OperationRouting {
        match class {
            OperationClass::RecordAcquisition => &self.record_acquisition,
            OperationClass::ContactDiscovery => &self.contact_discovery,
        }
    }
}

fn default_per_query_delay_ms() -> u64 {
    1_500
}

fn default_max_results() -> u32 {
    25
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_record_acquisition_routing() -> OperationRouting {
    OperationRouting {
        providers: vec!["linkedin_jobs".to_string(), "indeed_scraper".to_string()],
        fallback: "google_search".to_string(),
    }
}

fn default_contact_discovery_routing() -> OperationRouting {
    OperationRouting {
        providers: vec!["contact_lookup".to_string()],
        fallback: "google_search".to_string(),
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            per_query_delay_ms: default_per_query_delay_ms(),
            min_results_threshold: 0,
            max_results_per_query: default_max_results(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            daily_limit: None,
            fallback_allowed: true,
            endpoint: None,
            api_key_env: None,
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            record_acquisition: default_record_acquisition_routing(),
            contact_discovery: default_contact_discovery_routing(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut providers = HashMap::new();
        providers.insert(
            "linkedin_jobs".to_string(),
            ProviderConfig {
                daily_limit: Some(100),
                ..ProviderConfig::default()
            },
        );
        providers.insert(
            "indeed_scraper".to_string(),
            ProviderConfig {
                daily_limit: Some(200),
                ..ProviderConfig::default()
            },
        );
        providers.insert(
            "contact_lookup".to_string(),
            ProviderConfig {
                daily_limit: Some(50),
                ..ProviderConfig::default()
            },
        );
        providers.insert("google_search".to_string(), ProviderConfig::default());

        Self {
            general: GeneralConfig::default(),
            retry: RetryPolicy::default(),
            providers,
            routing: RoutingConfig::default(),
        }
    }
}

impl Config {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("jobharvest")
            .join("config.json")
    }

    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, CoreError> {
        Self::load_from(&Self::default_path())
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Saves configuration to the default path.
    pub fn save(&self) -> Result<(), CoreError> {
        self.save_to(&Self::default_path())
    }

    /// Saves configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), CoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Validates cross-references between routing and providers.
    ///
    /// Every routed provider must be configured, and every universal
    /// fallback must be configured and enabled. A disabled fallback is
    /// a configuration error, not a runtime condition.
    pub fn validate(&self) -> Result<(), CoreError> {
        for class in OperationClass::all() {
            let routing = self.routing.for_class(*class);

            for name in &routing.providers {
                if !self.providers.contains_key(name) {
                    return Err(CoreError::InvalidConfig(format!(
                        "{class}: routed provider '{name}' is not configured"
                    )));
                }
            }

            match self.providers.get(&routing.fallback) {
                None => {
                    return Err(CoreError::InvalidConfig(format!(
                        "{class}: fallback provider '{}' is not configured",
                        routing.fallback
                    )));
                }
                Some(fallback) if !fallback.enabled => {
                    return Err(CoreError::InvalidConfig(format!(
                        "{class}: fallback provider '{}' is disabled",
                        routing.fallback
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Validates retry parameter invariants.
    pub fn validate_retry(&self) -> Result<(), CoreError> {
        if self.retry.initial_delay_ms == 0 {
            return Err(CoreError::InvalidConfig(
                "retry.initial_delay_ms must be > 0".to_string(),
            ));
        }
        if self.retry.max_delay_ms < self.retry.initial_delay_ms {
            return Err(CoreError::InvalidConfig(
                "retry.max_delay_ms must be >= retry.initial_delay_ms".to_string(),
            ));
        }
        if self.retry.backoff_factor <= 1.0 {
            return Err(CoreError::InvalidConfig(
                "retry.backoff_factor must be > 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        config.validate().unwrap();
        config.validate_retry().unwrap();
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("missing.json")).unwrap();
        assert_eq!(config.general.per_query_delay_ms, 1_500);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.general.min_results_threshold = 10;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.general.min_results_threshold, 10);
        assert_eq!(loaded.routing.record_acquisition.fallback, "google_search");
    }

    #[test]
    fn test_disabled_fallback_rejected() {
        let mut config = Config::default();
        config
            .providers
            .get_mut("google_search")
            .unwrap()
            .enabled = false;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("disabled"));
    }

    #[test]
    fn test_unconfigured_routed_provider_rejected() {
        let mut config = Config::default();
        config
            .routing
            .record_acquisition
            .providers
            .push("ghost".to_string());

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_retry_parameters_rejected() {
        let mut config = Config::default();
        config.retry.backoff_factor = 1.0;
        assert!(config.validate_retry().is_err());

        let mut config = Config::default();
        config.retry.max_delay_ms = config.retry.initial_delay_ms - 1;
        assert!(config.validate_retry().is_err());
    }
}
