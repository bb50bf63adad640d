//! Provider registry.
//!
//! Builds the name -> client map the orchestrator executes against.
//! Providers with a configured endpoint get an [`HttpProvider`]; other
//! clients (in-process stubs, tests) can be inserted directly.

use std::collections::HashMap;
use std::sync::Arc;

use jobharvest_core::{Config, CoreError, Provider};
use tracing::{debug, warn};

use crate::http::HttpProvider;

/// Registry of provider clients, keyed by provider name.
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn Provider>>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Builds a registry from configuration.
    ///
    /// Each configured provider with an `endpoint` gets an HTTP client;
    /// API keys are resolved from the environment variable named in
    /// `api_key_env`. Providers without an endpoint are skipped with a
    /// warning; the orchestrator treats them as unattemptable.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] when an endpoint cannot be
    /// parsed or a client cannot be constructed.
    pub fn from_config(config: &Config) -> Result<Self, CoreError> {
        let mut registry = Self::new();

        for (name, pc) in &config.providers {
            let Some(endpoint) = &pc.endpoint else {
                warn!(provider = %name, "No endpoint configured, skipping client");
                continue;
            };

            let api_key = pc
                .api_key_env
                .as_ref()
                .and_then(|var| match std::env::var(var) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(provider = %name, var, "API key variable not set");
                        None
                    }
                });

            let client = HttpProvider::new(name, endpoint, api_key)
                .map_err(|e| CoreError::InvalidConfig(format!("{name}: {e}")))?;
            debug!(provider = %name, endpoint, "Registered HTTP provider");
            registry.insert(Arc::new(client));
        }

        Ok(registry)
    }

    /// Inserts a provider client, replacing any existing one of the
    /// same name.
    pub fn insert(&mut self, provider: Arc<dyn Provider>) {
        self.providers.insert(provider.name().to_string(), provider);
    }

    /// Looks up a provider by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Provider>> {
        self.providers.get(name)
    }

    /// Returns all registered provider names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if no providers are registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Consumes the registry, yielding the map the orchestrator takes.
    pub fn into_map(self) -> HashMap<String, Arc<dyn Provider>> {
        self.providers
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use jobharvest_core::ProviderConfig;

    #[test]
    fn test_from_config_registers_endpoints_only() {
        let mut config = Config::default();
        config
            .providers
            .get_mut("linkedin_jobs")
            .unwrap()
            .endpoint = Some("https://actors.example.com/linkedin".to_string());

        let registry = ProviderRegistry::from_config(&config).unwrap();
        assert!(registry.get("linkedin_jobs").is_some());
        // Default config carries no endpoints for the others.
        assert!(registry.get("google_search").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_bad_endpoint_is_config_error() {
        let mut config = Config::default();
        config.providers.insert(
            "broken".to_string(),
            ProviderConfig {
                endpoint: Some("::not a url::".to_string()),
                ..ProviderConfig::default()
            },
        );

        assert!(matches!(
            ProviderRegistry::from_config(&config),
            Err(CoreError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_names_sorted() {
        let mut registry = ProviderRegistry::new();
        registry.insert(Arc::new(
            HttpProvider::new("zeta", "https://z.example.com", None).unwrap(),
        ));
        registry.insert(Arc::new(
            HttpProvider::new("alpha", "https://a.example.com", None).unwrap(),
        ));

        assert_eq!(registry.names(), vec!["alpha", "zeta"]);
    }
}
