//! Provider orchestrator.
//!
//! Executes an operation class against the selected primary provider,
//! cascades through the strategy's fallback chain on failure or quota
//! exhaustion, and aggregates per-provider/per-query counts into an
//! [`AcquisitionResult`]. Two escalation levels sit above the per-call
//! retries: the per-query fallback walk, and a whole-run second pass
//! when a minimum-results threshold was not met.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use jobharvest_core::{
    AcquisitionResult, InvokeOptions, JobPosting, OperationClass, Provider, QueryOutcome,
    RecordSink, RetryPolicy, Strategy,
};
use tracing::{debug, info, instrument, warn};

use crate::error::AcquireError;
use crate::quota::QuotaTracker;
use crate::retry::RetryExecutor;
use crate::strategy::StrategySelector;

// ============================================================================
// Options
// ============================================================================

/// Per-run overrides for an acquisition.
#[derive(Debug, Clone, Default)]
pub struct AcquireOptions {
    /// Minimum item count for the whole run; falling short triggers one
    /// escalation pass against the next cascade provider.
    pub min_results_threshold: Option<u64>,
    /// Fixed delay between queries, in milliseconds.
    pub per_query_delay_ms: Option<u64>,
    /// Maximum results requested per query.
    pub max_results: Option<u32>,
}

/// Orchestrator-level defaults, usually taken from configuration.
#[derive(Debug, Clone)]
pub struct OrchestratorDefaults {
    /// Default inter-query delay in milliseconds.
    pub per_query_delay_ms: u64,
    /// Default whole-run minimum results threshold (0 disables).
    pub min_results_threshold: u64,
    /// Default maximum results per query.
    pub max_results_per_query: u32,
}

impl Default for OrchestratorDefaults {
    fn default() -> Self {
        Self {
            per_query_delay_ms: 1_500,
            min_results_threshold: 0,
            max_results_per_query: 25,
        }
    }
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Quota-aware multi-provider acquisition orchestrator.
pub struct Orchestrator {
    providers: HashMap<String, Arc<dyn Provider>>,
    tracker: Arc<QuotaTracker>,
    selector: StrategySelector,
    retry_policy: RetryPolicy,
    defaults: OrchestratorDefaults,
    sink: Option<Arc<dyn RecordSink>>,
}

impl Orchestrator {
    /// Creates an orchestrator over the given provider registry.
    pub fn new(
        providers: HashMap<String, Arc<dyn Provider>>,
        tracker: Arc<QuotaTracker>,
        selector: StrategySelector,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            providers,
            tracker,
            selector,
            retry_policy,
            defaults: OrchestratorDefaults::default(),
            sink: None,
        }
    }

    /// Sets orchestrator-level defaults.
    pub fn with_defaults(mut self, defaults: OrchestratorDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Attaches a persistence sink for acquired records.
    pub fn with_sink(mut self, sink: Arc<dyn RecordSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Point-in-time quota view, for health/status reporting.
    pub fn quota_snapshot(&self) -> jobharvest_core::QuotaSnapshot {
        self.tracker.snapshot()
    }

    /// Current strategy for a class, for diagnostic endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`AcquireError::Configuration`] when no provider for the
    /// class can be attempted.
    pub fn strategy(&self, class: OperationClass) -> Result<Strategy, AcquireError> {
        self.selector.select(class, &self.tracker)
    }

    /// Runs the full acquisition for a query list.
    ///
    /// Queries are processed sequentially, in the order supplied, with
    /// a fixed inter-query delay even on success. A provider failing
    /// for one query never aborts the run; the failure is recorded in
    /// `by_query` and the next query proceeds.
    ///
    /// # Errors
    ///
    /// Only configuration-fatal conditions abort: no provider for the
    /// operation class could even be attempted.
    #[instrument(skip(self, queries, options), fields(class = %class, queries = queries.len()))]
    pub async fn acquire(
        &self,
        class: OperationClass,
        queries: &[String],
        options: &AcquireOptions,
    ) -> Result<AcquisitionResult, AcquireError> {
        let strategy = self.selector.select(class, &self.tracker)?;
        info!(primary = %strategy.primary, reason = %strategy.reason, "Selected strategy");

        let delay = Duration::from_millis(
            options
                .per_query_delay_ms
                .unwrap_or(self.defaults.per_query_delay_ms),
        );
        let threshold = options
            .min_results_threshold
            .unwrap_or(self.defaults.min_results_threshold);
        let invoke_options = InvokeOptions {
            max_results: Some(
                options
                    .max_results
                    .unwrap_or(self.defaults.max_results_per_query),
            ),
        };

        let mut total: u64 = 0;
        let mut by_provider: BTreeMap<String, u64> = BTreeMap::new();
        let mut by_query: BTreeMap<String, QueryOutcome> = BTreeMap::new();
        let mut any_attempted = false;

        // First pass: per-query primary attempt plus fallback walk.
        let attempt_order = strategy.attempt_order();
        for (index, query) in queries.iter().enumerate() {
            if index > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let outcome = self
                .run_query(query, &attempt_order, &invoke_options, &mut any_attempted)
                .await;

            if let Some(provider) = &outcome.provider {
                total += outcome.count;
                *by_provider.entry(provider.clone()).or_default() += outcome.count;
            }
            by_query.insert(query.clone(), outcome);
        }

        if !any_attempted && !queries.is_empty() {
            return Err(AcquireError::Configuration {
                class,
                detail: "no provider could be attempted for any query".to_string(),
            });
        }

        // Second pass: whole-run escalation when the threshold was not
        // met after the primary was exhausted across all queries.
        if threshold > 0 && total < threshold {
            if let Some(next) = self.next_escalation_provider(&strategy) {
                info!(
                    provider = %next.name(),
                    total,
                    threshold,
                    "Below threshold, escalating entire query list"
                );
                self.escalation_pass(
                    &next,
                    queries,
                    &invoke_options,
                    delay,
                    &mut total,
                    &mut by_provider,
                    &mut by_query,
                )
                .await;
            } else {
                warn!(total, threshold, "Below threshold but no cascade provider left");
            }
        }

        Ok(AcquisitionResult {
            total,
            by_provider,
            by_query,
            strategy_used: strategy,
            quota_snapshot: self.tracker.snapshot(),
        })
    }

    /// Tries each candidate provider for one query until one succeeds.
    async fn run_query(
        &self,
        query: &str,
        attempt_order: &[&str],
        invoke_options: &InvokeOptions,
        any_attempted: &mut bool,
    ) -> QueryOutcome {
        let mut last_error: Option<String> = None;

        for name in attempt_order {
            let decision = self.tracker.can_use(name);
            if !decision.allowed {
                debug!(provider = %name, query, reason = %decision.reason, "Skipping provider");
                if !decision.fallback_allowed {
                    debug!(provider = %name, "Provider blocks cascading, stopping walk");
                    break;
                }
                continue;
            }

            let Some(provider) = self.providers.get(*name) else {
                warn!(provider = %name, "Configured provider has no client, skipping");
                continue;
            };

            *any_attempted = true;
            match self.invoke_with_retry(provider.as_ref(), query, invoke_options).await {
                Ok(items) => {
                    // One successful invocation, regardless of item count.
                    self.tracker.record_usage(name, 1);
                    let count = items.len() as u64;
                    debug!(provider = %name, query, count, "Query succeeded");
                    self.persist(&items).await;
                    return QueryOutcome::success(count, *name);
                }
                Err(error) => {
                    warn!(provider = %name, query, error = %error, "Provider failed, cascading");
                    last_error = Some(error.to_string());
                }
            }
        }

        QueryOutcome::failure(
            last_error.unwrap_or_else(|| "no usable provider".to_string()),
        )
    }

    /// The first usable cascade provider after the primary.
    fn next_escalation_provider(&self, strategy: &Strategy) -> Option<Arc<dyn Provider>> {
        strategy
            .fallback_providers()
            .find(|name| self.tracker.can_use(name).allowed)
            .and_then(|name| self.providers.get(name).cloned())
    }

    /// Runs the entire query list against one escalation provider.
    #[allow(clippy::too_many_arguments)]
    async fn escalation_pass(
        &self,
        provider: &Arc<dyn Provider>,
        queries: &[String],
        invoke_options: &InvokeOptions,
        delay: Duration,
        total: &mut u64,
        by_provider: &mut BTreeMap<String, u64>,
        by_query: &mut BTreeMap<String, QueryOutcome>,
    ) {
        let name = provider.name().to_string();

        for (index, query) in queries.iter().enumerate() {
            if index > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if !self.tracker.can_use(&name).allowed {
                debug!(provider = %name, "Escalation provider exhausted mid-pass, stopping");
                break;
            }

            match self.invoke_with_retry(provider.as_ref(), query, invoke_options).await {
                Ok(items) => {
                    self.tracker.record_usage(&name, 1);
                    let count = items.len() as u64;
                    self.persist(&items).await;

                    *total += count;
                    *by_provider.entry(name.clone()).or_default() += count;
                    match by_query.get_mut(query) {
                        Some(outcome) => {
                            outcome.count += count;
                            if outcome.provider.is_none() {
                                outcome.provider = Some(name.clone());
                                outcome.error = None;
                            }
                        }
                        None => {
                            by_query.insert(query.clone(), QueryOutcome::success(count, &name));
                        }
                    }
                }
                Err(error) => {
                    warn!(provider = %name, query, error = %error, "Escalation query failed");
                }
            }
        }
    }

    async fn invoke_with_retry(
        &self,
        provider: &dyn Provider,
        query: &str,
        options: &InvokeOptions,
    ) -> Result<Vec<JobPosting>, jobharvest_core::ProviderError> {
        RetryExecutor::execute(&self.retry_policy, || provider.invoke(query, options)).await
    }

    async fn persist(&self, records: &[JobPosting]) {
        if records.is_empty() {
            return;
        }
        if let Some(sink) = &self.sink {
            if let Err(error) = sink.persist(records).await {
                // Persistence stays outside this core; a sink failure is
                // the caller's concern, not a run-aborting condition.
                warn!(error = %error, count = records.len(), "Record sink failed");
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
