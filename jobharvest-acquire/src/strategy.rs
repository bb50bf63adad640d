//! Strategy selector.
//!
//! Computes, per operation class, an ordered provider preference and
//! the reason for the choice. The selector is a pure function of the
//! current quota state plus static routing configuration; it performs
//! no network calls, which keeps the decision logic directly testable.

use jobharvest_core::{ChainLink, OperationClass, RoutingConfig, Strategy};
use tracing::debug;

use crate::error::AcquireError;
use crate::quota::QuotaTracker;

/// Selects providers per operation class from routing config and
/// current quota state.
pub struct StrategySelector {
    routing: RoutingConfig,
}

impl StrategySelector {
    /// Creates a selector over the given routing configuration.
    pub fn new(routing: RoutingConfig) -> Self {
        Self { routing }
    }

    /// Computes the strategy for one operation class.
    ///
    /// The primary is the first configured high-priority provider whose
    /// quota check passes; when all are blocked, the universal fallback
    /// becomes the primary. The fallback chain lists the remaining
    /// configured providers in order, then the universal fallback, then
    /// the terminal manual sentinel.
    ///
    /// # Errors
    ///
    /// Returns [`AcquireError::Configuration`] when the universal
    /// fallback itself is unusable; no automated recovery is possible
    /// then.
    pub fn select(
        &self,
        class: OperationClass,
        tracker: &QuotaTracker,
    ) -> Result<Strategy, AcquireError> {
        let routing = self.routing.for_class(class);

        let mut primary = None;
        let mut blocked_reasons = Vec::new();

        for name in &routing.providers {
            let decision = tracker.can_use(name);
            if decision.allowed {
                primary = Some(name.clone());
                break;
            }
            debug!(class = %class, provider = %name, reason = %decision.reason, "Provider blocked");
            blocked_reasons.push(decision.reason);
        }

        let (primary, reason) = match primary {
            // When earlier providers were passed over, the reason
            // carries their blocking conditions for diagnosis.
            Some(name) if blocked_reasons.is_empty() => (name, "available".to_string()),
            Some(name) => (name, blocked_reasons.join("; ")),
            None => {
                let fallback_decision = tracker.can_use(&routing.fallback);
                if !fallback_decision.allowed {
                    return Err(AcquireError::Configuration {
                        class,
                        detail: fallback_decision.reason,
                    });
                }
                let reason = if blocked_reasons.is_empty() {
                    "no high-priority providers configured".to_string()
                } else {
                    blocked_reasons.join("; ")
                };
                (routing.fallback.clone(), reason)
            }
        };

        // Remaining configured providers cascade in their configured
        // order; quota gates are re-checked at execution time.
        let mut chain: Vec<ChainLink> = routing
            .providers
            .iter()
            .skip_while(|name| **name != primary)
            .skip(1)
            .map(|name| ChainLink::Provider(name.clone()))
            .collect();

        if primary != routing.fallback {
            chain.push(ChainLink::Provider(routing.fallback.clone()));
        }
        chain.push(ChainLink::Manual);

        Ok(Strategy {
            operation_class: class,
            primary,
            reason,
            fallback_chain: chain,
        })
    }

    /// Returns the configured universal fallback for a class.
    pub fn fallback_for(&self, class: OperationClass) -> &str {
        &self.routing.for_class(class).fallback
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{TimeZone, Utc};
    use jobharvest_core::{OperationRouting, ProviderQuota};
    use std::sync::Arc;

    fn routing() -> RoutingConfig {
        RoutingConfig {
            record_acquisition: OperationRouting {
                providers: vec!["a".to_string(), "b".to_string()],
                fallback: "web".to_string(),
            },
            contact_discovery: OperationRouting {
                providers: vec!["lookup".to_string()],
                fallback: "web".to_string(),
            },
        }
    }

    fn tracker(quotas: Vec<ProviderQuota>) -> QuotaTracker {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        QuotaTracker::with_quotas(quotas, Arc::new(ManualClock::new(now)))
    }

    fn quota(name: &str, limit: Option<u32>, used: u32, enabled: bool) -> ProviderQuota {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let mut q = ProviderQuota::new(name, limit, enabled, true, now);
        q.used = used;
        q
    }

    #[test]
    fn test_first_usable_provider_wins() {
        let tracker = tracker(vec![
            quota("a", Some(10), 0, true),
            quota("b", Some(10), 0, true),
            quota("web", None, 0, true),
        ]);

        let strategy = StrategySelector::new(routing())
            .select(OperationClass::RecordAcquisition, &tracker)
            .unwrap();

        assert_eq!(strategy.primary, "a");
        assert_eq!(strategy.reason, "available");
        assert_eq!(
            strategy.fallback_chain,
            vec![
                ChainLink::Provider("b".to_string()),
                ChainLink::Provider("web".to_string()),
                ChainLink::Manual,
            ]
        );
    }

    #[test]
    fn test_disabled_primary_skipped_with_reason() {
        let tracker = tracker(vec![
            quota("a", Some(10), 0, false),
            quota("b", Some(10), 0, true),
            quota("web", None, 0, true),
        ]);

        let strategy = StrategySelector::new(routing())
            .select(OperationClass::RecordAcquisition, &tracker)
            .unwrap();

        assert_eq!(strategy.primary, "b");
        assert_eq!(strategy.reason, "a disabled");
    }

    #[test]
    fn test_all_blocked_falls_back_with_derivation() {
        let tracker = tracker(vec![
            quota("a", Some(10), 0, false),
            quota("b", Some(5), 5, true),
            quota("web", None, 0, true),
        ]);

        let strategy = StrategySelector::new(routing())
            .select(OperationClass::RecordAcquisition, &tracker)
            .unwrap();

        assert_eq!(strategy.primary, "web");
        assert_eq!(strategy.reason, "a disabled; b daily limit reached (5/5)");
        assert_eq!(strategy.fallback_chain, vec![ChainLink::Manual]);
    }

    #[test]
    fn test_disabled_fallback_is_configuration_fatal() {
        let tracker = tracker(vec![
            quota("a", Some(10), 10, true),
            quota("b", Some(10), 10, true),
            quota("web", None, 0, false),
        ]);

        let err = StrategySelector::new(routing())
            .select(OperationClass::RecordAcquisition, &tracker)
            .unwrap_err();

        assert!(matches!(err, AcquireError::Configuration { .. }));
    }

    #[test]
    fn test_classes_route_independently() {
        let tracker = tracker(vec![
            quota("a", Some(10), 0, true),
            quota("b", Some(10), 0, true),
            quota("lookup", Some(10), 10, true),
            quota("web", None, 0, true),
        ]);

        let selector = StrategySelector::new(routing());

        let records = selector
            .select(OperationClass::RecordAcquisition, &tracker)
            .unwrap();
        assert_eq!(records.primary, "a");

        let contacts = selector
            .select(OperationClass::ContactDiscovery, &tracker)
            .unwrap();
        assert_eq!(contacts.primary, "web");
        assert_eq!(contacts.reason, "lookup daily limit reached (10/10)");
    }

    #[test]
    fn test_selection_is_deterministic() {
        let tracker = tracker(vec![
            quota("a", Some(10), 0, false),
            quota("b", Some(10), 0, true),
            quota("web", None, 0, true),
        ]);
        let selector = StrategySelector::new(routing());

        let first = selector
            .select(OperationClass::RecordAcquisition, &tracker)
            .unwrap();
        let second = selector
            .select(OperationClass::RecordAcquisition, &tracker)
            .unwrap();

        assert_eq!(first.primary, second.primary);
        assert_eq!(first.reason, second.reason);
        assert_eq!(first.fallback_chain, second.fallback_chain);
    }
}
