//! Quota tracker.
//!
//! Per-provider daily usage counters with lazy UTC-midnight resets.
//! The counter map is the only mutable shared state in the orchestrator
//! core; it sits behind a mutex so concurrent hosts cannot lose
//! increments.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use jobharvest_core::{Clock, Config, ProviderQuota, QuotaDecision, QuotaSnapshot};
use tracing::{debug, info, warn};

/// Usage fraction at which the near-limit warning fires.
const NEAR_LIMIT_PERCENT: f64 = 80.0;

/// Tracks daily usage per provider against configured limits.
pub struct QuotaTracker {
    quotas: Mutex<HashMap<String, ProviderQuota>>,
    clock: Arc<dyn Clock>,
}

impl QuotaTracker {
    /// Builds a tracker from static configuration, with all counters
    /// at zero and `last_reset` set to the current time.
    pub fn from_config(config: &Config, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();
        let quotas = config
            .providers
            .iter()
            .map(|(name, pc)| {
                (
                    name.clone(),
                    ProviderQuota::new(name, pc.daily_limit, pc.enabled, pc.fallback_allowed, now),
                )
            })
            .collect();

        Self {
            quotas: Mutex::new(quotas),
            clock,
        }
    }

    /// Builds a tracker directly from quota states (tests, embedders).
    pub fn with_quotas(quotas: Vec<ProviderQuota>, clock: Arc<dyn Clock>) -> Self {
        let map = quotas.into_iter().map(|q| (q.name.clone(), q)).collect();
        Self {
            quotas: Mutex::new(map),
            clock,
        }
    }

    /// Lock the quota map, recovering from poison if necessary.
    ///
    /// The worst case after recovery is a slightly stale counter, which
    /// beats panicking in the middle of a run.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, ProviderQuota>> {
        self.quotas.lock().unwrap_or_else(|poisoned| {
            warn!("Quota map mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Resets the counter if the UTC-midnight boundary has passed.
    fn lazy_reset(quota: &mut ProviderQuota, now: DateTime<Utc>) {
        if quota.reset_due(now) {
            info!(
                provider = %quota.name,
                used = quota.used,
                "Daily quota reset"
            );
            quota.reset(now);
        }
    }

    /// Checks whether a provider may be called right now.
    ///
    /// Performs the lazy reset check first, so a decision is never
    /// based on yesterday's counter. Denial reasons are deterministic:
    /// unknown, disabled, or `daily limit reached (used/limit)`.
    pub fn can_use(&self, provider: &str) -> QuotaDecision {
        let now = self.clock.now();
        let mut quotas = self.lock();

        let Some(quota) = quotas.get_mut(provider) else {
            return QuotaDecision::denied(format!("{provider} is not configured"), true);
        };

        Self::lazy_reset(quota, now);

        if !quota.enabled {
            return QuotaDecision::denied(format!("{provider} disabled"), quota.fallback_allowed);
        }
        if quota.exhausted() {
            let limit = quota.daily_limit.unwrap_or(0);
            return QuotaDecision::denied(
                format!(
                    "{provider} daily limit reached ({}/{})",
                    quota.used, limit
                ),
                quota.fallback_allowed,
            );
        }

        QuotaDecision::allowed(quota.fallback_allowed)
    }

    /// Records `count` calls against a provider.
    ///
    /// Unknown providers are ignored with a warning; the orchestrator
    /// only records usage for providers it resolved from the registry.
    pub fn record_usage(&self, provider: &str, count: u32) {
        let now = self.clock.now();
        let mut quotas = self.lock();

        let Some(quota) = quotas.get_mut(provider) else {
            warn!(provider, "Usage recorded for unknown provider, ignoring");
            return;
        };

        Self::lazy_reset(quota, now);
        quota.used = quota.used.saturating_add(count);
        debug!(
            provider,
            used = quota.used,
            limit = ?quota.daily_limit,
            "Recorded usage"
        );

        if let Some(limit) = quota.daily_limit {
            if limit > 0 && !quota.warned_near_limit && quota.percent_used() >= NEAR_LIMIT_PERCENT {
                quota.warned_near_limit = true;
                warn!(
                    provider,
                    used = quota.used,
                    limit,
                    percent = quota.percent_used(),
                    "Provider approaching daily limit"
                );
            }
        }
    }

    /// Point-in-time view of all provider quotas.
    ///
    /// Lazy-resets every provider first so the snapshot is never stale
    /// by more than the check granularity.
    pub fn snapshot(&self) -> QuotaSnapshot {
        let now = self.clock.now();
        let mut quotas = self.lock();

        quotas
            .values_mut()
            .map(|quota| {
                Self::lazy_reset(quota, now);
                (quota.name.clone(), quota.status())
            })
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{Duration, TimeZone};

    fn midday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn tracker_with(
        quotas: Vec<ProviderQuota>,
        clock: Arc<ManualClock>,
    ) -> QuotaTracker {
        QuotaTracker::with_quotas(quotas, clock)
    }

    fn quota(name: &str, limit: Option<u32>, enabled: bool) -> ProviderQuota {
        ProviderQuota::new(name, limit, enabled, true, midday())
    }

    #[test]
    fn test_usage_is_monotonic() {
        let clock = Arc::new(ManualClock::new(midday()));
        let tracker = tracker_with(vec![quota("a", Some(10), true)], clock);

        let mut last = 0;
        for _ in 0..5 {
            tracker.record_usage("a", 1);
            let used = tracker.snapshot()["a"].used;
            assert!(used > last);
            last = used;
        }
        assert_eq!(last, 5);
    }

    #[test]
    fn test_can_use_denies_exhausted() {
        let clock = Arc::new(ManualClock::new(midday()));
        let tracker = tracker_with(vec![quota("a", Some(2), true)], clock);

        assert!(tracker.can_use("a").allowed);
        tracker.record_usage("a", 2);

        let decision = tracker.can_use("a");
        assert!(!decision.allowed);
        assert_eq!(decision.reason, "a daily limit reached (2/2)");
    }

    #[test]
    fn test_can_use_denies_disabled_and_unknown() {
        let clock = Arc::new(ManualClock::new(midday()));
        let tracker = tracker_with(vec![quota("off", Some(10), false)], clock);

        let decision = tracker.can_use("off");
        assert!(!decision.allowed);
        assert_eq!(decision.reason, "off disabled");

        assert!(!tracker.can_use("ghost").allowed);
    }

    #[test]
    fn test_zero_limit_always_blocked() {
        let clock = Arc::new(ManualClock::new(midday()));
        let tracker = tracker_with(vec![quota("a", Some(0), true)], clock);
        assert!(!tracker.can_use("a").allowed);
    }

    #[test]
    fn test_unlimited_never_blocked() {
        let clock = Arc::new(ManualClock::new(midday()));
        let tracker = tracker_with(vec![quota("fallback", None, true)], clock);

        tracker.record_usage("fallback", 10_000);
        assert!(tracker.can_use("fallback").allowed);
    }

    #[test]
    fn test_reset_at_utc_midnight() {
        let clock = Arc::new(ManualClock::new(midday()));
        let tracker = tracker_with(vec![quota("a", Some(5), true)], Arc::clone(&clock));

        tracker.record_usage("a", 5);
        assert!(!tracker.can_use("a").allowed);

        // Crossing midnight resets the counter exactly once.
        clock.advance(Duration::hours(12));
        assert!(tracker.can_use("a").allowed);

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot["a"].used, 0);
        let reset_at = snapshot["a"].last_reset;

        // Repeated checks within the same day keep the same reset stamp.
        clock.advance(Duration::hours(3));
        let again = tracker.snapshot();
        assert_eq!(again["a"].last_reset, reset_at);
        assert_eq!(again["a"].used, 0);
    }

    #[test]
    fn test_record_usage_applies_lazy_reset_first() {
        let clock = Arc::new(ManualClock::new(midday()));
        let tracker = tracker_with(vec![quota("a", Some(5), true)], Arc::clone(&clock));

        tracker.record_usage("a", 4);
        clock.advance(Duration::days(1));
        tracker.record_usage("a", 1);

        // Yesterday's 4 calls are gone; today's counter is 1.
        assert_eq!(tracker.snapshot()["a"].used, 1);
    }

    #[test]
    fn test_snapshot_reports_remaining_and_percent() {
        let clock = Arc::new(ManualClock::new(midday()));
        let tracker = tracker_with(vec![quota("a", Some(10), true)], clock);

        tracker.record_usage("a", 8);
        let status = &tracker.snapshot()["a"];
        assert_eq!(status.remaining, Some(2));
        assert!((status.percent - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_near_limit_warning_is_edge_triggered() {
        let clock = Arc::new(ManualClock::new(midday()));
        let tracker = tracker_with(vec![quota("a", Some(10), true)], Arc::clone(&clock));

        tracker.record_usage("a", 7);
        assert!(!tracker.lock()["a"].warned_near_limit);

        // Crossing 80% arms the flag once; recording more keeps it set
        // so the warning cannot repeat within the same day.
        tracker.record_usage("a", 1);
        assert!(tracker.lock()["a"].warned_near_limit);
        tracker.record_usage("a", 1);
        assert!(tracker.lock()["a"].warned_near_limit);
        assert_eq!(tracker.snapshot()["a"].used, 9);

        // The daily reset re-arms it for the next day.
        clock.advance(Duration::days(1));
        tracker.record_usage("a", 1);
        assert!(!tracker.lock()["a"].warned_near_limit);
    }

    #[test]
    fn test_usage_saturates_instead_of_overflowing() {
        let clock = Arc::new(ManualClock::new(midday()));
        let tracker = tracker_with(vec![quota("a", None, true)], clock);

        tracker.record_usage("a", u32::MAX);
        tracker.record_usage("a", 1);
        assert_eq!(tracker.snapshot()["a"].used, u32::MAX);
    }
}
