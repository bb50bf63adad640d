//! Quota-related types.
//!
//! This module contains the per-provider daily quota state and the
//! derived views exposed to callers:
//! - [`ProviderQuota`] - Mutable per-provider counter state
//! - [`QuotaDecision`] - Outcome of a `can_use` check
//! - [`QuotaStatus`] - Read-only view of one provider for snapshots
//! - [`QuotaSnapshot`] - Point-in-time view of all providers

use chrono::{DateTime, Days, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Provider Quota
// ============================================================================

/// Daily usage state for one provider.
///
/// `daily_limit` semantics:
/// - `Some(n)` with `n > 0`: at most `n` calls per UTC day.
/// - `Some(0)`: always blocked (a configured-but-forbidden provider).
/// - `None`: no daily gate. Reserved for the universal fallback, whose
///   capacity is managed separately by its operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderQuota {
    /// Unique provider name.
    pub name: String,
    /// Daily call budget. See type docs for `None`/`Some(0)` semantics.
    pub daily_limit: Option<u32>,
    /// Calls recorded since the last reset.
    pub used: u32,
    /// Operator kill-switch, independent of the quota.
    pub enabled: bool,
    /// Whether exhausting this provider cascades to the next one.
    pub fallback_allowed: bool,
    /// When the counter was last reset.
    pub last_reset: DateTime<Utc>,
    /// Edge trigger for the 80% usage warning.
    #[serde(skip)]
    pub warned_near_limit: bool,
}

impl ProviderQuota {
    /// Creates quota state for a provider, with the counter at zero.
    pub fn new(
        name: impl Into<String>,
        daily_limit: Option<u32>,
        enabled: bool,
        fallback_allowed: bool,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            daily_limit,
            used: 0,
            enabled,
            fallback_allowed,
            last_reset: now,
            warned_near_limit: false,
        }
    }

    /// Returns the next reset boundary: the first UTC midnight strictly
    /// after `last_reset`.
    ///
    /// Anchoring the boundary to `last_reset` makes the lazy reset
    /// idempotent within a calendar day: once reset, the boundary moves
    /// to the following midnight.
    pub fn next_reset(&self) -> DateTime<Utc> {
        let next_day = self.last_reset.date_naive() + Days::new(1);
        next_day.and_time(NaiveTime::MIN).and_utc()
    }

    /// Returns true if `now` has crossed the reset boundary.
    pub fn reset_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.next_reset()
    }

    /// Resets the counter for a new day.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.used = 0;
        self.last_reset = now;
        self.warned_near_limit = false;
    }

    /// Returns true if the daily budget has been consumed.
    ///
    /// Providers without a configured limit are never exhausted;
    /// a limit of zero is always exhausted.
    pub fn exhausted(&self) -> bool {
        match self.daily_limit {
            Some(limit) => self.used >= limit,
            None => false,
        }
    }

    /// Returns the fraction of the budget consumed, as a percentage.
    pub fn percent_used(&self) -> f64 {
        match self.daily_limit {
            Some(limit) if limit > 0 => f64::from(self.used) / f64::from(limit) * 100.0,
            Some(_) => 100.0,
            None => 0.0,
        }
    }

    /// Read-only view of this quota for snapshots.
    pub fn status(&self) -> QuotaStatus {
        QuotaStatus {
            used: self.used,
            limit: self.daily_limit,
            remaining: self.daily_limit.map(|l| l.saturating_sub(self.used)),
            enabled: self.enabled,
            percent: self.percent_used(),
            last_reset: self.last_reset,
        }
    }
}

// ============================================================================
// Quota Decision
// ============================================================================

/// Outcome of a `can_use` check for one provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaDecision {
    /// Whether the provider may be called right now.
    pub allowed: bool,
    /// Deterministic, operator-facing derivation of the decision.
    pub reason: String,
    /// Whether denial should cascade to the next provider.
    pub fallback_allowed: bool,
}

impl QuotaDecision {
    /// An allowing decision.
    pub fn allowed(fallback_allowed: bool) -> Self {
        Self {
            allowed: true,
            reason: "available".to_string(),
            fallback_allowed,
        }
    }

    /// A denying decision with the given reason.
    pub fn denied(reason: impl Into<String>, fallback_allowed: bool) -> Self {
        Self {
            allowed: false,
            reason: reason.into(),
            fallback_allowed,
        }
    }
}

// ============================================================================
// Quota Snapshot
// ============================================================================

/// Read-only view of one provider's quota at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaStatus {
    /// Calls recorded since the last reset.
    pub used: u32,
    /// Daily call budget, if one is configured.
    pub limit: Option<u32>,
    /// Remaining budget, if a limit is configured.
    pub remaining: Option<u32>,
    /// Operator kill-switch state.
    pub enabled: bool,
    /// Percentage of the budget consumed (0 when unlimited).
    pub percent: f64,
    /// When the counter was last reset.
    pub last_reset: DateTime<Utc>,
}

/// Point-in-time view of all provider quotas, keyed by provider name.
///
/// A `BTreeMap` keeps iteration order deterministic for diagnostics
/// and tests.
pub type QuotaSnapshot = BTreeMap<String, QuotaStatus>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_next_reset_is_following_midnight() {
        let mut quota = ProviderQuota::new("search", Some(100), true, true, at(2026, 3, 10, 15));
        assert_eq!(quota.next_reset(), at(2026, 3, 11, 0));

        // Resetting right at the boundary moves the boundary a full day.
        quota.reset(at(2026, 3, 11, 0));
        assert_eq!(quota.next_reset(), at(2026, 3, 12, 0));
    }

    #[test]
    fn test_reset_due_strictly_after_last_reset() {
        let quota = ProviderQuota::new("search", Some(100), true, true, at(2026, 3, 10, 23));
        assert!(!quota.reset_due(at(2026, 3, 10, 23)));
        assert!(quota.reset_due(at(2026, 3, 11, 0)));
    }

    #[test]
    fn test_exhaustion_semantics() {
        let now = at(2026, 3, 10, 0);
        let mut limited = ProviderQuota::new("a", Some(2), true, true, now);
        assert!(!limited.exhausted());
        limited.used = 2;
        assert!(limited.exhausted());

        let zero = ProviderQuota::new("b", Some(0), true, true, now);
        assert!(zero.exhausted());

        let mut unlimited = ProviderQuota::new("c", None, true, true, now);
        unlimited.used = 10_000;
        assert!(!unlimited.exhausted());
    }

    #[test]
    fn test_percent_used() {
        let now = at(2026, 3, 10, 0);
        let mut quota = ProviderQuota::new("a", Some(50), true, true, now);
        quota.used = 40;
        assert!((quota.percent_used() - 80.0).abs() < f64::EPSILON);

        let unlimited = ProviderQuota::new("b", None, true, true, now);
        assert!(unlimited.percent_used().abs() < f64::EPSILON);
    }

    #[test]
    fn test_status_remaining_saturates() {
        let now = at(2026, 3, 10, 0);
        let mut quota = ProviderQuota::new("a", Some(2), true, true, now);
        quota.used = 3;
        assert_eq!(quota.status().remaining, Some(0));
    }
}
