//! Acquisition result types.
//!
//! The output of one orchestrated run: aggregate counts, per-query
//! outcomes, the strategy that governed the run, and the quota state
//! at completion.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::quota::QuotaSnapshot;
use super::strategy::Strategy;

// ============================================================================
// Query Outcome
// ============================================================================

/// Per-query record of how one query fared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryOutcome {
    /// Items obtained for this query (possibly across two passes).
    pub count: u64,
    /// Provider that produced the items, if any succeeded.
    pub provider: Option<String>,
    /// Error marker when every provider failed for this query.
    pub error: Option<String>,
}

impl QueryOutcome {
    /// A successful outcome.
    pub fn success(count: u64, provider: impl Into<String>) -> Self {
        Self {
            count,
            provider: Some(provider.into()),
            error: None,
        }
    }

    /// A failed outcome with an error marker.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            count: 0,
            provider: None,
            error: Some(error.into()),
        }
    }

    /// Returns true if this query produced no items and carries an
    /// error marker.
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

// ============================================================================
// Acquisition Result
// ============================================================================

/// The outcome of one orchestrated acquisition run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionResult {
    /// Total items obtained across all providers actually invoked.
    pub total: u64,
    /// Items per provider.
    pub by_provider: BTreeMap<String, u64>,
    /// Outcome per query, keyed by the query string.
    pub by_query: BTreeMap<String, QueryOutcome>,
    /// The strategy that governed the run.
    pub strategy_used: Strategy,
    /// Quota state after all usage was recorded.
    pub quota_snapshot: QuotaSnapshot,
}

impl AcquisitionResult {
    /// Queries that produced no items and carry an error marker.
    pub fn failed_queries(&self) -> Vec<&str> {
        self.by_query
            .iter()
            .filter(|(_, outcome)| outcome.is_failure())
            .map(|(query, _)| query.as_str())
            .collect()
    }

    /// Returns true if every query produced at least one item.
    pub fn is_complete(&self) -> bool {
        self.by_query.values().all(|o| !o.is_failure())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::operation::OperationClass;
    use crate::models::strategy::ChainLink;

    #[test]
    fn test_failed_queries() {
        let strategy = Strategy {
            operation_class: OperationClass::RecordAcquisition,
            primary: "a".to_string(),
            reason: "available".to_string(),
            fallback_chain: vec![ChainLink::Manual],
        };

        let mut by_query = BTreeMap::new();
        by_query.insert("q1".to_string(), QueryOutcome::success(3, "a"));
        by_query.insert("q2".to_string(), QueryOutcome::failure("HTTP 500"));

        let result = AcquisitionResult {
            total: 3,
            by_provider: BTreeMap::from([("a".to_string(), 3)]),
            by_query,
            strategy_used: strategy,
            quota_snapshot: QuotaSnapshot::new(),
        };

        assert_eq!(result.failed_queries(), vec!["q2"]);
        assert!(!result.is_complete());
    }
}
