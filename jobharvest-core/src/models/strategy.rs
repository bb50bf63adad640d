//! Strategy types.
//!
//! A strategy is the *decision* half of provider selection: an ordered
//! provider preference list plus the reason it was derived, decoupled
//! from the code that actually calls providers. Strategies are
//! ephemeral; they are recomputed from the quota state on demand and
//! never persisted.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::operation::OperationClass;

// ============================================================================
// Chain Link
// ============================================================================

/// One step in a fallback cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "name")]
pub enum ChainLink {
    /// Try this provider next.
    Provider(String),
    /// No further automation is possible; manual intervention required.
    Manual,
}

impl ChainLink {
    /// Returns the provider name if this link is a provider.
    pub fn provider_name(&self) -> Option<&str> {
        match self {
            Self::Provider(name) => Some(name),
            Self::Manual => None,
        }
    }
}

impl fmt::Display for ChainLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider(name) => write!(f, "{name}"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

// ============================================================================
// Strategy
// ============================================================================

/// The provider preference computed for one operation class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strategy {
    /// The operation class this strategy governs.
    pub operation_class: OperationClass,
    /// Provider to try first.
    pub primary: String,
    /// Deterministic derivation of the choice, for operators.
    pub reason: String,
    /// Providers to cascade through after the primary, in order,
    /// terminated by [`ChainLink::Manual`].
    pub fallback_chain: Vec<ChainLink>,
}

impl Strategy {
    /// Iterates the provider names in the fallback chain, skipping the
    /// terminal sentinel.
    pub fn fallback_providers(&self) -> impl Iterator<Item = &str> {
        self.fallback_chain.iter().filter_map(ChainLink::provider_name)
    }

    /// Full attempt order: primary first, then the fallback chain.
    pub fn attempt_order(&self) -> Vec<&str> {
        let mut order = vec![self.primary.as_str()];
        for name in self.fallback_providers() {
            if name != self.primary {
                order.push(name);
            }
        }
        order
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.operation_class, self.primary, self.reason)?;
        if !self.fallback_chain.is_empty() {
            let chain: Vec<String> = self.fallback_chain.iter().map(ToString::to_string).collect();
            write!(f, " -> {}", chain.join(" -> "))?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
