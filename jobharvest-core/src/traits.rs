//! Trait definitions for JobHarvest.
//!
//! This module defines the seams between the orchestrator core and its
//! collaborators: provider clients, the clock, and the persistence
//! sink. All three are object-safe so the orchestrator can hold them
//! behind `Arc<dyn ...>`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{CoreError, ProviderError};
use crate::models::{InvokeOptions, JobPosting};

// ============================================================================
// Provider
// ============================================================================

/// A single external data provider.
///
/// Implementors are responsible for calling the upstream service and
/// normalizing its payload into [`JobPosting`] records. Errors must be
/// mapped onto [`ProviderError`] variants so the retry predicate can
/// classify them without provider-specific knowledge.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Unique provider name, matching its configuration key.
    fn name(&self) -> &str;

    /// Runs one query against the provider.
    ///
    /// This is an async operation that may involve network requests.
    async fn invoke(
        &self,
        query: &str,
        options: &InvokeOptions,
    ) -> Result<Vec<JobPosting>, ProviderError>;
}

// ============================================================================
// Clock
// ============================================================================

/// Wall-clock abstraction.
///
/// The quota tracker's daily-reset boundary depends on the current UTC
/// time; injecting the clock makes boundary behavior testable.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

// ============================================================================
// Record Sink
// ============================================================================

/// Destination for acquired records.
///
/// The orchestrator never writes to storage itself; deduplication and
/// persistence stay with the caller behind this trait.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Persists a batch of acquired postings.
    async fn persist(&self, records: &[JobPosting]) -> Result<(), CoreError>;
}
