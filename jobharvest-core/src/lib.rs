// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `JobHarvest` Core
//!
//! Core types, models, and traits for the `JobHarvest` acquisition
//! orchestrator.
//!
//! This crate provides the foundational abstractions used across all
//! other `JobHarvest` crates, including:
//!
//! - Domain models (quotas, retry policies, strategies, results)
//! - Error types
//! - Trait definitions for provider implementations
//! - Static configuration
//!
//! ## Key Types
//!
//! ### Quota Types
//! - [`ProviderQuota`] - Per-provider daily counter state
//! - [`QuotaDecision`] - Outcome of a usability check
//! - [`QuotaSnapshot`] - Point-in-time view of all providers
//!
//! ### Retry Types
//! - [`RetryPolicy`] - Bounded retries with exponential backoff
//! - [`RetryPredicate`] - Declarative retryable-error classification
//!
//! ### Selection & Results
//! - [`OperationClass`] - Logical category of acquisition work
//! - [`Strategy`] - Ordered provider preference with a reason
//! - [`AcquisitionResult`] - Outcome of one orchestrated run
//!
//! ### Collaborator Seams
//! - [`Provider`] - One external data source
//! - [`Clock`] - Injected wall clock for reset boundaries
//! - [`RecordSink`] - Caller-supplied persistence

pub mod config;
pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::{CoreError, ProviderError};

// Re-export all model types
pub use models::{
    AcquisitionResult,
    ChainLink,
    InvokeOptions,
    JobPosting,
    OperationClass,
    ProviderQuota,
    QueryOutcome,
    QuotaDecision,
    QuotaSnapshot,
    QuotaStatus,
    RetryPolicy,
    RetryPredicate,
    Strategy,
};

// Re-export configuration
pub use config::{Config, GeneralConfig, OperationRouting, ProviderConfig, RoutingConfig};

// Re-export traits
pub use traits::{Clock, Provider, RecordSink};
