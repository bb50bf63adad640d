//! Domain models for JobHarvest.
//!
//! This module contains the core data structures for quota tracking,
//! retry configuration, provider selection, and acquisition results.
//!
//! ## Submodules
//! - `operation` - Operation classes and invoke options
//! - `quota` - Per-provider daily quota state and snapshots
//! - `record` - Acquired job postings
//! - `result` - Per-run acquisition outcomes
//! - `retry` - Retry policies and predicates
//! - `strategy` - Provider preference strategies

mod operation;
mod quota;
mod record;
mod result;
mod retry;
mod strategy;

// Re-export everything at the models level
pub use operation::{InvokeOptions, OperationClass};
pub use quota::{ProviderQuota, QuotaDecision, QuotaSnapshot, QuotaStatus};
pub use record::JobPosting;
pub use result::{AcquisitionResult, QueryOutcome};
pub use retry::{RetryPolicy, RetryPredicate};
pub use strategy::{ChainLink, Strategy};
