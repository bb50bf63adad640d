// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `JobHarvest` Acquire
//!
//! The quota-aware multi-provider acquisition orchestrator.
//!
//! This crate contains the state-bearing core of `JobHarvest`:
//!
//! - [`retry::RetryExecutor`] - Bounded retries with exponential
//!   backoff and a declarative retry predicate
//! - [`quota::QuotaTracker`] - Per-provider daily counters with lazy
//!   UTC-midnight resets
//! - [`strategy::StrategySelector`] - Quota-driven provider preference
//!   per operation class
//! - [`orchestrator::Orchestrator`] - Sequential query execution with
//!   per-query fallback cascades and whole-run threshold escalation
//!
//! ## Example
//!
//! ```ignore
//! use jobharvest_acquire::{Orchestrator, QuotaTracker, StrategySelector, SystemClock};
//!
//! let tracker = Arc::new(QuotaTracker::from_config(&config, Arc::new(SystemClock)));
//! let orchestrator = Orchestrator::new(
//!     providers,
//!     tracker,
//!     StrategySelector::new(config.routing.clone()),
//!     config.retry.clone(),
//! );
//!
//! let result = orchestrator
//!     .acquire(OperationClass::RecordAcquisition, &queries, &AcquireOptions::default())
//!     .await?;
//! ```

pub mod clock;
pub mod error;
pub mod orchestrator;
pub mod quota;
pub mod retry;
pub mod strategy;

// Re-export key types at crate root
pub use clock::{ManualClock, SystemClock};
pub use error::AcquireError;
pub use orchestrator::{AcquireOptions, Orchestrator, OrchestratorDefaults};
pub use quota::QuotaTracker;
pub use retry::RetryExecutor;
pub use strategy::StrategySelector;
