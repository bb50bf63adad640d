//! Acquisition error types.

use jobharvest_core::{CoreError, OperationClass};
use thiserror::Error;

/// Error type for orchestrated acquisition runs.
///
/// Per-query and per-provider failures are absorbed into the
/// [`AcquisitionResult`](jobharvest_core::AcquisitionResult); only
/// configuration-fatal conditions surface through this type.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// No provider for the operation class can even be attempted.
    #[error("No usable provider for {class}: {detail}")]
    Configuration {
        /// The operation class that cannot make progress.
        class: OperationClass,
        /// What exactly is misconfigured.
        detail: String,
    },

    /// Core error.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}
