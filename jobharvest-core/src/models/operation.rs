//! Operation classes and per-invocation options.
//!
//! An operation class is a logical category of work that can be served
//! by several interchangeable providers. The strategy selector keeps an
//! independent provider ordering per class.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Operation Class
// ============================================================================

/// Logical categories of acquisition work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationClass {
    /// Acquiring job-posting records from search/board providers.
    RecordAcquisition,
    /// Discovering contacts (recruiters, hiring managers) for postings.
    ContactDiscovery,
}

impl OperationClass {
    /// Returns the display name for this operation class.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::RecordAcquisition => "Record Acquisition",
            Self::ContactDiscovery => "Contact Discovery",
        }
    }

    /// Returns the CLI name for this class (kebab-case).
    pub fn cli_name(&self) -> &'static str {
        match self {
            Self::RecordAcquisition => "record-acquisition",
            Self::ContactDiscovery => "contact-discovery",
        }
    }

    /// Returns all operation classes.
    pub fn all() -> &'static [OperationClass] {
        &[Self::RecordAcquisition, Self::ContactDiscovery]
    }
}

impl fmt::Display for OperationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cli_name())
    }
}

impl FromStr for OperationClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "record-acquisition" | "record_acquisition" => Ok(Self::RecordAcquisition),
            "contact-discovery" | "contact_discovery" => Ok(Self::ContactDiscovery),
            other => Err(format!("Unknown operation class: {other}")),
        }
    }
}

// ============================================================================
// Invoke Options
// ============================================================================

/// Options passed through to a provider invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvokeOptions {
    /// Maximum number of items the provider should return per query.
    pub max_results: Option<u32>,
}

impl InvokeOptions {
    /// Creates options with a maximum result count.
    pub fn with_max_results(max: u32) -> Self {
        Self {
            max_results: Some(max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_class_round_trip() {
        for class in OperationClass::all() {
            let parsed: OperationClass = class.cli_name().parse().unwrap();
            assert_eq!(parsed, *class);
        }
    }

    #[test]
    fn test_operation_class_rejects_unknown() {
        assert!("outreach".parse::<OperationClass>().is_err());
    }
}
