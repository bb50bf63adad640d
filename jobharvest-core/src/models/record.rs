//! Acquired record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One acquired job posting.
///
/// Providers normalize their payloads into this shape; everything past
/// `title` is best-effort since upstream sources vary widely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    /// Posting title.
    pub title: String,
    /// Hiring company, when the source exposes it.
    pub company: Option<String>,
    /// Location string as reported by the source.
    pub location: Option<String>,
    /// Canonical URL of the posting.
    pub url: Option<String>,
    /// Free-text description or excerpt.
    pub description: Option<String>,
    /// Name of the provider that produced this record.
    pub source: String,
    /// When this record was acquired.
    pub captured_at: DateTime<Utc>,
}

impl JobPosting {
    /// Creates a minimal posting with only the required fields.
    pub fn new(title: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            company: None,
            location: None,
            url: None,
            description: None,
            source: source.into(),
            captured_at: Utc::now(),
        }
    }
}
