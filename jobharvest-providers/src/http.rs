//! Generic HTTP provider client.
//!
//! One [`HttpProvider`] instance wraps one configured upstream search
//! endpoint. The wire contract is deliberately small: a JSON POST of
//! `{"query": ..., "maxResults": ...}` answered by a JSON array of
//! postings. Transport failures and HTTP statuses are mapped onto
//! [`ProviderError`] variants so the retry predicate can classify them
//! without knowing which upstream this is.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use jobharvest_core::{InvokeOptions, JobPosting, Provider, ProviderError};

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string for JobHarvest.
const USER_AGENT: &str = concat!("JobHarvest/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Wire Types
// ============================================================================

/// Request body sent to the upstream endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_results: Option<u32>,
}

/// One posting as the upstream reports it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePosting {
    title: String,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl WirePosting {
    fn into_posting(self, source: &str) -> JobPosting {
        JobPosting {
            title: self.title,
            company: self.company,
            location: self.location,
            url: self.url,
            description: self.description,
            source: source.to_string(),
            captured_at: Utc::now(),
        }
    }
}

// ============================================================================
// HTTP Provider
// ============================================================================

/// Provider backed by a single HTTP search endpoint.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    name: String,
    endpoint: Url,
    api_key: Option<String>,
    client: Client,
}

impl HttpProvider {
    /// Creates a provider for the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Other`] when the endpoint is not a
    /// valid URL or the HTTP client cannot be constructed.
    pub fn new(
        name: impl Into<String>,
        endpoint: &str,
        api_key: Option<String>,
    ) -> Result<Self, ProviderError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| ProviderError::Other(format!("Invalid endpoint: {e}")))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ProviderError::Other(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            name: name.into(),
            endpoint,
            api_key,
            client,
        })
    }

    /// Maps a transport-level reqwest failure onto [`ProviderError`].
    ///
    /// Anything without a received status is a network error; statuses
    /// are carried verbatim so the retry predicate sees 429/5xx.
    fn map_error(error: &reqwest::Error) -> ProviderError {
        match error.status() {
            Some(status) => ProviderError::Http {
                status: status.as_u16(),
                message: error.to_string(),
            },
            None => ProviderError::Network(error.to_string()),
        }
    }

    /// Maps a non-success response status onto [`ProviderError`].
    fn status_error(status: StatusCode, body: String) -> ProviderError {
        ProviderError::Http {
            status: status.as_u16(),
            message: body,
        }
    }

    fn parse_postings(body: &str, source: &str) -> Result<Vec<JobPosting>, ProviderError> {
        let rows: Vec<WirePosting> = serde_json::from_str(body)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        Ok(rows.into_iter().map(|row| row.into_posting(source)).collect())
    }
}

#[async_trait]
impl Provider for HttpProvider {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, options), fields(provider = %self.name, query = %query))]
    async fn invoke(
        &self,
        query: &str,
        options: &InvokeOptions,
    ) -> Result<Vec<JobPosting>, ProviderError> {
        let body = SearchRequest {
            query,
            max_results: options.max_results,
        };

        let mut request = self.client.post(self.endpoint.clone()).json(&body);
        if let Some(key) = &self.api_key {
            request = request.header(header::AUTHORIZATION, format!("Bearer {key}"));
        }

        let response = request.send().await.map_err(|e| Self::map_error(&e))?;
        let status = response.status();
        debug!(status = %status, "Response received");

        let text = response.text().await.map_err(|e| Self::map_error(&e))?;
        if !status.is_success() {
            return Err(Self::status_error(status, text));
        }

        let postings = Self::parse_postings(&text, &self.name)?;
        debug!(count = postings.len(), "Parsed postings");
        Ok(postings)
    }
}

// ============================================================================
// Tests
// ============================================================================
