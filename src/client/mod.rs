//! HTTP client for the contact service.
//!
//! This module provides a synchronous HTTP client that can be used from async contexts
//! via `tokio::task::spawn_blocking`. It covers the three calls the contact book makes:
//! the GraphQL contact list query, the near-duplicate lookup and the create call.

mod async_wrapper;
pub use async_wrapper::{AsyncContactBookClient, AsyncContactBookClientImpl};

use crate::config::Config;
use crate::error::{ApiResult, ContactApiError};
use crate::metrics::{HttpTimer, Metrics};
use crate::models::{Contact, CreateContactRequest, NewContact};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// GraphQL document fetching every contact with the fields the book renders.
pub const CONTACT_BOOK_QUERY: &str =
    "query contactBook { contacts { id name address postalCode city } }";

/// GraphQL request body.
#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
}

/// GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    /// Payload, absent when the query failed entirely
    pub data: Option<T>,

    /// Query errors, if any
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

/// A single GraphQL error entry.
#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// `data` of the contact book query.
#[derive(Debug, Deserialize)]
pub struct ContactBookData {
    pub contacts: Vec<Contact>,
}

/// HTTP client for the contact service.
///
/// This client uses `ureq` for synchronous HTTP requests and can be called
/// from async contexts using `tokio::task::spawn_blocking`.
#[derive(Clone)]
pub struct ContactBookClient {
    /// Base URL of the contact service
    base_url: String,

    /// CSRF token attached to POST requests
    authenticity_token: Option<String>,

    /// HTTP client agent
    agent: Arc<ureq::Agent>,

    /// Metrics collector
    metrics: Metrics,
}

impl ContactBookClient {
    /// Create a new client from configuration.
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout))
            .build();

        Self {
            base_url: config.base_url.clone(),
            authenticity_token: config.authenticity_token.clone(),
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Create a client with a custom base URL (useful for testing).
    #[doc(hidden)]
    pub fn with_base_url(base_url: String, authenticity_token: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();

        Self {
            base_url,
            authenticity_token,
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Share an existing metrics collector with this client.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Build a full URL from a path.
    fn build_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Execute a GET request expecting JSON.
    fn get(&self, path: &str) -> Result<ureq::Response, ContactApiError> {
        let timer = HttpTimer::new(self.metrics.clone());
        let url = self.build_url(path);

        tracing::debug!("GET {}", url);

        let result = self
            .agent
            .get(&url)
            .set("Accept", "application/json")
            .call()
            .map_err(|e| self.map_error(e));

        match &result {
            Ok(_) => timer.complete(),
            Err(e) => {
                tracing::error!("GET {} - Error: {:?}", url, e);
                timer.complete_with_error();
            }
        }

        result
    }

    /// Execute a POST request with a JSON body and the authenticity token header.
    fn post(&self, path: &str, body: &serde_json::Value) -> Result<ureq::Response, ContactApiError> {
        let timer = HttpTimer::new(self.metrics.clone());
        let url = self.build_url(path);

        tracing::debug!("POST {}", url);

        let mut request = self
            .agent
            .post(&url)
            .set("Accept", "application/json")
            .set("Content-Type", "application/json");

        if let Some(token) = &self.authenticity_token {
            request = request.set("X-CSRF-Token", token);
        }

        let result = request.send_json(body).map_err(|e| self.map_error(e));

        match &result {
            Ok(response) => {
                tracing::debug!("POST {} - Success (status: {})", url, response.status());
                timer.complete();
            }
            Err(e) => {
                tracing::error!("POST {} - Error: {:?}", url, e);
                timer.complete_with_error();
            }
        }

        result
    }

    /// Map a ureq error to a ContactApiError.
    fn map_error(&self, error: ureq::Error) -> ContactApiError {
        match error {
            ureq::Error::Status(code, response) => {
                let message = response
                    .into_string()
                    .unwrap_or_else(|_| "Unknown error".to_string());

                match code {
                    401 | 403 => ContactApiError::Unauthorized,
                    404 => ContactApiError::NotFound(message),
                    422 => ContactApiError::InvalidRequest(message),
                    _ => ContactApiError::ApiError {
                        status: code,
                        message,
                    },
                }
            }
            ureq::Error::Transport(transport) => {
                if transport.kind() == ureq::ErrorKind::ConnectionFailed {
                    ContactApiError::HttpError("Connection failed".to_string())
                } else if transport.kind() == ureq::ErrorKind::Io {
                    ContactApiError::Timeout
                } else {
                    ContactApiError::HttpError(transport.to_string())
                }
            }
        }
    }

    /// Load every contact through the GraphQL endpoint.
    pub fn list_contacts(&self) -> ApiResult<Vec<Contact>> {
        let body = serde_json::to_value(GraphQlRequest {
            query: CONTACT_BOOK_QUERY,
        })?;

        let response = self.post("/graphql", &body)?;
        let body = response
            .into_string()
            .map_err(|e| ContactApiError::HttpError(e.to_string()))?;

        let envelope: GraphQlResponse<ContactBookData> = serde_json::from_str(&body)?;

        if !envelope.errors.is_empty() {
            let messages: Vec<String> = envelope.errors.into_iter().map(|e| e.message).collect();
            return Err(ContactApiError::GraphQl(messages.join("; ")));
        }

        let contacts = envelope
            .data
            .map(|data| data.contacts)
            .ok_or_else(|| ContactApiError::GraphQl("Response has no data".to_string()))?;

        Ok(contacts)
    }

    /// Ask the server for stored contacts that look like `candidate`.
    pub fn find_near_duplicates(&self, candidate: &NewContact) -> ApiResult<Vec<Contact>> {
        let query: Vec<String> = candidate
            .query_pairs()
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect();
        let path = format!("/contacts/near_duplicates?{}", query.join("&"));

        let response = self.get(&path)?;
        let body = response
            .into_string()
            .map_err(|e| ContactApiError::HttpError(e.to_string()))?;

        let duplicates: Vec<Contact> = serde_json::from_str(&body)?;
        Ok(duplicates)
    }

    /// Store a new contact.
    ///
    /// The response body carries no contract; any 2xx status counts as accepted.
    pub fn create_contact(&self, candidate: &NewContact) -> ApiResult<()> {
        let request = CreateContactRequest::new(candidate, self.authenticity_token.as_deref());
        let body = serde_json::to_value(&request)?;

        let response = self.post("/contacts", &body)?;
        tracing::info!(
            "Contact '{}' accepted (status: {})",
            candidate.name,
            response.status()
        );

        Ok(())
    }
}
