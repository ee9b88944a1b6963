//! Error types for the contact book.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use thiserror::Error;

/// Errors that can occur when talking to the contact service.
///
/// Every variant is a network-level failure from the point of view of the
/// creation flow: none of them is ever treated as "no duplicates".
#[derive(Error, Debug)]
pub enum ContactApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse JSON response
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Network timeout
    #[error("Request timeout")]
    Timeout,

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Authentication failed (missing or stale authenticity token)
    #[error("Authentication failed")]
    Unauthorized,

    /// The server rejected the submitted contact
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The GraphQL endpoint answered with an `errors` array
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// Generic API error with context
    #[error("API error: {0}")]
    Other(String),
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Errors raised by the search index.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum IndexError {
    /// `add_all` was called on an index that already holds documents
    #[error("Search index already populated with {0} documents")]
    AlreadyPopulated(usize),
}

/// Convenience type alias for Results with ContactApiError
pub type ApiResult<T> = Result<T, ContactApiError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Convenience type alias for Results with IndexError
pub type IndexResult<T> = Result<T, IndexError>;
