//! Contact Book - a contact directory with in-memory fuzzy search and
//! duplicate-aware contact creation.
//!
//! The library loads a contact set from a remote contact service, filters it
//! locally with a disposable prefix/fuzzy text index, and creates new contacts
//! only after a server-side near-duplicate check and, when needed, an explicit
//! confirmation. The binary serves all of this over MCP.
//!
//! # Architecture
//!
//! - **models**: Stored and candidate contacts
//! - **domain**: Validated value objects such as contact ids
//! - **error**: Custom error types for precise error handling
//! - **config**: Configuration management from environment variables
//! - **client**: HTTP client for the contact service
//! - **repositories**: Data access abstraction over the client
//! - **search**: Tokenizer and in-memory search index
//! - **services**: Contact directory, search controller, duplicate check and creation flow
//! - **metrics**: Counters for requests, searches and creations
//! - **server**: MCP protocol server

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod models;
pub mod repositories;
pub mod search;
pub mod server;
pub mod services;

// Re-export commonly used types
pub use client::ContactBookClient;
pub use config::Config;
pub use error::{ConfigError, ContactApiError, IndexError};
pub use metrics::{HttpTimer, Metrics, MetricsSummary};
pub use models::{Contact, ContactField, ContactSet, NewContact};
pub use search::{filter_contacts, CombineWith, FieldSchema, SearchIndex, SearchOptions};
pub use server::ContactBookMcpServer;
pub use services::{
    ConfirmationPort, ContactBookState, ContactCreationFlow, ContactDirectory, CreationError,
    CreationOutcome, CreationState, DuplicateCandidateSet, DuplicateChecker, SearchController,
};
