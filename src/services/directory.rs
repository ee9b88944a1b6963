//! The loaded contact set and its refresh collaborator.

use crate::error::{ApiResult, ContactApiError};
use crate::metrics::Metrics;
use crate::models::{Contact, ContactSet};
use crate::repositories::ContactRepository;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Message shown when a load error carries no text of its own.
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

/// User-facing text for a failed load.
fn failure_message(error: &ContactApiError) -> String {
    match error {
        ContactApiError::HttpError(message) | ContactApiError::Other(message)
            if message.trim().is_empty() =>
        {
            UNEXPECTED_ERROR.to_string()
        }
        _ => error.to_string(),
    }
}

/// Load state of the contact list.
#[derive(Debug, Clone, PartialEq)]
pub enum ContactListState {
    /// Nothing loaded yet
    Loading,

    /// The last load failed; the message is user-facing
    Failed(String),

    /// The contact set from the last successful load
    Loaded(ContactSet),
}

impl ContactListState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// The contact set, present only after a successful load.
    pub fn contacts(&self) -> Option<&ContactSet> {
        match self {
            Self::Loaded(contacts) => Some(contacts),
            _ => None,
        }
    }
}

/// Load state plus a generation number that changes whenever the state is replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactSnapshot {
    pub state: ContactListState,
    pub generation: u64,
}

impl ContactSnapshot {
    pub fn loading() -> Self {
        Self {
            state: ContactListState::Loading,
            generation: 0,
        }
    }

    pub fn loaded(contacts: Vec<Contact>, generation: u64) -> Self {
        Self {
            state: ContactListState::Loaded(Arc::new(contacts)),
            generation,
        }
    }

    pub fn contacts(&self) -> Option<&ContactSet> {
        self.state.contacts()
    }
}

/// Something that reloads the contact set after a successful creation.
#[async_trait]
pub trait ContactSetRefresher: Send + Sync {
    /// Reload the contact set. Failures are the refresher's own concern.
    async fn refresh(&self);
}

struct DirectoryState {
    snapshot: ContactSnapshot,

    /// Ticket of the newest load whose result was applied
    applied_request: u64,
}

/// Owner of the loaded contact set.
///
/// Wraps the list query with `loading`/`error`/`data` states and a `refetch`.
/// The contact set is only ever replaced wholesale. When loads overlap, a
/// response that arrives after a newer load's response is dropped.
pub struct ContactDirectory {
    repository: Arc<dyn ContactRepository>,
    state: RwLock<DirectoryState>,
    requests: AtomicU64,
    metrics: Metrics,
}

impl ContactDirectory {
    /// Create a directory that has not loaded anything yet.
    pub fn new(repository: Arc<dyn ContactRepository>) -> Self {
        Self {
            repository,
            state: RwLock::new(DirectoryState {
                snapshot: ContactSnapshot::loading(),
                applied_request: 0,
            }),
            requests: AtomicU64::new(0),
            metrics: Metrics::new(),
        }
    }

    /// Share an existing metrics collector.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Current load state.
    pub async fn snapshot(&self) -> ContactSnapshot {
        self.state.read().await.snapshot.clone()
    }

    /// Load the contact set, replacing the current state.
    ///
    /// While a reload is in flight the previous state stays visible. A result
    /// older than the one already applied is returned to the caller but leaves
    /// the state untouched.
    pub async fn load(&self) -> ApiResult<ContactSet> {
        let ticket = self.requests.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.repository.list().await;

        let mut state = self.state.write().await;
        if ticket < state.applied_request {
            tracing::debug!(
                ticket,
                applied = state.applied_request,
                "Dropping stale contact list response"
            );
            return result.map(Arc::new);
        }
        state.applied_request = ticket;

        let snapshot = &mut state.snapshot;
        snapshot.generation += 1;

        match result {
            Ok(contacts) => {
                tracing::info!(
                    contacts = contacts.len(),
                    generation = snapshot.generation,
                    "Contact set loaded"
                );
                self.metrics.record_contacts_loaded(contacts.len());
                let contacts: ContactSet = Arc::new(contacts);
                snapshot.state = ContactListState::Loaded(contacts.clone());
                Ok(contacts)
            }
            Err(e) => {
                tracing::error!("Failed to load contacts: {}", e);
                snapshot.state = ContactListState::Failed(failure_message(&e));
                Err(e)
            }
        }
    }

    /// Reload the contact set.
    pub async fn refetch(&self) -> ApiResult<ContactSet> {
        self.load().await
    }
}

#[async_trait]
impl ContactSetRefresher for ContactDirectory {
    async fn refresh(&self) {
        if let Err(e) = self.refetch().await {
            tracing::warn!("Contact set refresh failed: {}", e);
        }
    }
}
