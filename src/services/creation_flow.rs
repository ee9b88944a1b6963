//! Duplicate-aware contact creation.
//!
//! One attempt runs strictly in sequence: duplicate check, optional
//! confirmation, create call, refresh of the contact set. Attempts share no
//! state with each other, so several may be in flight at once.

use crate::error::ContactApiError;
use crate::metrics::Metrics;
use crate::models::NewContact;
use crate::repositories::ContactRepository;
use crate::services::confirmation::ConfirmationPort;
use crate::services::directory::ContactSetRefresher;
use crate::services::duplicate_checker::{DuplicateCandidateSet, DuplicateChecker};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// State of one creation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationState {
    Idle,
    Checking,
    Confirming,
    Creating,
    Done,
    Aborted,
    Failed,
}

/// What moves an attempt from one state to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationEvent {
    Requested,
    NoDuplicates,
    DuplicatesFound,
    Confirmed,
    Declined,
    Created,
    RequestFailed,
}

impl CreationState {
    /// The state reached from `self` on `event`, or `None` if the transition is not allowed.
    pub fn next(self, event: CreationEvent) -> Option<CreationState> {
        use CreationEvent as E;
        use CreationState as S;

        match (self, event) {
            (S::Idle, E::Requested) => Some(S::Checking),
            (S::Checking, E::NoDuplicates) => Some(S::Creating),
            (S::Checking, E::DuplicatesFound) => Some(S::Confirming),
            (S::Confirming, E::Confirmed) => Some(S::Creating),
            (S::Confirming, E::Declined) => Some(S::Aborted),
            (S::Creating, E::Created) => Some(S::Done),
            (S::Checking, E::RequestFailed) | (S::Creating, E::RequestFailed) => Some(S::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Aborted | Self::Failed)
    }
}

impl fmt::Display for CreationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Checking => "checking",
            Self::Confirming => "confirming",
            Self::Creating => "creating",
            Self::Done => "done",
            Self::Aborted => "aborted",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A creation attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationOutcome {
    /// The contact was created; `duplicates` holds the candidates the user accepted.
    Created { duplicates: DuplicateCandidateSet },

    /// The user declined after seeing `prompt`; nothing was created.
    Declined {
        duplicates: DuplicateCandidateSet,
        prompt: String,
    },
}

impl CreationOutcome {
    /// Terminal state of the attempt.
    pub fn state(&self) -> CreationState {
        match self {
            Self::Created { .. } => CreationState::Done,
            Self::Declined { .. } => CreationState::Aborted,
        }
    }

    pub fn duplicates(&self) -> &DuplicateCandidateSet {
        match self {
            Self::Created { duplicates } | Self::Declined { duplicates, .. } => duplicates,
        }
    }
}

/// A creation attempt that failed on a network call. Never retried.
#[derive(Error, Debug)]
pub enum CreationError {
    #[error("Duplicate check failed: {0}")]
    DuplicateCheck(#[source] ContactApiError),

    #[error("Contact creation failed: {0}")]
    Create(#[source] ContactApiError),
}

impl CreationError {
    /// Terminal state of the attempt.
    pub fn state(&self) -> CreationState {
        CreationState::Failed
    }

    /// The state the attempt was in when the call failed.
    pub fn failed_from(&self) -> CreationState {
        match self {
            Self::DuplicateCheck(_) => CreationState::Checking,
            Self::Create(_) => CreationState::Creating,
        }
    }

    pub fn api_error(&self) -> &ContactApiError {
        match self {
            Self::DuplicateCheck(e) | Self::Create(e) => e,
        }
    }
}

/// Tracks the state of a single attempt.
struct Attempt<'c> {
    name: &'c str,
    state: CreationState,
}

impl<'c> Attempt<'c> {
    fn start(candidate: &'c NewContact) -> Self {
        Self {
            name: &candidate.name,
            state: CreationState::Idle,
        }
    }

    fn advance(&mut self, event: CreationEvent) {
        match self.state.next(event) {
            Some(next) => {
                tracing::debug!("Creation of '{}': {} -> {}", self.name, self.state, next);
                self.state = next;
            }
            None => {
                tracing::error!(
                    "Creation of '{}': no transition from {} on {:?}",
                    self.name,
                    self.state,
                    event
                );
            }
        }
    }
}

/// Orchestrates duplicate check, confirmation, creation and refresh.
#[derive(Clone)]
pub struct ContactCreationFlow {
    checker: DuplicateChecker,
    repository: Arc<dyn ContactRepository>,
    refresher: Arc<dyn ContactSetRefresher>,
    metrics: Metrics,
}

impl ContactCreationFlow {
    pub fn new(
        checker: DuplicateChecker,
        repository: Arc<dyn ContactRepository>,
        refresher: Arc<dyn ContactSetRefresher>,
    ) -> Self {
        Self {
            checker,
            repository,
            refresher,
            metrics: Metrics::new(),
        }
    }

    /// Share an existing metrics collector.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Run one creation attempt for `candidate`.
    ///
    /// `confirmation` is consulted only when the duplicate check returns
    /// candidates. A declined attempt is a normal outcome, not an error; the
    /// candidate is dropped and no create call is made. On success the
    /// contact set is refreshed before returning.
    pub async fn run(
        &self,
        candidate: NewContact,
        confirmation: &dyn ConfirmationPort,
    ) -> Result<CreationOutcome, CreationError> {
        let mut attempt = Attempt::start(&candidate);
        attempt.advance(CreationEvent::Requested);

        let duplicates = match self.checker.check(&candidate).await {
            Ok(duplicates) => duplicates,
            Err(e) => {
                attempt.advance(CreationEvent::RequestFailed);
                tracing::error!("Duplicate check for '{}' failed: {}", candidate.name, e);
                return Err(CreationError::DuplicateCheck(e));
            }
        };

        if duplicates.is_empty() {
            attempt.advance(CreationEvent::NoDuplicates);
        } else {
            attempt.advance(CreationEvent::DuplicatesFound);
            let prompt = duplicates.prompt();

            if !confirmation.confirm(&prompt) {
                attempt.advance(CreationEvent::Declined);
                tracing::info!(
                    "Creation of '{}' declined ({} possible duplicates)",
                    candidate.name,
                    duplicates.len()
                );
                return Ok(CreationOutcome::Declined { duplicates, prompt });
            }

            attempt.advance(CreationEvent::Confirmed);
        }

        if let Err(e) = self.repository.create(&candidate).await {
            attempt.advance(CreationEvent::RequestFailed);
            tracing::error!("Creating '{}' failed: {}", candidate.name, e);
            return Err(CreationError::Create(e));
        }

        attempt.advance(CreationEvent::Created);
        self.metrics.record_contact_created();
        tracing::info!("Contact '{}' created", candidate.name);

        self.refresher.refresh().await;

        Ok(CreationOutcome::Created { duplicates })
    }
}
