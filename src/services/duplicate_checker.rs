//! Server-side near-duplicate lookup for a candidate contact.

use crate::error::ApiResult;
use crate::metrics::Metrics;
use crate::models::{Contact, NewContact};
use crate::repositories::ContactRepository;
use crate::services::confirmation::confirmation_prompt;
use std::sync::Arc;

/// Stored contacts a candidate might duplicate.
///
/// Empty means the candidate can be created directly; anything else needs
/// an explicit confirmation first. Lives for one creation attempt only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateCandidateSet {
    candidates: Vec<Contact>,
}

impl DuplicateCandidateSet {
    pub fn new(candidates: Vec<Contact>) -> Self {
        Self { candidates }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.candidates
    }

    pub fn into_contacts(self) -> Vec<Contact> {
        self.candidates
    }

    /// Confirmation prompt listing every candidate.
    pub fn prompt(&self) -> String {
        confirmation_prompt(&self.candidates)
    }
}

/// Asks the contact service which stored contacts resemble a candidate.
///
/// How similarity is judged is entirely up to the server; the returned list
/// is taken as the complete set of possible duplicates.
#[derive(Clone)]
pub struct DuplicateChecker {
    repository: Arc<dyn ContactRepository>,
    metrics: Metrics,
}

impl DuplicateChecker {
    pub fn new(repository: Arc<dyn ContactRepository>) -> Self {
        Self {
            repository,
            metrics: Metrics::new(),
        }
    }

    /// Share an existing metrics collector.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Fetch the near-duplicates of `candidate`.
    ///
    /// Transport and server failures are returned as errors and must never be
    /// read as "no duplicates".
    pub async fn check(&self, candidate: &NewContact) -> ApiResult<DuplicateCandidateSet> {
        tracing::debug!("Checking near duplicates for '{}'", candidate.name);

        let duplicates = self.repository.near_duplicates(candidate).await?;
        self.metrics.record_duplicate_check(duplicates.len());

        tracing::debug!(
            candidates = duplicates.len(),
            "Near duplicate check for '{}' complete",
            candidate.name
        );

        Ok(DuplicateCandidateSet::new(duplicates))
    }
}
