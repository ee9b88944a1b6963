//! Query tracking and the re-filtering trigger policy.
//!
//! The controller itself is stateless; the transient interaction state lives in
//! [`ContactBookState`] and is passed in by reference, so it can be driven from
//! tests or any front end without a rendering environment.

use crate::metrics::Metrics;
use crate::models::Contact;
use crate::search::{filter_contacts, SearchOptions};
use crate::services::directory::ContactSnapshot;

/// Previous and current query text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    previous_text: String,
    current_text: String,
}

impl QueryState {
    /// Move the current text into `previous_text` and record `text` as current.
    pub fn shift(&mut self, text: impl Into<String>) {
        self.previous_text = std::mem::replace(&mut self.current_text, text.into());
    }

    /// Whether the last input actually changed the text.
    pub fn changed(&self) -> bool {
        self.previous_text != self.current_text
    }

    pub fn previous_text(&self) -> &str {
        &self.previous_text
    }

    pub fn current_text(&self) -> &str {
        &self.current_text
    }
}

/// Transient state of one contact book interaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactBookState {
    query: QueryState,

    /// Last computed filter result, kept until the next qualifying change
    filtered: Option<Vec<Contact>>,

    /// Contact set generation `filtered` was computed from
    evaluated_generation: Option<u64>,

    /// A query change that has not been evaluated yet
    pending: bool,

    selected: Option<Contact>,
}

impl ContactBookState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn filtered(&self) -> Option<&[Contact]> {
        self.filtered.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn selected(&self) -> Option<&Contact> {
        self.selected.as_ref()
    }

    /// Show `contact` in the detail view.
    pub fn select_contact(&mut self, contact: Contact) {
        self.selected = Some(contact);
    }

    /// Close the detail view.
    pub fn deselect_contact(&mut self) {
        self.selected = None;
    }
}

/// Decides when the filtered contact list is recomputed.
///
/// The filtered result is recomputed when the query text changed and a
/// contact set is loaded, or when a previously filtered contact set was
/// replaced by a reload. Otherwise the cached result is reused.
#[derive(Debug, Clone, Default)]
pub struct SearchController {
    options: SearchOptions,
    metrics: Metrics,
}

impl SearchController {
    pub fn new(options: SearchOptions) -> Self {
        Self {
            options,
            metrics: Metrics::new(),
        }
    }

    /// Share an existing metrics collector.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Record a text-input change.
    pub fn on_search_value_change(&self, state: &mut ContactBookState, text: impl Into<String>) {
        state.query.shift(text);
        state.pending |= state.query.changed();
    }

    /// Recompute the filtered result if the trigger policy says so.
    ///
    /// Returns whether a recomputation happened. Nothing is computed while the
    /// contact set is loading or failed to load.
    pub fn evaluate(&self, state: &mut ContactBookState, snapshot: &ContactSnapshot) -> bool {
        let Some(contacts) = snapshot.contacts() else {
            return false;
        };

        let replaced =
            state.filtered.is_some() && state.evaluated_generation != Some(snapshot.generation);
        if !state.pending && !replaced {
            return false;
        }

        let query = state.query.current_text();
        let result = if query.is_empty() {
            contacts.to_vec()
        } else {
            self.metrics.record_search();
            filter_contacts(contacts, query, self.options)
        };

        tracing::debug!(
            query = %query,
            generation = snapshot.generation,
            visible = result.len(),
            total = contacts.len(),
            "Filtered contact list recomputed"
        );

        state.filtered = Some(result);
        state.evaluated_generation = Some(snapshot.generation);
        state.pending = false;
        true
    }

    /// Contacts to display: the filtered result when present, else the whole set.
    ///
    /// `None` while no contact set is loaded.
    pub fn visible_contacts<'s>(
        &self,
        state: &'s ContactBookState,
        snapshot: &'s ContactSnapshot,
    ) -> Option<&'s [Contact]> {
        let contacts = snapshot.contacts()?;
        Some(state.filtered().unwrap_or(contacts.as_slice()))
    }
}
