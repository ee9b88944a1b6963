use async_trait::async_trait;
use contact_book::domain::ContactId;
use contact_book::error::{ApiResult, ContactApiError};
use contact_book::models::{Contact, NewContact};
use contact_book::repositories::ContactRepository;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock contact repository for testing.
///
/// Provides an in-memory implementation of ContactRepository that can be
/// configured with stored contacts, canned near-duplicate answers and
/// failures, and tracks method calls for verification.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockContactRepository {
    contacts: Arc<Mutex<Vec<Contact>>>,
    duplicates: Arc<Mutex<Vec<Contact>>>,
    created: Arc<Mutex<Vec<NewContact>>>,
    failures: Arc<Mutex<HashMap<String, ContactApiError>>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
}

#[allow(dead_code)]
impl MockContactRepository {
    /// Create a new empty MockContactRepository.
    pub fn new() -> Self {
        Self {
            contacts: Arc::new(Mutex::new(Vec::new())),
            duplicates: Arc::new(Mutex::new(Vec::new())),
            created: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(HashMap::new())),
            call_counts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Add a stored contact.
    pub fn add_contact(&self, contact: Contact) {
        self.contacts.lock().unwrap().push(contact);
    }

    /// Add multiple stored contacts.
    pub fn add_contacts(&self, contacts_list: Vec<Contact>) {
        self.contacts.lock().unwrap().extend(contacts_list);
    }

    /// Set the answer of every following near-duplicate check.
    pub fn set_duplicates(&self, duplicates: Vec<Contact>) {
        *self.duplicates.lock().unwrap() = duplicates;
    }

    /// Make every following call to `method` fail with `error`.
    pub fn fail_on(&self, method: &str, error: ContactApiError) {
        self.failures
            .lock()
            .unwrap()
            .insert(method.to_string(), error);
    }

    /// Candidates passed to `create`, in call order.
    pub fn created(&self) -> Vec<NewContact> {
        self.created.lock().unwrap().clone()
    }

    /// Get the number of times a method was called.
    pub fn get_call_count(&self, method: &str) -> usize {
        let counts = self.call_counts.lock().unwrap();
        *counts.get(method).unwrap_or(&0)
    }

    /// Reset all call counts.
    pub fn reset_call_counts(&self) {
        self.call_counts.lock().unwrap().clear();
    }

    fn track_call(&self, method: &str) -> ApiResult<()> {
        *self
            .call_counts
            .lock()
            .unwrap()
            .entry(method.to_string())
            .or_insert(0) += 1;

        match self.failures.lock().unwrap().get(method) {
            Some(error) => Err(clone_error(error)),
            None => Ok(()),
        }
    }
}

impl Default for MockContactRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// ContactApiError wraps serde_json::Error and is not Clone.
fn clone_error(error: &ContactApiError) -> ContactApiError {
    match error {
        ContactApiError::HttpError(m) => ContactApiError::HttpError(m.clone()),
        ContactApiError::ApiError { status, message } => ContactApiError::ApiError {
            status: *status,
            message: message.clone(),
        },
        ContactApiError::Timeout => ContactApiError::Timeout,
        ContactApiError::NotFound(m) => ContactApiError::NotFound(m.clone()),
        ContactApiError::Unauthorized => ContactApiError::Unauthorized,
        ContactApiError::InvalidRequest(m) => ContactApiError::InvalidRequest(m.clone()),
        ContactApiError::GraphQl(m) => ContactApiError::GraphQl(m.clone()),
        other => ContactApiError::Other(other.to_string()),
    }
}

#[async_trait]
impl ContactRepository for MockContactRepository {
    async fn list(&self) -> ApiResult<Vec<Contact>> {
        self.track_call("list")?;
        Ok(self.contacts.lock().unwrap().clone())
    }

    async fn near_duplicates(&self, _candidate: &NewContact) -> ApiResult<Vec<Contact>> {
        self.track_call("near_duplicates")?;
        Ok(self.duplicates.lock().unwrap().clone())
    }

    async fn create(&self, candidate: &NewContact) -> ApiResult<()> {
        self.track_call("create")?;

        let mut contacts = self.contacts.lock().unwrap();
        let id = ContactId::from(contacts.len() as u64 + 1);
        contacts.push(Contact::new(id, candidate.clone()));
        self.created.lock().unwrap().push(candidate.clone());
        Ok(())
    }
}
