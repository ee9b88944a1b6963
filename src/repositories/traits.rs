use crate::error::ApiResult;
use crate::models::{Contact, NewContact};
use async_trait::async_trait;

/// Repository for the remote contact store.
///
/// Provides abstraction over the contact service so the search and creation
/// components can run against the HTTP client, a mock, or anything else.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Load the full contact set.
    async fn list(&self) -> ApiResult<Vec<Contact>>;

    /// Stored contacts the server judges similar to `candidate`.
    async fn near_duplicates(&self, candidate: &NewContact) -> ApiResult<Vec<Contact>>;

    /// Store a new contact.
    async fn create(&self, candidate: &NewContact) -> ApiResult<()>;
}
