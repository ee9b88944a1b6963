use crate::client::AsyncContactBookClient;
use crate::error::ApiResult;
use crate::models::{Contact, NewContact};
use crate::repositories::traits::ContactRepository;
use async_trait::async_trait;
use std::sync::Arc;

/// Contact repository backed by the contact service's HTTP endpoints.
///
/// Delegates every operation to the AsyncContactBookClient, keeping the
/// services independent of the underlying HTTP client.
pub struct HttpContactRepository {
    client: Arc<dyn AsyncContactBookClient>,
}

impl HttpContactRepository {
    /// Create a new HttpContactRepository with the given client.
    pub fn new(client: Arc<dyn AsyncContactBookClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContactRepository for HttpContactRepository {
    async fn list(&self) -> ApiResult<Vec<Contact>> {
        self.client.list_contacts().await
    }

    async fn near_duplicates(&self, candidate: &NewContact) -> ApiResult<Vec<Contact>> {
        self.client.find_near_duplicates(candidate).await
    }

    async fn create(&self, candidate: &NewContact) -> ApiResult<()> {
        self.client.create_contact(candidate).await
    }
}
