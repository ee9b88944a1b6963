//! Async wrapper around the synchronous ContactBookClient.
//!
//! Uses `tokio::task::spawn_blocking` to run HTTP operations on a dedicated
//! thread pool, so a slow contact service never blocks the async runtime.

use crate::client::ContactBookClient;
use crate::error::{ApiResult, ContactApiError};
use crate::models::{Contact, NewContact};
use async_trait::async_trait;
use std::sync::Arc;

/// Async interface to the contact service.
#[async_trait]
pub trait AsyncContactBookClient: Send + Sync {
    async fn list_contacts(&self) -> ApiResult<Vec<Contact>>;
    async fn find_near_duplicates(&self, candidate: &NewContact) -> ApiResult<Vec<Contact>>;
    async fn create_contact(&self, candidate: &NewContact) -> ApiResult<()>;
}

/// Async wrapper around synchronous ContactBookClient.
#[derive(Clone)]
pub struct AsyncContactBookClientImpl {
    client: Arc<ContactBookClient>,
}

impl AsyncContactBookClientImpl {
    pub fn new(client: ContactBookClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

fn join_error(e: tokio::task::JoinError) -> ContactApiError {
    ContactApiError::HttpError(format!("Task join error: {}", e))
}

#[async_trait]
impl AsyncContactBookClient for AsyncContactBookClientImpl {
    async fn list_contacts(&self) -> ApiResult<Vec<Contact>> {
        let client = self.client.clone();

        tokio::task::spawn_blocking(move || client.list_contacts())
            .await
            .map_err(join_error)?
    }

    async fn find_near_duplicates(&self, candidate: &NewContact) -> ApiResult<Vec<Contact>> {
        let client = self.client.clone();
        let candidate = candidate.clone();

        tokio::task::spawn_blocking(move || client.find_near_duplicates(&candidate))
            .await
            .map_err(join_error)?
    }

    async fn create_contact(&self, candidate: &NewContact) -> ApiResult<()> {
        let client = self.client.clone();
        let candidate = candidate.clone();

        tokio::task::spawn_blocking(move || client.create_contact(&candidate))
            .await
            .map_err(join_error)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    #[tokio::test]
    async fn test_async_client_creation() {
        let config = Config {
            base_url: "http://localhost:3000".to_string(),
            ..Config::default()
        };
        let client = ContactBookClient::new(&config);
        let async_client = AsyncContactBookClientImpl::new(client);

        let _cloned = async_client.clone();
    }
}
