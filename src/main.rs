//! Contact Book - Main entry point
//!
//! Serves the contact book over the Model Context Protocol (MCP) on stdio.

use anyhow::Result;
use contact_book::client::{AsyncContactBookClient, AsyncContactBookClientImpl};
use contact_book::repositories::{ContactRepository, HttpContactRepository};
use contact_book::{Config, ContactBookClient, ContactBookMcpServer, ContactDirectory, Metrics};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load configuration first so LOG_LEVEL can seed the filter
    let config = Config::from_env();

    // Initialize logging (stderr only to avoid polluting stdout/MCP communication)
    let default_level = config
        .as_ref()
        .map(|cfg| cfg.log_level.clone())
        .unwrap_or_else(|_| "error".to_string());
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match config {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!("Starting Contact Book with service URL: {}", config.base_url);

    let metrics = Metrics::new();

    // Initialize contact service client
    let sync_client = ContactBookClient::new(&config).with_metrics(metrics.clone());
    let client =
        Arc::new(AsyncContactBookClientImpl::new(sync_client)) as Arc<dyn AsyncContactBookClient>;

    // Initialize repository
    let repository =
        Arc::new(HttpContactRepository::new(client)) as Arc<dyn ContactRepository>;

    // Initial load; a failure is kept as the directory's error state
    let directory =
        Arc::new(ContactDirectory::new(repository.clone()).with_metrics(metrics.clone()));
    if let Err(e) = directory.load().await {
        warn!("Initial contact load failed: {}", e);
    }

    let server =
        ContactBookMcpServer::new(repository, directory, config.search_options(), metrics);

    info!(
        "Contact Book initialized (fuzzy: {}, prefix: {}, combine: {})",
        config.search_fuzziness, config.search_prefix, config.search_combine
    );

    // Run the server (this will block until the server exits)
    info!("Starting MCP server with stdio transport");
    contact_book::server::run_server(server).await?;

    info!("Contact Book shutdown complete");
    Ok(())
}
