//! MCP tool handlers for the contact book server.
//!
//! This module implements all the MCP tools using the rmcp SDK's tool_router pattern.

use crate::metrics::Metrics;
use crate::models::{Contact, NewContact};
use crate::repositories::ContactRepository;
use crate::search::SearchOptions;
use crate::services::{
    ContactBookState, ContactCreationFlow, ContactDirectory, ContactListState, CreationOutcome,
    DuplicateChecker, PresetConfirmation, SearchController,
};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The MCP server that exposes the contact book as tools.
#[derive(Clone)]
pub struct ContactBookMcpServer {
    directory: Arc<ContactDirectory>,
    controller: SearchController,
    state: Arc<Mutex<ContactBookState>>,
    checker: DuplicateChecker,
    creation_flow: ContactCreationFlow,
    metrics: Metrics,
    tool_router: ToolRouter<Self>,
}

// Implement ServerHandler using the tool_handler macro
#[tool_handler]
impl ServerHandler for ContactBookMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "contact-book".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some("Contact book - search the loaded contacts with prefix and fuzzy matching, and create new contacts with a near-duplicate check.".into()),
        }
    }
}

// Helper structs for tool parameters
#[derive(Debug, Deserialize, JsonSchema)]
struct SearchContactsParams {
    /// Free-text query; an empty query shows every contact
    query: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ContactIdParams {
    contact_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ContactFieldsParams {
    name: String,
    address: String,
    postal_code: String,
    city: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct CreateContactToolParams {
    name: String,
    address: String,
    postal_code: String,
    city: String,
    /// Create the contact even if near duplicates exist
    #[serde(default)]
    confirm_duplicates: Option<bool>,
}

impl From<ContactFieldsParams> for NewContact {
    fn from(params: ContactFieldsParams) -> Self {
        NewContact::new(params.name, params.address, params.postal_code, params.city)
    }
}

// Helper function to convert errors to MCP errors
fn to_mcp_error(e: impl std::fmt::Display) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

fn invalid_params(message: impl Into<String>) -> McpError {
    McpError {
        code: ErrorCode::INVALID_PARAMS,
        message: Cow::from(message.into()),
        data: None,
    }
}

fn json_result(value: &serde_json::Value) -> Result<CallToolResult, McpError> {
    let json_response = serde_json::to_string_pretty(value).map_err(to_mcp_error)?;
    Ok(CallToolResult::success(vec![Content::text(json_response)]))
}

/// Error returned by tools that need a loaded contact set.
fn not_loaded(state: &ContactListState) -> McpError {
    match state.error() {
        Some(message) => to_mcp_error(message),
        None => to_mcp_error("Contacts are still loading"),
    }
}

// Tool router implementation
#[tool_router]
impl ContactBookMcpServer {
    /// Create a new contact book MCP server.
    ///
    /// `directory` should already have attempted its initial load.
    pub fn new(
        repository: Arc<dyn ContactRepository>,
        directory: Arc<ContactDirectory>,
        options: SearchOptions,
        metrics: Metrics,
    ) -> Self {
        let checker = DuplicateChecker::new(repository.clone()).with_metrics(metrics.clone());
        let creation_flow = ContactCreationFlow::new(checker.clone(), repository, directory.clone())
            .with_metrics(metrics.clone());
        let controller = SearchController::new(options).with_metrics(metrics.clone());

        Self {
            directory,
            controller,
            state: Arc::new(Mutex::new(ContactBookState::new())),
            checker,
            creation_flow,
            metrics,
            tool_router: Self::tool_router(),
        }
    }

    /// Return the loaded contact set.
    #[tool(description = "List every contact in the contact book, or report that the list is loading or failed to load")]
    async fn list_contacts(&self) -> Result<CallToolResult, McpError> {
        let snapshot = self.directory.snapshot().await;

        let response = match &snapshot.state {
            ContactListState::Loading => serde_json::json!({ "loading": true }),
            ContactListState::Failed(message) => serde_json::json!({
                "loading": false,
                "error": message,
            }),
            ContactListState::Loaded(contacts) => serde_json::json!({
                "loading": false,
                "contact_count": contacts.len(),
                "contacts": contacts.as_slice(),
            }),
        };

        json_result(&response)
    }

    /// Filter the contact list by free text.
    #[tool(
        description = "Filter the contact list by free text. A contact is shown when any query word matches the start of a word in one of its fields; small typos are tolerated. Results keep the contact book order."
    )]
    async fn search_contacts(
        &self,
        params: Parameters<SearchContactsParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let snapshot = self.directory.snapshot().await;
        let mut state = self.state.lock().await;

        self.controller
            .on_search_value_change(&mut state, params.query.clone());
        let recomputed = self.controller.evaluate(&mut state, &snapshot);

        let contacts = self
            .controller
            .visible_contacts(&state, &snapshot)
            .ok_or_else(|| not_loaded(&snapshot.state))?;

        tracing::debug!(
            "search_contacts '{}': {} results (recomputed: {})",
            params.query,
            contacts.len(),
            recomputed
        );

        json_result(&serde_json::json!({
            "query": params.query,
            "result_count": contacts.len(),
            "contacts": contacts,
        }))
    }

    /// Reload the contact set from the contact service.
    #[tool(description = "Reload the contact list from the contact service")]
    async fn refresh_contacts(&self) -> Result<CallToolResult, McpError> {
        let contacts = self.directory.refetch().await.map_err(to_mcp_error)?;

        let snapshot = self.directory.snapshot().await;
        let mut state = self.state.lock().await;
        self.controller.evaluate(&mut state, &snapshot);

        json_result(&serde_json::json!({
            "contact_count": contacts.len(),
            "generation": snapshot.generation,
        }))
    }

    /// Open a contact in the detail view.
    #[tool(description = "Show the details of one contact from the loaded list")]
    async fn select_contact(
        &self,
        params: Parameters<ContactIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let snapshot = self.directory.snapshot().await;
        let contacts = snapshot
            .contacts()
            .ok_or_else(|| not_loaded(&snapshot.state))?;

        let contact = contacts
            .iter()
            .find(|c| {
                c.id
                    .as_ref()
                    .is_some_and(|id| id.as_str() == params.contact_id)
            })
            .cloned()
            .ok_or_else(|| invalid_params(format!("No contact with id {}", params.contact_id)))?;

        let response = serde_json::to_value(&contact).map_err(to_mcp_error)?;
        self.state.lock().await.select_contact(contact);

        json_result(&response)
    }

    /// Close the detail view.
    #[tool(description = "Close the contact detail view")]
    async fn deselect_contact(&self) -> Result<CallToolResult, McpError> {
        let mut state = self.state.lock().await;
        let previous: Option<Contact> = state.selected().cloned();
        state.deselect_contact();

        json_result(&serde_json::json!({ "deselected": previous }))
    }

    /// Ask the contact service for near duplicates of a contact.
    #[tool(
        description = "List stored contacts the contact service considers near duplicates of the given name, address, postal code and city"
    )]
    async fn find_near_duplicates(
        &self,
        params: Parameters<ContactFieldsParams>,
    ) -> Result<CallToolResult, McpError> {
        let candidate = NewContact::from(params.0);

        let duplicates = self
            .checker
            .check(&candidate)
            .await
            .map_err(to_mcp_error)?;

        let prompt = (!duplicates.is_empty()).then(|| duplicates.prompt());

        json_result(&serde_json::json!({
            "duplicate_count": duplicates.len(),
            "duplicates": duplicates.contacts(),
            "confirmation_prompt": prompt,
        }))
    }

    /// Create a contact after checking for near duplicates.
    #[tool(
        description = "Create a new contact. If the contact service reports near duplicates, the contact is only created when confirm_duplicates is true; otherwise the confirmation prompt is returned."
    )]
    async fn create_contact(
        &self,
        params: Parameters<CreateContactToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let confirmation = PresetConfirmation::new(params.confirm_duplicates.unwrap_or(false));
        let candidate = NewContact::new(params.name, params.address, params.postal_code, params.city);

        tracing::info!("MCP Handler: create_contact called for '{}'", candidate.name);

        let outcome = self
            .creation_flow
            .run(candidate, &confirmation)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create contact: {:?}", e);
                to_mcp_error(e)
            })?;

        let response = match &outcome {
            CreationOutcome::Created { duplicates } => serde_json::json!({
                "state": outcome.state().to_string(),
                "created": true,
                "confirmed_duplicates": duplicates.contacts(),
            }),
            CreationOutcome::Declined { duplicates, prompt } => serde_json::json!({
                "state": outcome.state().to_string(),
                "created": false,
                "duplicates": duplicates.contacts(),
                "confirmation_prompt": prompt,
            }),
        };

        tracing::debug!("Metrics after create_contact: {:?}", self.metrics.summary());

        json_result(&response)
    }
}
