//! MCP server for the contact book.
//!
//! This module provides the MCP protocol server that exposes contact search
//! and duplicate-aware contact creation through the Model Context Protocol.

pub mod handlers;

pub use handlers::ContactBookMcpServer;

use anyhow::Result;
use rmcp::transport::io::stdio;
use rmcp::ServiceExt;

/// Run the contact book MCP server with stdio transport.
///
/// Communicates via stdin/stdout and returns once the client disconnects.
pub async fn run_server(server: ContactBookMcpServer) -> Result<()> {
    let service = server.serve(stdio()).await?;

    service.waiting().await?;

    Ok(())
}
