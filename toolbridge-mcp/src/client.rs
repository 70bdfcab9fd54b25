//! The protocol client contract a toolset drives.
//!
//! The toolset never talks MCP itself. It builds an [`McpClient`] through a
//! [`ClientFactory`] and calls the four operations below; transport details
//! (child process, HTTP, in-memory fakes) stay behind this seam.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::McpError;
use crate::types::{ContentBlock, JsonObject, ToolDescriptor};

/// A connection to one MCP server.
///
/// Implementations use interior mutability: the toolset shares one client
/// between its lifecycle operations and any in-flight tool calls.
#[async_trait]
pub trait McpClient: Send + Sync {
    /// Open the connection and run the protocol handshake.
    async fn connect(&self) -> Result<(), McpError>;

    /// Close the connection. Must succeed on a client that is already closed.
    async fn disconnect(&self) -> Result<(), McpError>;

    /// Fetch the server's tool list, in server order.
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, McpError>;

    /// Invoke a tool. Fails when the tool is unknown to the server or the
    /// server rejects the call.
    async fn call_tool(
        &self,
        name: &str,
        arguments: JsonObject,
    ) -> Result<Vec<ContentBlock>, McpError>;
}

/// Builds a fresh, unconnected client for each connect attempt.
///
/// This is the only difference between local and remote toolsets. Any
/// `Fn() -> Result<Arc<dyn McpClient>, McpError>` closure is a factory.
pub trait ClientFactory: Send + Sync {
    /// Construct a new client.
    ///
    /// # Errors
    ///
    /// Returns [`McpError`] if the client cannot be built (bad command,
    /// malformed URL, ...).
    fn create_client(&self) -> Result<Arc<dyn McpClient>, McpError>;
}

impl<F> ClientFactory for F
where
    F: Fn() -> Result<Arc<dyn McpClient>, McpError> + Send + Sync,
{
    fn create_client(&self) -> Result<Arc<dyn McpClient>, McpError> {
        self()
    }
}
