//! Error types for MCP clients and toolsets.
//!
//! [`McpError`] is what a protocol client reports. [`ToolsetError`] is what
//! the toolset reports to its caller: lifecycle preconditions are
//! synthesized locally, everything else carries the client's error as-is.

/// Errors from MCP client operations.
#[derive(Debug, thiserror::Error)]
pub enum McpError {
    /// Failed to connect to MCP server.
    #[error("connection failed: {0}")]
    Connection(String),
    /// MCP initialization handshake failed.
    #[error("initialization failed: {0}")]
    Initialization(String),
    /// MCP tool call failed, or the server reported the call as an error.
    #[error("tool call failed: {0}")]
    ToolCall(String),
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(String),
    /// Any other MCP error.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

/// Errors from [`McpToolset`](crate::McpToolset) operations.
#[derive(Debug, thiserror::Error)]
pub enum ToolsetError {
    /// The operation needs a connected toolset. Call `connect()` first.
    #[error("toolset `{toolset}` is not connected")]
    NotConnected {
        /// Name of the toolset.
        toolset: String,
    },
    /// Building the client or running its connect handshake failed.
    /// The toolset is back in its never-connected state.
    #[error("connect failed: {0}")]
    Connect(#[source] McpError),
    /// The client failed while listing or calling tools.
    #[error(transparent)]
    Protocol(McpError),
    /// The client failed to disconnect. Local state was cleared regardless.
    #[error("disconnect failed: {0}")]
    Disconnect(#[source] McpError),
}

impl ToolsetError {
    /// Whether this is a lifecycle precondition failure.
    #[must_use]
    pub fn is_not_connected(&self) -> bool {
        matches!(self, Self::NotConnected { .. })
    }

    /// The underlying client error, if there is one.
    #[must_use]
    pub fn mcp_error(&self) -> Option<&McpError> {
        match self {
            Self::NotConnected { .. } => None,
            Self::Connect(e) | Self::Protocol(e) | Self::Disconnect(e) => Some(e),
        }
    }
}

/// Convert an rmcp `ServiceError` into our `McpError`.
pub(crate) fn from_service_error(err: rmcp::ServiceError) -> McpError {
    McpError::Transport(err.to_string())
}

/// Convert an rmcp `ClientInitializeError` into our `McpError`.
pub(crate) fn from_client_init_error(err: rmcp::service::ClientInitializeError) -> McpError {
    McpError::Initialization(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_error_display_is_unmodified() {
        let err = ToolsetError::Protocol(McpError::ToolCall("unknown tool: nope".into()));
        assert_eq!(err.to_string(), "tool call failed: unknown tool: nope");
    }

    #[test]
    fn not_connected_names_toolset() {
        let err = ToolsetError::NotConnected {
            toolset: "fs".into(),
        };
        assert!(err.is_not_connected());
        assert!(err.mcp_error().is_none());
        assert!(err.to_string().contains("`fs`"));
    }

    #[test]
    fn connect_error_exposes_source() {
        use std::error::Error as _;

        let err = ToolsetError::Connect(McpError::Connection("refused".into()));
        assert!(!err.is_not_connected());
        assert!(err.source().unwrap().to_string().contains("refused"));
        assert!(matches!(err.mcp_error(), Some(McpError::Connection(_))));
    }
}
