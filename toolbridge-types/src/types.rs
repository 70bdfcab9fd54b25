//! Value types shared between tool sources and the host.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// A content item within a tool result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContentItem {
    /// Plain text content.
    Text(String),
}

/// Definition of a tool as presented to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name (unique identifier).
    pub name: String,
    /// Optional human-readable title.
    pub title: Option<String>,
    /// Description of what the tool does.
    pub description: String,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: serde_json::Value,
    /// Optional JSON Schema for the tool's output.
    pub output_schema: Option<serde_json::Value>,
    /// Optional behavioral annotations.
    pub annotations: Option<ToolAnnotations>,
}

/// Behavioral annotations for a tool (as defined by MCP).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolAnnotations {
    /// Whether the tool only reads data.
    pub read_only_hint: Option<bool>,
    /// Whether the tool performs destructive operations.
    pub destructive_hint: Option<bool>,
    /// Whether repeated calls with same args produce same result.
    pub idempotent_hint: Option<bool>,
    /// Whether the tool interacts with external systems.
    pub open_world_hint: Option<bool>,
}

/// Output from a tool execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Human-readable content items.
    pub content: Vec<ContentItem>,
    /// Optional structured JSON output for programmatic consumption.
    pub structured_content: Option<serde_json::Value>,
    /// Whether this output represents an error.
    pub is_error: bool,
}

impl ToolOutput {
    /// A successful output holding a single text item.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::Text(text.into())],
            structured_content: None,
            is_error: false,
        }
    }

    /// All text items joined with newlines.
    #[must_use]
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .map(|item| match item {
                ContentItem::Text(t) => t.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Runtime context provided to tools during execution.
///
/// Tools that do remote work give up with [`ToolError::Cancelled`] once
/// the token is cancelled.
///
/// [`ToolError::Cancelled`]: crate::ToolError::Cancelled
#[derive(Debug, Clone, Default)]
pub struct ToolContext {
    /// Token for cooperative cancellation.
    pub cancellation_token: CancellationToken,
}

impl ToolContext {
    /// A context tied to `token`.
    #[must_use]
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            cancellation_token: token,
        }
    }
}
