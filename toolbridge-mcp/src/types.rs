//! Data types shared by the toolset, its clients, and its wrappers.

use std::fmt;

use serde::{Deserialize, Serialize};
use toolbridge_types::ToolAnnotations;

/// Tool arguments: an open mapping from argument name to JSON value.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Server-advertised metadata for one tool.
///
/// Descriptors are fetched as a batch and never edited afterwards; a refresh
/// replaces the whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Tool name, unique within one server connection.
    pub name: String,
    /// Optional human-readable title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the tool's arguments, exactly as the server sent it.
    pub input_schema: serde_json::Value,
    /// JSON Schema for the tool's structured result, if the server declares one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<serde_json::Value>,
    /// Optional behavioral hints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<ToolAnnotations>,
}

impl ToolDescriptor {
    /// A descriptor with only a name and an input schema.
    #[must_use]
    pub fn new(name: impl Into<String>, input_schema: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            title: None,
            description: None,
            input_schema,
            output_schema: None,
            annotations: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One unit of a tool call result.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    /// A block with a plain-text payload.
    Text(String),
    /// Any other block (image, audio, embedded resource, ...), in its
    /// protocol JSON form.
    Structured(serde_json::Value),
}

impl ContentBlock {
    /// The plain-text payload, if the block has one.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Structured(_) => None,
        }
    }
}

/// Lifecycle state of an [`McpToolset`](crate::McpToolset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Never connected, or the last connect attempt failed.
    Created,
    /// A connect is in progress.
    Connecting,
    /// Client connected and tool cache populated.
    Connected,
    /// A disconnect is in progress.
    Disconnecting,
    /// Disconnected; `connect()` may be called again.
    Disconnected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnecting => "disconnecting",
            Self::Disconnected => "disconnected",
        };
        f.write_str(s)
    }
}
