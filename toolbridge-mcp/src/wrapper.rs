//! Callable proxies for remote MCP tools.

use toolbridge_types::{
    BoxedFuture, ToolAnnotations, ToolContext, ToolDefinition, ToolDyn, ToolError, ToolOutput,
};

use crate::error::ToolsetError;
use crate::toolset::McpToolset;
use crate::types::{JsonObject, ToolDescriptor};

/// A proxy for one remote tool.
///
/// A wrapper is a view: it holds the owning toolset and a copy of the
/// descriptor metadata, never the client. Each call looks up the live
/// client, so a wrapper outlives refreshes and starts failing with
/// [`ToolsetError::NotConnected`] once the toolset disconnects.
#[derive(Debug, Clone)]
pub struct McpToolWrapper {
    toolset: McpToolset,
    name: String,
    remote_name: String,
    title: Option<String>,
    description: String,
    input_schema: serde_json::Value,
    output_schema: Option<serde_json::Value>,
    annotations: Option<ToolAnnotations>,
}

impl McpToolWrapper {
    pub(crate) fn new(toolset: McpToolset, name: String, descriptor: &ToolDescriptor) -> Self {
        let description = descriptor
            .description
            .clone()
            .unwrap_or_else(|| format!("tool: {}", descriptor.name));
        Self {
            toolset,
            name,
            remote_name: descriptor.name.clone(),
            title: descriptor.title.clone(),
            description,
            input_schema: descriptor.input_schema.clone(),
            output_schema: descriptor.output_schema.clone(),
            annotations: descriptor.annotations.clone(),
        }
    }

    /// The name this wrapper is exposed under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tool's name on the server. Differs from [`name`](Self::name) only
    /// for namespaced wrappers.
    #[must_use]
    pub fn remote_name(&self) -> &str {
        &self.remote_name
    }

    /// The server's description, or `tool: <name>` when it gave none.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The parameter schema exactly as the server advertised it.
    #[must_use]
    pub fn parameter_schema(&self) -> &serde_json::Value {
        &self.input_schema
    }

    /// Forward `arguments` to the server and return the formatted result.
    ///
    /// # Errors
    ///
    /// [`ToolsetError::NotConnected`] without contacting the server if the
    /// toolset is not connected; otherwise the client's error, unmodified,
    /// as [`ToolsetError::Protocol`].
    pub async fn call(&self, arguments: JsonObject) -> Result<String, ToolsetError> {
        self.toolset.call_tool(&self.remote_name, arguments).await
    }
}

fn normalize_arguments(input: serde_json::Value) -> Result<JsonObject, ToolError> {
    match input {
        serde_json::Value::Object(map) => Ok(map),
        serde_json::Value::Null => Ok(JsonObject::new()),
        serde_json::Value::String(raw) => match serde_json::from_str(&raw) {
            Ok(serde_json::Value::Object(map)) => Ok(map),
            _ => Err(ToolError::InvalidInput(format!(
                "expected a JSON object of arguments, got string {raw:?}"
            ))),
        },
        other => Err(ToolError::InvalidInput(format!(
            "expected a JSON object of arguments, got {other}"
        ))),
    }
}

impl ToolDyn for McpToolWrapper {
    fn name(&self) -> &str {
        &self.name
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            input_schema: self.input_schema.clone(),
            output_schema: self.output_schema.clone(),
            annotations: self.annotations.clone(),
        }
    }

    /// Cancelling `ctx.cancellation_token` abandons the call with
    /// [`ToolError::Cancelled`]. A call that is already cancelled never
    /// reaches the server.
    fn call_dyn<'a>(
        &'a self,
        input: serde_json::Value,
        ctx: &'a ToolContext,
    ) -> BoxedFuture<'a, Result<ToolOutput, ToolError>> {
        Box::pin(async move {
            let arguments = normalize_arguments(input)?;
            let text = tokio::select! {
                biased;
                () = ctx.cancellation_token.cancelled() => {
                    tracing::debug!(tool = %self.name, "tool call cancelled");
                    return Err(ToolError::Cancelled);
                }
                result = self.call(arguments) => {
                    result.map_err(|e| ToolError::ExecutionFailed(Box::new(e)))?
                }
            };
            Ok(ToolOutput::text(text))
        })
    }
}
