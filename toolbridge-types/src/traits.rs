//! Core traits: Tool, ToolDyn, Toolset.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ToolError;
use crate::types::{ContentItem, ToolContext, ToolDefinition, ToolOutput};

/// A boxed, `Send` future. Used wherever a trait must stay dyn-compatible.
pub type BoxedFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Strongly-typed tool trait. Implement this for your tools.
///
/// The blanket impl of [`ToolDyn`] handles JSON deserialization/serialization
/// so you work with concrete Rust types.
///
/// # Example
///
/// ```ignore
/// use toolbridge_types::*;
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize, schemars::JsonSchema)]
/// struct MyArgs { query: String }
///
/// struct MyTool;
/// impl Tool for MyTool {
///     const NAME: &'static str = "my_tool";
///     type Args = MyArgs;
///     type Output = String;
///     type Error = std::io::Error;
///
///     fn definition(&self) -> ToolDefinition { todo!() }
///     async fn call(&self, args: MyArgs, ctx: &ToolContext) -> Result<String, std::io::Error> {
///         Ok(args.query)
///     }
/// }
/// ```
pub trait Tool: Send + Sync {
    /// The unique name of this tool.
    const NAME: &'static str;
    /// The deserialized input type.
    type Args: DeserializeOwned + schemars::JsonSchema + Send;
    /// The serializable output type.
    type Output: Serialize;
    /// The tool-specific error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the tool definition (name, description, schema).
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with typed arguments.
    fn call(
        &self,
        args: Self::Args,
        ctx: &ToolContext,
    ) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send;
}

/// Type-erased tool for dynamic dispatch. Blanket-implemented for all [`Tool`] impls.
///
/// This enables heterogeneous tool collections (`HashMap<String, Arc<dyn ToolDyn>>`)
/// and lets runtime-discovered tools (whose schema is only known after
/// connecting to a server) sit next to compiled-in ones.
pub trait ToolDyn: Send + Sync {
    /// The tool's unique name.
    fn name(&self) -> &str;
    /// The tool definition (name, description, input schema).
    fn definition(&self) -> ToolDefinition;
    /// Execute the tool with a JSON value input, returning a generic output.
    fn call_dyn<'a>(
        &'a self,
        input: serde_json::Value,
        ctx: &'a ToolContext,
    ) -> BoxedFuture<'a, Result<ToolOutput, ToolError>>;
}

/// Blanket implementation: any `Tool` automatically becomes a `ToolDyn`.
///
/// Handles:
/// - Deserializing `serde_json::Value` into `T::Args`
/// - Calling `T::call(args, ctx)`
/// - Serializing `T::Output` into `ToolOutput`
/// - Mapping `T::Error` into `ToolError::ExecutionFailed`
impl<T: Tool> ToolDyn for T {
    fn name(&self) -> &str {
        T::NAME
    }

    fn definition(&self) -> ToolDefinition {
        Tool::definition(self)
    }

    fn call_dyn<'a>(
        &'a self,
        input: serde_json::Value,
        ctx: &'a ToolContext,
    ) -> BoxedFuture<'a, Result<ToolOutput, ToolError>> {
        Box::pin(async move {
            let args: T::Args = serde_json::from_value(input)
                .map_err(|e| ToolError::InvalidInput(e.to_string()))?;

            let output = self
                .call(args, ctx)
                .await
                .map_err(|e| ToolError::ExecutionFailed(Box::new(e)))?;

            let structured = serde_json::to_value(&output)
                .map_err(|e| ToolError::ExecutionFailed(Box::new(e)))?;

            let text = match &structured {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };

            Ok(ToolOutput {
                content: vec![ContentItem::Text(text)],
                structured_content: Some(structured),
                is_error: false,
            })
        })
    }
}

/// A named source of tools.
///
/// Native groups of typed tools and remote MCP servers both implement this,
/// so a host can collect tools from either without knowing where they run.
pub trait Toolset: Send + Sync {
    /// The toolset's name, used as the namespace prefix.
    fn name(&self) -> &str;

    /// Format a tool name inside this toolset's namespace: `<toolset>__<tool>`.
    fn format_tool_name(&self, tool_name: &str) -> String {
        format!("{}__{tool_name}", self.name())
    }

    /// The tools currently offered by this toolset.
    ///
    /// With `namespaced` set, every tool is exposed under
    /// [`format_tool_name`](Toolset::format_tool_name).
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Unavailable`] if the source cannot produce tools
    /// in its current state.
    fn tools(&self, namespaced: bool) -> Result<Vec<Arc<dyn ToolDyn>>, ToolError>;
}
