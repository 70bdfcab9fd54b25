//! Named groups of in-process tools.

use std::sync::Arc;

use toolbridge_types::{
    BoxedFuture, Tool, ToolContext, ToolDefinition, ToolDyn, ToolError, ToolOutput, Toolset,
};

/// A named group of in-process tools.
///
/// # Example
///
/// ```ignore
/// let fs = NativeToolset::new("FileSystem")
///     .with_tool(ReadFile)
///     .with_tool(ListFiles);
/// registry.register_toolset(&fs, true)?; // FileSystem__read_file, FileSystem__list_files
/// ```
pub struct NativeToolset {
    name: String,
    tools: Vec<Arc<dyn ToolDyn>>,
}

impl NativeToolset {
    /// Create an empty toolset.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tools: Vec::new(),
        }
    }

    /// Add a strongly-typed tool.
    #[must_use]
    pub fn with_tool<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.push(Arc::new(tool));
        self
    }

    /// Add a pre-erased tool.
    #[must_use]
    pub fn with_tool_dyn(mut self, tool: Arc<dyn ToolDyn>) -> Self {
        self.tools.push(tool);
        self
    }
}

impl Toolset for NativeToolset {
    fn name(&self) -> &str {
        &self.name
    }

    fn tools(&self, namespaced: bool) -> Result<Vec<Arc<dyn ToolDyn>>, ToolError> {
        if !namespaced {
            return Ok(self.tools.clone());
        }
        Ok(self
            .tools
            .iter()
            .map(|tool| {
                let exposed = self.format_tool_name(tool.name());
                Arc::new(NamespacedTool::new(exposed, Arc::clone(tool))) as Arc<dyn ToolDyn>
            })
            .collect())
    }
}

/// Exposes an existing tool under a different name.
///
/// Only the name changes: the definition keeps the inner tool's description
/// and schema, and calls go straight through.
pub struct NamespacedTool {
    name: String,
    inner: Arc<dyn ToolDyn>,
}

impl NamespacedTool {
    /// Wrap `inner` so it is exposed as `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, inner: Arc<dyn ToolDyn>) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }
}

impl ToolDyn for NamespacedTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            ..self.inner.definition()
        }
    }

    fn call_dyn<'a>(
        &'a self,
        input: serde_json::Value,
        ctx: &'a ToolContext,
    ) -> BoxedFuture<'a, Result<ToolOutput, ToolError>> {
        self.inner.call_dyn(input, ctx)
    }
}
