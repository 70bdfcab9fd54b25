//! Tool registry: register, lookup, and execute tools.

use std::collections::HashMap;
use std::sync::Arc;

use toolbridge_types::{Tool, ToolContext, ToolDefinition, ToolDyn, ToolError, ToolOutput, Toolset};

/// Registry of tools keyed by their exposed name.
///
/// Tools are stored as type-erased [`ToolDyn`] trait objects. Registering a
/// second tool under a name that is already taken is an error; use
/// namespaced toolsets when several sources may collide.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn ToolDyn>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a strongly-typed tool (auto-erased to `ToolDyn`).
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidInput`] if the name is already registered.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> Result<(), ToolError> {
        self.register_dyn(Arc::new(tool))
    }

    /// Register a pre-erased tool.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidInput`] if the name is already registered.
    pub fn register_dyn(&mut self, tool: Arc<dyn ToolDyn>) -> Result<(), ToolError> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(ToolError::InvalidInput(format!(
                "tool `{name}` is already registered"
            )));
        }
        tracing::debug!(tool = %name, "registered tool");
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Register every tool a toolset currently offers.
    ///
    /// Nothing is registered if any name collides.
    ///
    /// # Errors
    ///
    /// Propagates the toolset's error (e.g. a disconnected MCP toolset), or
    /// returns [`ToolError::InvalidInput`] on a name collision.
    pub fn register_toolset(
        &mut self,
        toolset: &dyn Toolset,
        namespaced: bool,
    ) -> Result<usize, ToolError> {
        let tools = toolset.tools(namespaced)?;

        let mut seen = std::collections::HashSet::new();
        for tool in &tools {
            let name = tool.name();
            if self.tools.contains_key(name) || !seen.insert(name) {
                return Err(ToolError::InvalidInput(format!(
                    "tool `{name}` from toolset `{}` is already registered",
                    toolset.name()
                )));
            }
        }

        let count = tools.len();
        for tool in tools {
            self.tools.insert(tool.name().to_string(), tool);
        }
        tracing::debug!(toolset = %toolset.name(), count, "registered toolset");
        Ok(count)
    }

    /// Look up a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolDyn>> {
        self.tools.get(name).cloned()
    }

    /// Names of all registered tools, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get definitions for all registered tools.
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry holds no tools.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool by name.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::NotFound`] for an unknown name, otherwise whatever
    /// the tool itself returns.
    pub async fn execute(
        &self,
        name: &str,
        input: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<ToolOutput, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        tool.call_dyn(input, ctx).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
