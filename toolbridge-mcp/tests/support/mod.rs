//! A scripted in-memory MCP server for toolset tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use toolbridge_mcp::*;

/// Everything the toolset asked of the fake, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create,
    Connect,
    Disconnect,
    ListTools,
    CallTool { name: String, arguments: JsonObject },
}

#[derive(Default)]
struct Script {
    tools: Vec<ToolDescriptor>,
    responses: HashMap<String, Vec<ContentBlock>>,
    fail_create: bool,
    fail_connect: bool,
    fail_list: bool,
    fail_disconnect: bool,
    stall_calls: bool,
    calls: Vec<Call>,
}

/// Shared handle to the fake server. Clones see the same script and log.
#[derive(Clone, Default)]
pub struct FakeServer {
    script: Arc<Mutex<Script>>,
}

impl FakeServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tools(tools: Vec<ToolDescriptor>) -> Self {
        let server = Self::new();
        server.set_tools(tools);
        server
    }

    pub fn set_tools(&self, tools: Vec<ToolDescriptor>) {
        self.script.lock().unwrap().tools = tools;
    }

    pub fn respond(&self, tool: &str, blocks: Vec<ContentBlock>) {
        self.script
            .lock()
            .unwrap()
            .responses
            .insert(tool.to_string(), blocks);
    }

    pub fn fail_create(&self, fail: bool) {
        self.script.lock().unwrap().fail_create = fail;
    }

    pub fn fail_connect(&self, fail: bool) {
        self.script.lock().unwrap().fail_connect = fail;
    }

    pub fn fail_list(&self, fail: bool) {
        self.script.lock().unwrap().fail_list = fail;
    }

    pub fn fail_disconnect(&self, fail: bool) {
        self.script.lock().unwrap().fail_disconnect = fail;
    }

    /// Tool calls are recorded and then never answered.
    pub fn stall_calls(&self, stall: bool) {
        self.script.lock().unwrap().stall_calls = stall;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn clear_calls(&self) {
        self.script.lock().unwrap().calls.clear();
    }

    /// A toolset named `name` whose clients talk to this server.
    pub fn toolset(&self, name: &str) -> McpToolset {
        McpToolset::with_factory(name, FakeFactory(self.clone()))
    }

    fn record(&self, call: Call) {
        self.script.lock().unwrap().calls.push(call);
    }
}

struct FakeFactory(FakeServer);

impl ClientFactory for FakeFactory {
    fn create_client(&self) -> Result<Arc<dyn McpClient>, McpError> {
        self.0.record(Call::Create);
        if self.0.script.lock().unwrap().fail_create {
            return Err(McpError::Connection("cannot build client".into()));
        }
        Ok(Arc::new(FakeClient(self.0.clone())))
    }
}

struct FakeClient(FakeServer);

#[async_trait]
impl McpClient for FakeClient {
    async fn connect(&self) -> Result<(), McpError> {
        self.0.record(Call::Connect);
        if self.0.script.lock().unwrap().fail_connect {
            return Err(McpError::Connection("connection refused".into()));
        }
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), McpError> {
        self.0.record(Call::Disconnect);
        if self.0.script.lock().unwrap().fail_disconnect {
            return Err(McpError::Transport("broken pipe".into()));
        }
        Ok(())
    }

    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, McpError> {
        self.0.record(Call::ListTools);
        let script = self.0.script.lock().unwrap();
        if script.fail_list {
            return Err(McpError::Transport("list failed".into()));
        }
        Ok(script.tools.clone())
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: JsonObject,
    ) -> Result<Vec<ContentBlock>, McpError> {
        self.0.record(Call::CallTool {
            name: name.to_string(),
            arguments,
        });
        let stall = self.0.script.lock().unwrap().stall_calls;
        if stall {
            std::future::pending::<()>().await;
        }
        let script = self.0.script.lock().unwrap();
        if !script.tools.iter().any(|t| t.name == name) {
            return Err(McpError::ToolCall(format!("unknown tool: {name}")));
        }
        Ok(script
            .responses
            .get(name)
            .cloned()
            .unwrap_or_else(|| vec![ContentBlock::Text(format!("{name} ok"))]))
    }
}

pub fn descriptor(name: &str) -> ToolDescriptor {
    ToolDescriptor::new(name, json!({"type": "object"}))
}

pub fn add_descriptor() -> ToolDescriptor {
    ToolDescriptor::new(
        "add",
        json!({
            "type": "object",
            "properties": {
                "a": {"type": "number"},
                "b": {"type": "number"}
            },
            "required": ["a", "b"]
        }),
    )
    .with_description("Add two numbers")
}

pub fn object(value: serde_json::Value) -> JsonObject {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}
