//! [`McpClient`] backed by the `rmcp` SDK.
//!
//! Local servers are spawned as child processes and spoken to over stdio.
//! Remote servers are reached over streamable HTTP.

use std::borrow::Cow;

use async_trait::async_trait;
use rmcp::ServiceExt;
use rmcp::model::{CallToolRequestParams, CallToolResult, Content, RawContent, Tool as RmcpTool};
use rmcp::service::{Peer, RoleClient, RunningService};
use rmcp::transport::child_process::TokioChildProcess;
use rmcp::transport::streamable_http_client::{
    StreamableHttpClientTransport, StreamableHttpClientTransportConfig,
};
use tokio::sync::Mutex;
use toolbridge_types::ToolAnnotations;

use crate::client::McpClient;
use crate::config::{LocalServerParams, RemoteServerParams, ServerParams};
use crate::error::{McpError, from_client_init_error, from_service_error};
use crate::format::format_content;
use crate::types::{ContentBlock, JsonObject, ToolDescriptor};

/// An MCP client over an rmcp running service.
pub struct RmcpClient {
    server: ServerParams,
    service: Mutex<Option<RunningService<RoleClient, ()>>>,
}

impl RmcpClient {
    /// A client for `server`. Nothing is spawned or dialed until
    /// [`connect`](McpClient::connect).
    #[must_use]
    pub fn new(server: impl Into<ServerParams>) -> Self {
        Self {
            server: server.into(),
            service: Mutex::new(None),
        }
    }

    async fn peer(&self) -> Result<Peer<RoleClient>, McpError> {
        self.service
            .lock()
            .await
            .as_ref()
            .map(|service| service.peer().clone())
            .ok_or_else(|| McpError::Connection("client is not connected".into()))
    }
}

impl std::fmt::Debug for RmcpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RmcpClient")
            .field("server", &self.server)
            .finish_non_exhaustive()
    }
}

async fn serve_local(params: &LocalServerParams) -> Result<RunningService<RoleClient, ()>, McpError> {
    let transport = TokioChildProcess::new(params.command())
        .map_err(|e| McpError::Connection(format!("failed to spawn {}: {e}", params.command)))?;
    ().serve(transport).await.map_err(from_client_init_error)
}

async fn serve_remote(
    params: &RemoteServerParams,
) -> Result<RunningService<RoleClient, ()>, McpError> {
    let mut config = StreamableHttpClientTransportConfig::with_uri(params.url.clone());
    if let Some(token) = &params.auth_token {
        config = config.auth_header(token.clone());
    }
    let transport = StreamableHttpClientTransport::from_config(config);
    ().serve(transport).await.map_err(from_client_init_error)
}

#[async_trait]
impl McpClient for RmcpClient {
    async fn connect(&self) -> Result<(), McpError> {
        let mut service = self.service.lock().await;
        if service.is_some() {
            return Ok(());
        }
        let running = match &self.server {
            ServerParams::Local(params) => serve_local(params).await?,
            ServerParams::Remote(params) => serve_remote(params).await?,
        };
        if let Some(info) = running.peer().peer_info() {
            tracing::debug!(
                server = %info.server_info.name,
                version = %info.server_info.version,
                "mcp handshake complete"
            );
        }
        *service = Some(running);
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), McpError> {
        let Some(service) = self.service.lock().await.take() else {
            return Ok(());
        };
        service
            .cancel()
            .await
            .map(|_| ())
            .map_err(|e| McpError::Transport(e.to_string()))
    }

    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, McpError> {
        let peer = self.peer().await?;
        let tools = peer.list_all_tools().await.map_err(from_service_error)?;
        Ok(tools.iter().map(descriptor_from_rmcp).collect())
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: JsonObject,
    ) -> Result<Vec<ContentBlock>, McpError> {
        let peer = self.peer().await?;
        let params = CallToolRequestParams {
            meta: None,
            name: Cow::Owned(name.to_string()),
            arguments: Some(arguments),
            task: None,
        };
        let result = peer.call_tool(params).await.map_err(from_service_error)?;
        blocks_from_result(result)
    }
}

fn descriptor_from_rmcp(tool: &RmcpTool) -> ToolDescriptor {
    let annotations = tool.annotations.as_ref().map(|a| ToolAnnotations {
        read_only_hint: a.read_only_hint,
        destructive_hint: a.destructive_hint,
        idempotent_hint: a.idempotent_hint,
        open_world_hint: a.open_world_hint,
    });
    let title = tool
        .title
        .clone()
        .or_else(|| tool.annotations.as_ref().and_then(|a| a.title.clone()));

    ToolDescriptor {
        name: tool.name.to_string(),
        title,
        description: tool.description.as_ref().map(ToString::to_string),
        input_schema: serde_json::Value::Object((*tool.input_schema).clone()),
        output_schema: tool
            .output_schema
            .as_ref()
            .map(|schema| serde_json::Value::Object((**schema).clone())),
        annotations,
    }
}

fn block_from_content(content: &Content) -> ContentBlock {
    match &content.raw {
        RawContent::Text(text) => ContentBlock::Text(text.text.clone()),
        _ => ContentBlock::Structured(to_json_or_error(content)),
    }
}

/// A block that cannot be re-encoded is kept as `{"error": ...}` so it still
/// shows up in the formatted result.
fn to_json_or_error<T: serde::Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to encode MCP content block");
        serde_json::json!({ "error": format!("unencodable content: {e}") })
    })
}

/// Whether `structured` is already present among `blocks`, either as a
/// structured block or as a text block holding the same JSON.
fn carries_structured(blocks: &[ContentBlock], structured: &serde_json::Value) -> bool {
    blocks.iter().any(|block| match block {
        ContentBlock::Structured(value) => value == structured,
        ContentBlock::Text(text) => {
            serde_json::from_str::<serde_json::Value>(text).is_ok_and(|value| &value == structured)
        }
    })
}

/// Server-reported failures (`isError: true`) become [`McpError::ToolCall`]
/// carrying the formatted content, so callers see the server's message.
///
/// `structuredContent` is appended as a final block unless the content list
/// already carries it.
fn blocks_from_result(result: CallToolResult) -> Result<Vec<ContentBlock>, McpError> {
    let mut blocks: Vec<ContentBlock> = result.content.iter().map(block_from_content).collect();
    if let Some(structured) = result.structured_content {
        if !carries_structured(&blocks, &structured) {
            blocks.push(ContentBlock::Structured(structured));
        }
    }
    if result.is_error == Some(true) {
        return Err(McpError::ToolCall(format_content(&blocks)));
    }
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn rmcp_tool(name: &str, description: Option<&str>) -> RmcpTool {
        let schema = json!({"type": "object", "properties": {"path": {"type": "string"}}});
        RmcpTool {
            name: Cow::Owned(name.to_string()),
            title: None,
            description: description.map(|d| Cow::Owned(d.to_string())),
            input_schema: Arc::new(schema.as_object().unwrap().clone()),
            output_schema: None,
            annotations: None,
            execution: None,
            icons: None,
            meta: None,
        }
    }

    #[test]
    fn descriptor_keeps_schema_verbatim() {
        let d = descriptor_from_rmcp(&rmcp_tool("read_file", Some("Read a file")));
        assert_eq!(d.name, "read_file");
        assert_eq!(d.description.as_deref(), Some("Read a file"));
        assert_eq!(
            d.input_schema,
            json!({"type": "object", "properties": {"path": {"type": "string"}}})
        );
        assert!(d.annotations.is_none());
    }

    #[test]
    fn descriptor_without_description() {
        let d = descriptor_from_rmcp(&rmcp_tool("noop", None));
        assert!(d.description.is_none());
        assert!(d.title.is_none());
    }

    #[test]
    fn text_content_becomes_text_block() {
        let block = block_from_content(&Content::text("hello"));
        assert_eq!(block, ContentBlock::Text("hello".into()));
    }

    #[test]
    fn success_result_keeps_block_order() {
        let result = CallToolResult::success(vec![Content::text("a"), Content::text("b")]);
        let blocks = blocks_from_result(result).unwrap();
        assert_eq!(
            blocks,
            vec![ContentBlock::Text("a".into()), ContentBlock::Text("b".into())]
        );
    }

    #[test]
    fn structured_only_result_is_not_lost() {
        let result = CallToolResult {
            content: vec![],
            structured_content: Some(json!({"sum": 5})),
            is_error: Some(false),
            meta: None,
        };
        let blocks = blocks_from_result(result).unwrap();
        assert_eq!(blocks, vec![ContentBlock::Structured(json!({"sum": 5}))]);
        assert_eq!(format_content(&blocks), r#"{"sum":5}"#);
    }

    #[test]
    fn structured_result_mirrored_in_text_is_not_repeated() {
        let result = CallToolResult::structured(json!({"sum": 5}));
        let blocks = blocks_from_result(result).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(format_content(&blocks), r#"{"sum":5}"#);
    }

    #[test]
    fn structured_error_reaches_the_caller() {
        let result = CallToolResult {
            content: vec![Content::text("out of range")],
            structured_content: Some(json!({"code": "RANGE"})),
            is_error: Some(true),
            meta: None,
        };
        match blocks_from_result(result).unwrap_err() {
            McpError::ToolCall(msg) => assert_eq!(msg, "out of range\n{\"code\":\"RANGE\"}"),
            other => panic!("expected ToolCall, got {other:?}"),
        }
    }

    #[test]
    fn descriptor_keeps_output_schema() {
        let mut tool = rmcp_tool("add", None);
        let schema = json!({"type": "object", "properties": {"sum": {"type": "integer"}}});
        tool.output_schema = Some(Arc::new(schema.as_object().unwrap().clone()));
        let d = descriptor_from_rmcp(&tool);
        assert_eq!(d.output_schema, Some(schema));
        assert!(descriptor_from_rmcp(&rmcp_tool("add", None)).output_schema.is_none());
    }

    #[test]
    fn unencodable_block_is_reported_not_dropped() {
        // JSON object keys must be strings.
        let mut bad = std::collections::BTreeMap::new();
        bad.insert(vec![1u8, 2], 3);
        let value = to_json_or_error(&bad);
        let message = value["error"].as_str().unwrap();
        assert!(message.starts_with("unencodable content: "));
        assert_ne!(value, serde_json::Value::Null);
    }

    #[test]
    fn error_result_becomes_tool_call_error() {
        let result = CallToolResult::error(vec![Content::text("no such file")]);
        let err = blocks_from_result(result).unwrap_err();
        match err {
            McpError::ToolCall(msg) => assert_eq!(msg, "no such file"),
            other => panic!("expected ToolCall, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unconnected_client_refuses_calls() {
        let client = RmcpClient::new(LocalServerParams::new("echo"));
        let err = client.list_tools().await.unwrap_err();
        assert!(matches!(err, McpError::Connection(_)));
        // Disconnecting a client that never connected is fine.
        client.disconnect().await.unwrap();
    }

    /// Connects to the reference "everything" server. Requires `npx`.
    #[tokio::test]
    #[ignore]
    async fn integration_connect_and_list() {
        let client = RmcpClient::new(
            LocalServerParams::new("npx")
                .arg("-y")
                .arg("@modelcontextprotocol/server-everything"),
        );
        client.connect().await.unwrap();
        let tools = client.list_tools().await.unwrap();
        assert!(tools.iter().any(|t| t.name == "echo"));
        client.disconnect().await.unwrap();
    }
}
