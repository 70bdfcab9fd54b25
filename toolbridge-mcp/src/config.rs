//! Server connection parameters.
//!
//! These are plain serde types so a host can keep its MCP servers in its own
//! configuration file:
//!
//! ```toml
//! [[mcp]]
//! name = "fs"
//! transport = "local"
//! command = "npx"
//! args = ["-y", "@modelcontextprotocol/server-filesystem", "/tmp"]
//!
//! [[mcp]]
//! name = "search"
//! transport = "remote"
//! url = "http://localhost:8080/mcp"
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::client::{ClientFactory, McpClient};
use crate::error::McpError;
use crate::rmcp_client::RmcpClient;

/// Spawn an MCP server as a child process and talk to it over stdio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalServerParams {
    /// The command to spawn.
    pub command: String,
    /// Arguments to pass to the command.
    #[serde(default)]
    pub args: Vec<String>,
    /// Environment variables to set.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// Working directory for the child process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
}

impl LocalServerParams {
    /// Parameters for `command` with no arguments.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            cwd: None,
        }
    }

    /// Append an argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Set an environment variable.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set the working directory.
    #[must_use]
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub(crate) fn command(&self) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.command);
        cmd.args(&self.args);
        cmd.envs(&self.env);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        cmd
    }
}

/// Connect to an MCP server over streamable HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteServerParams {
    /// The server endpoint (e.g. `http://localhost:8080/mcp`).
    pub url: String,
    /// Bearer token sent as the `Authorization` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

impl RemoteServerParams {
    /// Parameters for an unauthenticated endpoint.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            auth_token: None,
        }
    }

    /// Send `token` as a bearer token.
    #[must_use]
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }
}

/// Either kind of server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "transport", rename_all = "snake_case")]
pub enum ServerParams {
    /// Child process over stdio.
    Local(LocalServerParams),
    /// Streamable HTTP.
    Remote(RemoteServerParams),
}

impl From<LocalServerParams> for ServerParams {
    fn from(params: LocalServerParams) -> Self {
        Self::Local(params)
    }
}

impl From<RemoteServerParams> for ServerParams {
    fn from(params: RemoteServerParams) -> Self {
        Self::Remote(params)
    }
}

/// A named MCP server entry, as a host would load it from config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpToolsetConfig {
    /// Toolset name, also the namespace prefix for its tools.
    pub name: String,
    /// How to reach the server.
    #[serde(flatten)]
    pub server: ServerParams,
}

impl ClientFactory for ServerParams {
    fn create_client(&self) -> Result<Arc<dyn McpClient>, McpError> {
        match self {
            Self::Local(params) => params.create_client(),
            Self::Remote(params) => params.create_client(),
        }
    }
}

impl ClientFactory for LocalServerParams {
    fn create_client(&self) -> Result<Arc<dyn McpClient>, McpError> {
        if self.command.trim().is_empty() {
            return Err(McpError::Connection("empty server command".into()));
        }
        Ok(Arc::new(RmcpClient::new(self.clone())))
    }
}

impl ClientFactory for RemoteServerParams {
    fn create_client(&self) -> Result<Arc<dyn McpClient>, McpError> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(McpError::Connection(format!(
                "unsupported server url: {}",
                self.url
            )));
        }
        Ok(Arc::new(RmcpClient::new(self.clone())))
    }
}
