#![deny(missing_docs)]
//! Expose the tools of an MCP server as toolbridge tools.
//!
//! [`McpToolset`] owns one connection to one MCP server. It connects through
//! a pluggable [`ClientFactory`], caches the server's tool descriptors, and
//! hands out [`McpToolWrapper`]s that the host can call like any other
//! [`ToolDyn`](toolbridge_types::ToolDyn).
//!
//! ```ignore
//! let toolset = McpToolset::local("fs", LocalServerParams::new("npx")
//!     .arg("-y")
//!     .arg("@modelcontextprotocol/server-filesystem")
//!     .arg("/tmp"));
//!
//! toolset.connect().await?;
//! for tool in toolset.get_tools()? {
//!     println!("{}: {}", tool.name(), tool.description());
//! }
//! toolset.disconnect().await?;
//! ```
//!
//! The rmcp-backed [`RmcpClient`] covers local (child process over stdio)
//! and remote (streamable HTTP) servers. Anything else can plug in by
//! implementing [`McpClient`].

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod rmcp_client;
pub mod toolset;
pub mod types;
pub mod wrapper;

pub use cache::ToolCache;
pub use client::{ClientFactory, McpClient};
pub use config::{LocalServerParams, McpToolsetConfig, RemoteServerParams, ServerParams};
pub use error::{McpError, ToolsetError};
pub use format::format_content;
pub use rmcp_client::RmcpClient;
pub use toolset::McpToolset;
pub use types::{ConnectionState, ContentBlock, JsonObject, ToolDescriptor};
pub use wrapper::McpToolWrapper;
