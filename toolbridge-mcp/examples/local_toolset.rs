//! Connect to a local MCP server, register its tools, and call one.
//!
//! Requires Node.js and `npx` on your PATH:
//!
//! ```sh
//! RUST_LOG=toolbridge_mcp=debug cargo run --example local_toolset -p toolbridge-mcp
//! ```
//!
//! The example spawns `npx -y @modelcontextprotocol/server-everything` as a
//! child process.

use serde_json::json;
use toolbridge_mcp::{LocalServerParams, McpToolset};
use toolbridge_tool::ToolRegistry;
use toolbridge_types::ToolContext;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let toolset = McpToolset::local(
        "everything",
        LocalServerParams::new("npx")
            .arg("-y")
            .arg("@modelcontextprotocol/server-everything"),
    );

    toolset
        .with_connection(|toolset| async move {
            let mut registry = ToolRegistry::new();
            let count = registry.register_toolset(&toolset, true)?;
            println!("Registered {count} tool(s):");
            for def in registry.definitions() {
                println!("  [{}] {}", def.name, def.description);
            }

            let output = registry
                .execute(
                    "everything__echo",
                    json!({"message": "hello from toolbridge"}),
                    &ToolContext::default(),
                )
                .await?;
            println!("\necho -> {}", output.text_content());

            Ok::<_, Box<dyn std::error::Error + Send + Sync>>(())
        })
        .await?;

    Ok(())
}

