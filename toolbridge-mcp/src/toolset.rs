//! The lifecycle controller for one MCP server connection.
//!
//! [`McpToolset`] owns the state machine:
//!
//! ```text
//! Created ──connect──▶ Connecting ──ok──▶ Connected ──disconnect──▶ Disconnecting ──▶ Disconnected
//!    ▲                     │                  │  ▲                                          │
//!    └───────failure───────┘                  └──┘ refresh_tools                            │
//!                          ▲                                                                │
//!                          └──────────────────────────connect───────────────────────────────┘
//! ```
//!
//! The live client and the descriptor cache live inside the `Connected`
//! variant, so a toolset that holds a client while not connected cannot be
//! expressed. `connect`, `disconnect` and `refresh_tools` are serialised by
//! a per-instance async mutex; state reads never wait on it.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use parking_lot::RwLock;
use toolbridge_types::{ToolDyn, ToolError, Toolset};

use crate::cache::ToolCache;
use crate::client::{ClientFactory, McpClient};
use crate::config::{LocalServerParams, McpToolsetConfig, RemoteServerParams};
use crate::error::ToolsetError;
use crate::format::format_content;
use crate::types::{ConnectionState, JsonObject, ToolDescriptor};
use crate::wrapper::McpToolWrapper;

/// A connected client together with the tools it advertised.
struct Session {
    client: Arc<dyn McpClient>,
    cache: ToolCache,
}

enum Phase {
    Created,
    Connecting,
    Connected(Session),
    Disconnecting,
    Disconnected,
}

impl Phase {
    fn state(&self) -> ConnectionState {
        match self {
            Self::Created => ConnectionState::Created,
            Self::Connecting => ConnectionState::Connecting,
            Self::Connected(_) => ConnectionState::Connected,
            Self::Disconnecting => ConnectionState::Disconnecting,
            Self::Disconnected => ConnectionState::Disconnected,
        }
    }
}

struct Shared {
    name: String,
    factory: Box<dyn ClientFactory>,
    lifecycle: tokio::sync::Mutex<()>,
    phase: RwLock<Phase>,
}

impl Shared {
    /// Swap in `next` and return the previous phase.
    fn replace_phase(&self, next: Phase) -> Phase {
        let mut phase = self.phase.write();
        tracing::debug!(
            toolset = %self.name,
            from = %phase.state(),
            to = %next.state(),
            "toolset state transition"
        );
        std::mem::replace(&mut *phase, next)
    }
}

/// Puts the toolset back into an idle phase if a transition is abandoned
/// halfway, for instance because the caller dropped the `connect()` future.
struct PendingTransition<'a> {
    shared: &'a Shared,
    fallback: Option<Phase>,
}

impl<'a> PendingTransition<'a> {
    fn new(shared: &'a Shared, fallback: Phase) -> Self {
        Self {
            shared,
            fallback: Some(fallback),
        }
    }

    fn finish(mut self, next: Phase) {
        self.fallback = None;
        self.shared.replace_phase(next);
    }
}

impl Drop for PendingTransition<'_> {
    fn drop(&mut self) {
        if let Some(fallback) = self.fallback.take() {
            self.shared.replace_phase(fallback);
        }
    }
}

/// A lifecycle-managed set of tools served by one MCP server.
///
/// Cloning is cheap; clones share the same connection and state. Wrappers
/// returned by [`get_tools`](Self::get_tools) hold such a clone and resolve
/// the live client on every call, so they keep working across
/// [`refresh_tools`](Self::refresh_tools) and fail with
/// [`ToolsetError::NotConnected`] after [`disconnect`](Self::disconnect).
#[derive(Clone)]
pub struct McpToolset {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for McpToolset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpToolset")
            .field("name", &self.shared.name)
            .field("state", &self.state())
            .finish()
    }
}

impl McpToolset {
    /// A toolset whose clients come from `factory`.
    ///
    /// Nothing is constructed until [`connect`](Self::connect).
    #[must_use]
    pub fn with_factory(name: impl Into<String>, factory: impl ClientFactory + 'static) -> Self {
        Self {
            shared: Arc::new(Shared {
                name: name.into(),
                factory: Box::new(factory),
                lifecycle: tokio::sync::Mutex::new(()),
                phase: RwLock::new(Phase::Created),
            }),
        }
    }

    /// A toolset backed by a server spawned as a child process.
    #[must_use]
    pub fn local(name: impl Into<String>, params: LocalServerParams) -> Self {
        Self::with_factory(name, params)
    }

    /// A toolset backed by a streamable HTTP server.
    #[must_use]
    pub fn remote(name: impl Into<String>, params: RemoteServerParams) -> Self {
        Self::with_factory(name, params)
    }

    /// A toolset from a loaded configuration entry.
    #[must_use]
    pub fn from_config(config: McpToolsetConfig) -> Self {
        Self::with_factory(config.name, config.server)
    }

    /// The toolset name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.shared.phase.read().state()
    }

    /// Whether the toolset is connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Connect to the server and fetch its tool list.
    ///
    /// Returns immediately if already connected. The toolset only becomes
    /// `Connected` once the tool list is cached.
    ///
    /// # Errors
    ///
    /// [`ToolsetError::Connect`] if the client cannot be built or connected,
    /// [`ToolsetError::Protocol`] if the initial tool listing fails. In both
    /// cases the toolset is back in `Created` and the client is discarded.
    ///
    /// Dropping the returned future mid-handshake also restores `Created`.
    /// The half-connected client is then dropped without
    /// [`McpClient::disconnect`], so releasing its transport is up to the
    /// client's own `Drop`.
    pub async fn connect(&self) -> Result<(), ToolsetError> {
        let _lifecycle = self.shared.lifecycle.lock().await;
        if self.is_connected() {
            return Ok(());
        }

        self.shared.replace_phase(Phase::Connecting);
        let pending = PendingTransition::new(&self.shared, Phase::Created);
        let session = self.open_session().await?;
        pending.finish(Phase::Connected(session));
        Ok(())
    }

    async fn open_session(&self) -> Result<Session, ToolsetError> {
        let client = self
            .shared
            .factory
            .create_client()
            .map_err(ToolsetError::Connect)?;
        client.connect().await.map_err(ToolsetError::Connect)?;

        match client.list_tools().await {
            Ok(descriptors) => {
                tracing::debug!(
                    toolset = %self.shared.name,
                    tool_count = descriptors.len(),
                    "fetched tool list"
                );
                Ok(Session {
                    client,
                    cache: ToolCache::new(descriptors),
                })
            }
            Err(err) => {
                if let Err(teardown) = client.disconnect().await {
                    tracing::warn!(
                        toolset = %self.shared.name,
                        error = %teardown,
                        "failed to tear down client after tool listing failed"
                    );
                }
                Err(ToolsetError::Protocol(err))
            }
        }
    }

    /// Close the connection and drop the cached tools.
    ///
    /// A no-op unless connected. Local state is cleared even if the client
    /// fails to disconnect, so the toolset can always be reconnected.
    ///
    /// # Errors
    ///
    /// [`ToolsetError::Disconnect`] if the client reported a failure. The
    /// toolset is `Disconnected` regardless.
    pub async fn disconnect(&self) -> Result<(), ToolsetError> {
        let _lifecycle = self.shared.lifecycle.lock().await;
        if !self.is_connected() {
            return Ok(());
        }

        let session = match self.shared.replace_phase(Phase::Disconnecting) {
            Phase::Connected(session) => session,
            idle => {
                self.shared.replace_phase(idle);
                return Ok(());
            }
        };
        let pending = PendingTransition::new(&self.shared, Phase::Disconnected);
        let Session { client, cache } = session;
        drop(cache);
        let result = client.disconnect().await;
        drop(client);
        pending.finish(Phase::Disconnected);

        result.map_err(|err| {
            tracing::warn!(
                toolset = %self.shared.name,
                error = %err,
                "client disconnect failed; local state cleared"
            );
            ToolsetError::Disconnect(err)
        })
    }

    /// Re-fetch the server's tool list and replace the cache.
    ///
    /// The new list replaces the old one wholesale. If listing fails the
    /// previous cache stays in place.
    ///
    /// # Errors
    ///
    /// [`ToolsetError::NotConnected`] if not connected,
    /// [`ToolsetError::Protocol`] if the server listing fails.
    pub async fn refresh_tools(&self) -> Result<(), ToolsetError> {
        let _lifecycle = self.shared.lifecycle.lock().await;
        let client = self.live_client()?;
        let descriptors = client
            .list_tools()
            .await
            .map_err(ToolsetError::Protocol)?;

        tracing::debug!(
            toolset = %self.shared.name,
            tool_count = descriptors.len(),
            "refreshed tool list"
        );
        if let Phase::Connected(session) = &mut *self.shared.phase.write() {
            session.cache = ToolCache::new(descriptors);
        }
        Ok(())
    }

    /// One wrapper per cached tool, in server order.
    ///
    /// # Errors
    ///
    /// [`ToolsetError::NotConnected`] if not connected.
    pub fn get_tools(&self) -> Result<Vec<McpToolWrapper>, ToolsetError> {
        self.wrappers(false)
    }

    /// Like [`get_tools`](Self::get_tools), but each wrapper is exposed as
    /// `<toolset>__<tool>`. Calls still use the server's tool name.
    ///
    /// # Errors
    ///
    /// [`ToolsetError::NotConnected`] if not connected.
    pub fn get_tools_namespaced(&self) -> Result<Vec<McpToolWrapper>, ToolsetError> {
        self.wrappers(true)
    }

    fn wrappers(&self, namespaced: bool) -> Result<Vec<McpToolWrapper>, ToolsetError> {
        let cache = self.cache()?;
        Ok(cache
            .iter()
            .map(|descriptor| {
                let exposed = if namespaced {
                    self.format_tool_name(&descriptor.name)
                } else {
                    descriptor.name.clone()
                };
                McpToolWrapper::new(self.clone(), exposed, descriptor)
            })
            .collect())
    }

    /// The cached descriptors.
    ///
    /// # Errors
    ///
    /// [`ToolsetError::NotConnected`] if not connected.
    pub fn descriptors(&self) -> Result<Arc<[ToolDescriptor]>, ToolsetError> {
        Ok(self.cache()?.snapshot())
    }

    /// Connect, run `body`, then disconnect.
    ///
    /// `disconnect()` runs whether `body` succeeds, fails or panics; a panic
    /// is resumed once the toolset is closed. When both `body` and the
    /// disconnect fail, the error from `body` is returned.
    ///
    /// ```ignore
    /// let names = toolset
    ///     .with_connection(|ts| async move {
    ///         let tools = ts.get_tools()?;
    ///         Ok::<_, ToolsetError>(tools.iter().map(|t| t.name().to_owned()).collect::<Vec<_>>())
    ///     })
    ///     .await?;
    /// ```
    ///
    /// # Errors
    ///
    /// Connect failures, the body's error, or a disconnect failure.
    pub async fn with_connection<F, Fut, T, E>(&self, body: F) -> Result<T, E>
    where
        F: FnOnce(McpToolset) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<ToolsetError>,
    {
        self.connect().await?;

        let toolset = self.clone();
        let outcome = AssertUnwindSafe(async move { body(toolset).await })
            .catch_unwind()
            .await;
        let closed = self.disconnect().await;

        match outcome {
            Err(panic) => std::panic::resume_unwind(panic),
            Ok(Err(err)) => Err(err),
            Ok(Ok(value)) => {
                closed?;
                Ok(value)
            }
        }
    }

    /// Invoke a tool on the live client and format its result.
    pub(crate) async fn call_tool(
        &self,
        name: &str,
        arguments: JsonObject,
    ) -> Result<String, ToolsetError> {
        let client = self.live_client()?;
        tracing::debug!(toolset = %self.shared.name, tool = name, "calling tool");
        let blocks = client
            .call_tool(name, arguments)
            .await
            .map_err(ToolsetError::Protocol)?;
        Ok(format_content(&blocks))
    }

    fn live_client(&self) -> Result<Arc<dyn McpClient>, ToolsetError> {
        match &*self.shared.phase.read() {
            Phase::Connected(session) => Ok(Arc::clone(&session.client)),
            _ => Err(self.not_connected()),
        }
    }

    fn cache(&self) -> Result<ToolCache, ToolsetError> {
        match &*self.shared.phase.read() {
            Phase::Connected(session) => Ok(session.cache.clone()),
            _ => Err(self.not_connected()),
        }
    }

    fn not_connected(&self) -> ToolsetError {
        ToolsetError::NotConnected {
            toolset: self.shared.name.clone(),
        }
    }
}

impl Toolset for McpToolset {
    fn name(&self) -> &str {
        &self.shared.name
    }

    fn tools(&self, namespaced: bool) -> Result<Vec<Arc<dyn ToolDyn>>, ToolError> {
        let wrappers = self
            .wrappers(namespaced)
            .map_err(|e| ToolError::Unavailable(Box::new(e)))?;
        Ok(wrappers
            .into_iter()
            .map(|w| Arc::new(w) as Arc<dyn ToolDyn>)
            .collect())
    }
}
