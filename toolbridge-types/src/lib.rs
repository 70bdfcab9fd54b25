#![deny(missing_docs)]
//! The tool-calling contract a host SDK exposes to its model loop.
//!
//! Everything a tool source has to produce lives here:
//!
//! - [`ToolDyn`] is the type-erased tool the host dispatches to.
//! - [`Tool`] is the strongly-typed flavour, blanket-implemented as [`ToolDyn`].
//! - [`Toolset`] is a named source of tools (native or remote).
//!
//! Tool sources such as `toolbridge-mcp` depend only on this crate, never on
//! the host's dispatch machinery.

pub mod error;
pub mod traits;
pub mod types;

pub use error::*;
pub use traits::*;
pub use types::*;
