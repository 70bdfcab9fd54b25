//! Host-side tool collection for toolbridge.
//!
//! This crate provides:
//! - [`ToolRegistry`]: register tools or whole toolsets and execute them by name
//! - [`NativeToolset`]: a named group of in-process typed tools

pub mod native;
pub mod registry;

pub use native::*;
pub use registry::*;
