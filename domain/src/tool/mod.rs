//! Tool domain module
//!
//! Tools are external capabilities identified by name. Agents carry tool
//! names; the registry port resolves them to [`ToolDefinition`]s at export.

pub mod entities;

pub use entities::ToolDefinition;
