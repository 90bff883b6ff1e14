//! Tool registry adapters
//!
//! Tools are never executed here; the registry only supplies the
//! `(description, content)` pair that export bundles embed.

mod registry;

pub use registry::{DirectoryToolRegistry, ToolRegistryError};
