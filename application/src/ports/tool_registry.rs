//! Tool registry port
//!
//! Tools are external capabilities. The core only looks them up by name
//! and exports their `(description, content)` pair.

use teamforge_domain::ToolDefinition;

/// Lookup of registered tools
pub trait ToolRegistry: Send + Sync {
    /// Find a tool by name (names are compared after normalization)
    fn lookup(&self, name: &str) -> Option<ToolDefinition>;

    /// Every registered tool, sorted by name
    fn list(&self) -> Vec<ToolDefinition>;
}

/// Registry with no tools
pub struct NoTools;

impl ToolRegistry for NoTools {
    fn lookup(&self, _name: &str) -> Option<ToolDefinition> {
        None
    }

    fn list(&self) -> Vec<ToolDefinition> {
        Vec::new()
    }
}
