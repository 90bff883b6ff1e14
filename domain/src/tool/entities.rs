//! Tool domain entities

use crate::core::sanitize::file_stem;
use serde::{Deserialize, Serialize};

/// An externally registered capability an agent may reference by name.
///
/// The core never executes tools. It only needs the name for lookup and the
/// `(description, content)` pair for export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "fetch_web_content")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Source text of the tool
    pub content: String,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            content: content.into(),
        }
    }

    /// Tool name normalized for use as a lookup key and file stem
    pub fn normalize_name(raw: &str) -> String {
        file_stem(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(ToolDefinition::normalize_name("Fetch Web-Content"), "fetch_web_content");
        assert_eq!(ToolDefinition::normalize_name("get_weather"), "get_weather");
    }
}
