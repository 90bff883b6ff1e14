//! Export, tool and logging configuration from TOML
//! (`[export]`, `[tools]` and `[logging]` sections)

use serde::{Deserialize, Serialize};

/// Where export bundles go (`[export]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExportConfig {
    /// Root directory for the graph and crew bundle trees
    pub dir: String,
    /// Optional SQLite telemetry database
    pub sqlite: Option<String>,
}

impl Default for FileExportConfig {
    fn default() -> Self {
        Self {
            dir: "teamforge-export".to_string(),
            sqlite: None,
        }
    }
}

/// Tool registry location (`[tools]`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// Directory whose files are loaded as tools
    pub dir: Option<String>,
}

/// Log destinations (`[logging]`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of the discussion
    pub conversation_log: Option<String>,
    /// Directory for daily rolling diagnostic logs
    pub dir: Option<String>,
}
