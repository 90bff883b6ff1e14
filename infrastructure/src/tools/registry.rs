//! Directory-backed tool registry
//!
//! Every regular file in a directory is one tool:
//!
//! - name: the file stem, normalized (`Fetch-Web.py` becomes `fetch_web`)
//! - description: the first comment or docstring line of the file
//! - content: the file text
//!
//! Files that cannot be read as UTF-8 are skipped with a warning.

use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use teamforge_application::ports::tool_registry::ToolRegistry;
use teamforge_domain::ToolDefinition;
use thiserror::Error;
use tracing::{debug, warn};

/// A `#`/`//` comment or a one-line `"""`/`'''` docstring
static DESCRIPTION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(?:#|//+|"""|''')\s*(.*?)\s*(?:"""|''')?\s*$"#).expect("valid regex")
});

#[derive(Error, Debug)]
pub enum ToolRegistryError {
    #[error("Failed to read tool directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Tools loaded from a directory, keyed by normalized name
#[derive(Debug, Clone, Default)]
pub struct DirectoryToolRegistry {
    tools: BTreeMap<String, ToolDefinition>,
}

impl DirectoryToolRegistry {
    /// Load every regular file in `dir`.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ToolRegistryError> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|source| ToolRegistryError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut tools = BTreeMap::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(tool) = Self::load_file(&path) else {
                continue;
            };
            if let Some(previous) = tools.insert(tool.name.clone(), tool) {
                warn!(tool = %previous.name, "Duplicate tool name, keeping {}", path.display());
            }
        }

        debug!(count = tools.len(), dir = %dir.display(), "Loaded tools");
        Ok(Self { tools })
    }

    fn load_file(path: &Path) -> Option<ToolDefinition> {
        let stem = path.file_stem()?.to_string_lossy();
        let name = ToolDefinition::normalize_name(&stem);
        if name.is_empty() {
            warn!("Skipping tool file with unusable name: {}", path.display());
            return None;
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Skipping unreadable tool file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(ToolDefinition::new(name, describe(&content), content))
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// First non-empty comment or docstring line, or empty
fn describe(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with("#!"))
        .filter_map(|line| DESCRIPTION_LINE.captures(line))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim().to_string()))
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

impl ToolRegistry for DirectoryToolRegistry {
    fn lookup(&self, name: &str) -> Option<ToolDefinition> {
        self.tools.get(&ToolDefinition::normalize_name(name)).cloned()
    }

    fn list(&self) -> Vec<ToolDefinition> {
        self.tools.values().cloned().collect()
    }
}
