//! Configuration file loading for teamforge
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TEAMFORGE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./teamforge.toml` or `./.teamforge.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/teamforge/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileDiscussionConfig, FileExportConfig, FileLoggingConfig,
    FileOutputConfig, FileProviderConfig, FileProviderSettings, FileReplConfig,
    FileToolsConfig,
};
pub use loader::{ConfigError, ConfigLoader};
