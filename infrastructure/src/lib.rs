//! Infrastructure layer for teamforge
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod export;
pub mod logging;
pub mod providers;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigLoader, ConfigValidationError, FileConfig, FileDiscussionConfig,
    FileExportConfig, FileLoggingConfig, FileOutputConfig, FileProviderConfig,
    FileReplConfig, FileToolsConfig,
};
pub use export::{DirectoryExporter, SqliteExportStore, StoreError};
pub use logging::JsonlConversationLogger;
pub use providers::RoutingGateway;
pub use tools::{DirectoryToolRegistry, ToolRegistryError};
