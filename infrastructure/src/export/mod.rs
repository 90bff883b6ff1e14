//! Export sinks: bundle directory trees and the SQLite telemetry store.

mod directory;
mod sqlite;

pub use directory::DirectoryExporter;
pub use sqlite::{SqliteExportStore, StoreError, StoredRecord};
