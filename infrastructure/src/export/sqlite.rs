//! SQLite telemetry store for export bundles.
//!
//! Every export appends rows; nothing is updated or deleted. Each of the
//! three tables has the same shape:
//!
//! | column     | content                         |
//! |------------|---------------------------------|
//! | id         | uuid v4, primary key            |
//! | created_at | RFC3339 timestamp               |
//! | name       | agent, skill or workflow name   |
//! | config     | the exported document as JSON   |

use chrono::Utc;
use rusqlite::{Connection, params};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use teamforge_application::ports::export_sink::{
    ExportBundle, ExportReceipt, ExportSink, ExportSinkError,
};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Tables written by the store
pub const TABLES: [&str; 3] = ["agents", "skills", "workflows"];

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to create database directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Database connection is poisoned")]
    Poisoned,
}

impl From<StoreError> for ExportSinkError {
    fn from(e: StoreError) -> Self {
        ExportSinkError::Store(e.to_string())
    }
}

/// One stored row
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: String,
    pub created_at: String,
    pub name: String,
    pub config: String,
}

pub struct SqliteExportStore {
    conn: Mutex<Connection>,
    location: String,
}

impl SqliteExportStore {
    /// Open (or create) the database at `path` and initialize the schema
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::with_connection(conn, path.display().to_string())
    }

    /// In-memory database (for testing)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?, ":memory:".to_string())
    }

    fn with_connection(conn: Connection, location: String) -> Result<Self, StoreError> {
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            location,
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        for table in TABLES {
            conn.execute_batch(&format!(
                r#"
                CREATE TABLE IF NOT EXISTS {table} (
                    id TEXT PRIMARY KEY,
                    created_at TEXT NOT NULL,
                    name TEXT NOT NULL,
                    config TEXT NOT NULL
                );
                "#
            ))?;
        }
        Ok(())
    }

    /// Store every document of `bundle` in one transaction
    pub fn insert_bundle(&self, bundle: &ExportBundle) -> Result<usize, StoreError> {
        let mut conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let tx = conn.transaction()?;
        let created_at = Utc::now().to_rfc3339();
        let mut rows = 0;

        for named in &bundle.graph_agents {
            rows += insert(&tx, "agents", &created_at, &named.document.config.name, &named.document)?;
        }
        for named in &bundle.skills {
            rows += insert(&tx, "skills", &created_at, &named.document.title, &named.document)?;
        }
        let workflow = &bundle.workflow.document;
        rows += insert(&tx, "workflows", &created_at, &workflow.name, workflow)?;

        tx.commit()?;
        debug!(rows, "Stored export bundle");
        Ok(rows)
    }

    /// Rows of `table`, oldest first
    pub fn records(&self, table: &str) -> Result<Vec<StoredRecord>, StoreError> {
        let table = TABLES
            .into_iter()
            .find(|t| *t == table)
            .ok_or(StoreError::Sqlite(rusqlite::Error::InvalidQuery))?;
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let mut stmt = conn.prepare(&format!(
            "SELECT id, created_at, name, config FROM {table} ORDER BY created_at, rowid"
        ))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(StoredRecord {
                    id: row.get(0)?,
                    created_at: row.get(1)?,
                    name: row.get(2)?,
                    config: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn insert<T: Serialize>(
    conn: &Connection,
    table: &str,
    created_at: &str,
    name: &str,
    document: &T,
) -> Result<usize, StoreError> {
    let config = serde_json::to_string(document)?;
    let inserted = conn.execute(
        &format!("INSERT INTO {table} (id, created_at, name, config) VALUES (?1, ?2, ?3, ?4)"),
        params![Uuid::new_v4().to_string(), created_at, name, config],
    )?;
    Ok(inserted)
}

impl ExportSink for SqliteExportStore {
    fn write(&self, bundle: &ExportBundle) -> Result<ExportReceipt, ExportSinkError> {
        let records = self.insert_bundle(bundle)?;
        Ok(ExportReceipt {
            sink: "sqlite",
            location: self.location.clone(),
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teamforge_application::ports::export_sink::Named;
    use teamforge_domain::workflow::assembler::{assemble, file_stem};
    use teamforge_domain::{
        AgentDefaults, AgentDescriptor, AgentRecordBuilder, Roster, SkillDocument, ToolDefinition,
        crew_config, graph_config,
    };

    fn bundle() -> ExportBundle {
        let builder = AgentRecordBuilder::new(AgentDefaults::default());
        let mut roster = Roster::new();
        roster
            .add(builder.build_agent(&AgentDescriptor::new("Data Analyst", "Reads the numbers")).unwrap())
            .unwrap();
        let tool = ToolDefinition::new("query_db", "Run a read-only query", "SELECT 1");
        let workflow = assemble(&roster, "Quarterly Report", "Summarize Q3").unwrap();

        ExportBundle {
            graph_agents: roster
                .iter()
                .map(|a| Named::new(a.key().as_str(), graph_config(a)))
                .collect(),
            skills: vec![Named::new("query_db", SkillDocument::from(&tool))],
            workflow: Named::new(file_stem(&workflow), workflow),
            crew_agents: roster
                .iter()
                .map(|a| Named::new(a.key().as_str(), crew_config(a)))
                .collect(),
        }
    }

    #[test]
    fn test_insert_bundle_rows() {
        let store = SqliteExportStore::open_in_memory().unwrap();
        let receipt = store.write(&bundle()).unwrap();
        assert_eq!(receipt.sink, "sqlite");
        assert_eq!(receipt.records, 3);

        let agents = store.records("agents").unwrap();
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].name, "data_analyst");
        assert!(Uuid::parse_str(&agents[0].id).is_ok());
        assert!(chrono::DateTime::parse_from_rfc3339(&agents[0].created_at).is_ok());

        let config: serde_json::Value = serde_json::from_str(&agents[0].config).unwrap();
        assert_eq!(config["description"], "Reads the numbers");

        let skills = store.records("skills").unwrap();
        assert_eq!(skills[0].name, "query_db");

        let workflows = store.records("workflows").unwrap();
        assert_eq!(workflows[0].name, "Quarterly Report");
    }

    #[test]
    fn test_exports_append() {
        let store = SqliteExportStore::open_in_memory().unwrap();
        store.write(&bundle()).unwrap();
        store.write(&bundle()).unwrap();

        let agents = store.records("agents").unwrap();
        assert_eq!(agents.len(), 2);
        assert_ne!(agents[0].id, agents[1].id);
    }

    #[test]
    fn test_open_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("telemetry").join("teamforge.db");
        let store = SqliteExportStore::open(&path).unwrap();
        store.write(&bundle()).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_unknown_table_is_rejected() {
        let store = SqliteExportStore::open_in_memory().unwrap();
        assert!(store.records("executions").is_err());
    }
}
