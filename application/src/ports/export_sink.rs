//! Export sink port
//!
//! An [`ExportBundle`] holds every document produced for the two external
//! frameworks. Sinks persist it (directory trees, a relational dump).

use serde::Serialize;
use teamforge_domain::{CrewAgentConfig, GraphAgentConfig, SkillDocument, WorkflowDocument};
use thiserror::Error;

/// Errors raised while persisting a bundle
#[derive(Error, Debug)]
pub enum ExportSinkError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

/// A document paired with the file stem it is stored under
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Named<T> {
    pub stem: String,
    pub document: T,
}

impl<T> Named<T> {
    pub fn new(stem: impl Into<String>, document: T) -> Self {
        Self {
            stem: stem.into(),
            document,
        }
    }
}

/// Every exported document of one session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportBundle {
    pub graph_agents: Vec<Named<GraphAgentConfig>>,
    pub skills: Vec<Named<SkillDocument>>,
    pub workflow: Named<WorkflowDocument>,
    pub crew_agents: Vec<Named<CrewAgentConfig>>,
}

/// Where a sink put the bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub sink: &'static str,
    pub location: String,
    pub records: usize,
}

/// Persists export bundles
pub trait ExportSink: Send + Sync {
    fn write(&self, bundle: &ExportBundle) -> Result<ExportReceipt, ExportSinkError>;
}
