//! Export use case
//!
//! Builds the [`ExportBundle`] for the current roster and hands it to every
//! configured sink.

use crate::ports::export_sink::{ExportBundle, ExportReceipt, ExportSink, ExportSinkError, Named};
use crate::ports::tool_registry::ToolRegistry;
use std::collections::BTreeSet;
use std::sync::Arc;
use teamforge_domain::core::string::truncate;
use teamforge_domain::workflow::assembler::{assemble, file_stem};
use teamforge_domain::{
    DomainError, Session, SkillDocument, ToolDefinition, crew_config, graph_config,
};
use thiserror::Error;
use tracing::{info, warn};

/// Longest workflow name taken from the request
const WORKFLOW_NAME_LEN: usize = 60;

/// Errors that can occur during export
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Nothing to export: the roster is empty")]
    EmptyRoster,

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Export sink failed: {0}")]
    Sink(#[from] ExportSinkError),
}

/// What an export produced
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub bundle: ExportBundle,
    pub receipts: Vec<ExportReceipt>,
    /// Tool names referenced by agents but unknown to the registry
    pub missing_tools: Vec<String>,
}

/// Use case for exporting the session
pub struct ExportUseCase {
    registry: Arc<dyn ToolRegistry>,
    sinks: Vec<Arc<dyn ExportSink>>,
}

impl ExportUseCase {
    pub fn new(registry: Arc<dyn ToolRegistry>) -> Self {
        Self {
            registry,
            sinks: Vec::new(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn ExportSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Assemble every export document for `session`.
    ///
    /// Returns the bundle and the tool names the registry did not know.
    pub fn build_bundle(&self, session: &Session) -> Result<(ExportBundle, Vec<String>), ExportError> {
        let roster = session.roster();
        if roster.is_empty() {
            return Err(ExportError::EmptyRoster);
        }

        let graph_agents = roster
            .iter()
            .map(|agent| Named::new(agent.key().as_str(), graph_config(agent)))
            .collect();
        let crew_agents = roster
            .iter()
            .map(|agent| Named::new(agent.key().as_str(), crew_config(agent)))
            .collect();

        let referenced: BTreeSet<&str> = roster
            .iter()
            .flat_map(|agent| agent.tools().iter().map(String::as_str))
            .collect();
        let mut skills = Vec::new();
        let mut missing = Vec::new();
        for name in referenced {
            match self.registry.lookup(name) {
                Some(tool) => skills.push(Named::new(
                    ToolDefinition::normalize_name(&tool.name),
                    SkillDocument::from(&tool),
                )),
                None => {
                    warn!("Tool '{}' is not registered; skipping it in the export", name);
                    missing.push(name.to_string());
                }
            }
        }

        let name = session
            .request()
            .map(|r| truncate(r.content(), WORKFLOW_NAME_LEN))
            .unwrap_or_else(|| "Workflow".to_string());
        let description = session.brief().unwrap_or_default();
        let workflow = assemble(roster, &name, description)?;

        Ok((
            ExportBundle {
                graph_agents,
                skills,
                workflow: Named::new(file_stem(&workflow), workflow),
                crew_agents,
            },
            missing,
        ))
    }

    /// Build the bundle and write it to every sink.
    pub fn execute(&self, session: &Session) -> Result<ExportReport, ExportError> {
        let (bundle, missing_tools) = self.build_bundle(session)?;

        let mut receipts = Vec::with_capacity(self.sinks.len());
        for sink in &self.sinks {
            let receipt = sink.write(&bundle)?;
            info!(
                "Exported {} records to {} ({})",
                receipt.records, receipt.location, receipt.sink
            );
            receipts.push(receipt);
        }

        Ok(ExportReport {
            bundle,
            receipts,
            missing_tools,
        })
    }
}
