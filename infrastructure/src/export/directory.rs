//! Directory-tree export sink.
//!
//! Layout under the root directory:
//!
//! ```text
//! graph/agents/<agent_key>.json
//! graph/skills/<tool>.json
//! graph/workflows/<workflow>.json
//! crew/agents/<agent_key>.json
//! ```
//!
//! Existing files with the same stem are overwritten.

use serde::Serialize;
use std::path::{Path, PathBuf};
use teamforge_application::ports::export_sink::{
    ExportBundle, ExportReceipt, ExportSink, ExportSinkError, Named,
};
use tracing::debug;

pub struct DirectoryExporter {
    root: PathBuf,
}

impl DirectoryExporter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn graph_dir(&self) -> PathBuf {
        self.root.join("graph")
    }

    pub fn crew_dir(&self) -> PathBuf {
        self.root.join("crew")
    }

    fn write_all<T: Serialize>(
        &self,
        dir: &Path,
        documents: &[Named<T>],
    ) -> Result<usize, ExportSinkError> {
        std::fs::create_dir_all(dir).map_err(|source| io_error(dir, source))?;
        for named in documents {
            let path = dir.join(format!("{}.json", named.stem));
            let json = serde_json::to_string_pretty(&named.document)?;
            std::fs::write(&path, json).map_err(|source| io_error(&path, source))?;
            debug!("Wrote {}", path.display());
        }
        Ok(documents.len())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> ExportSinkError {
    ExportSinkError::Io {
        path: path.display().to_string(),
        source,
    }
}

impl ExportSink for DirectoryExporter {
    fn write(&self, bundle: &ExportBundle) -> Result<ExportReceipt, ExportSinkError> {
        let graph = self.graph_dir();
        let crew = self.crew_dir();

        let mut records = self.write_all(&graph.join("agents"), &bundle.graph_agents)?;
        records += self.write_all(&graph.join("skills"), &bundle.skills)?;
        records += self.write_all(
            &graph.join("workflows"),
            std::slice::from_ref(&bundle.workflow),
        )?;
        records += self.write_all(&crew.join("agents"), &bundle.crew_agents)?;

        Ok(ExportReceipt {
            sink: "directory",
            location: self.root.display().to_string(),
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teamforge_domain::{AgentDefaults, AgentDescriptor, AgentRecordBuilder, Roster, ToolDefinition};
    use teamforge_domain::{SkillDocument, crew_config, graph_config};
    use teamforge_domain::workflow::assembler::{assemble, file_stem};

    fn bundle() -> ExportBundle {
        let builder = AgentRecordBuilder::new(AgentDefaults::default());
        let mut roster = Roster::new();
        for (name, tools) in [("Backend Developer", vec!["run_tests".to_string()]), ("QA Engineer", vec![])] {
            let descriptor = AgentDescriptor {
                expert_name: name.to_string(),
                description: format!("{} for the login API", name),
                tools,
                ..Default::default()
            };
            roster.add(builder.build_agent(&descriptor).unwrap()).unwrap();
        }

        let tool = ToolDefinition::new("run_tests", "Run the test suite", "cargo test");
        let workflow = assemble(&roster, "Login API", "Build a login API").unwrap();
        ExportBundle {
            graph_agents: roster
                .iter()
                .map(|a| Named::new(a.key().as_str(), graph_config(a)))
                .collect(),
            skills: vec![Named::new("run_tests", SkillDocument::from(&tool))],
            workflow: Named::new(file_stem(&workflow), workflow),
            crew_agents: roster
                .iter()
                .map(|a| Named::new(a.key().as_str(), crew_config(a)))
                .collect(),
        }
    }

    #[test]
    fn test_writes_both_trees() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = DirectoryExporter::new(dir.path().join("out"));

        let receipt = exporter.write(&bundle()).unwrap();
        assert_eq!(receipt.sink, "directory");
        assert_eq!(receipt.records, 6);

        let graph = exporter.graph_dir();
        assert!(graph.join("agents/backend_developer.json").is_file());
        assert!(graph.join("agents/qa_engineer.json").is_file());
        assert!(graph.join("skills/run_tests.json").is_file());
        assert!(graph.join("workflows/login_api.json").is_file());
        assert!(exporter.crew_dir().join("agents/qa_engineer.json").is_file());

        let skill: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(graph.join("skills/run_tests.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(skill["file_name"], "run_tests.py");
        assert_eq!(skill["content"], "cargo test");
    }

    #[test]
    fn test_rewrite_overwrites_same_stem() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = DirectoryExporter::new(dir.path());

        exporter.write(&bundle()).unwrap();
        exporter.write(&bundle()).unwrap();

        let count = std::fs::read_dir(exporter.graph_dir().join("agents")).unwrap().count();
        assert_eq!(count, 2);
    }
}
