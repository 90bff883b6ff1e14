//! Terminal-facing sections: `[output]` and `[repl]`
//!
//! The presentation layer owns the runtime types; these mirror them as
//! optional TOML so `ConfigLoader` can merge them with everything else.

use serde::{Deserialize, Serialize};
use teamforge_domain::OutputFormat;

/// `[output]`: how a finished run is printed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Unset means "whatever the CLI says, else summary"
    pub format: Option<OutputFormat>,
    pub color: bool,
    /// Print where the agent, skill and workflow bundles were written
    pub export_report: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            export_report: true,
        }
    }
}

impl FileOutputConfig {
    /// A `--output` flag beats the file, which beats the default.
    pub fn resolve_format(&self, cli: Option<OutputFormat>) -> OutputFormat {
        cli.or(self.format).unwrap_or_default()
    }
}

/// `[repl]`: interactive session behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    pub show_progress: bool,
    /// `~/` is expanded by the REPL
    pub history_file: Option<String>,
    /// Lines kept in the history file
    pub history_size: usize,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
            history_size: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_default_when_absent() {
        let config: super::super::FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.output, FileOutputConfig::default());
        assert_eq!(config.repl, FileReplConfig::default());
        assert!(config.output.export_report);
        assert_eq!(config.repl.history_size, 1000);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let toml_str = r#"
[output]
export_report = false

[repl]
history_size = 50
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert!(!config.output.export_report);
        assert!(config.output.color);
        assert_eq!(config.repl.history_size, 50);
        assert!(config.repl.show_progress);
    }

    #[test]
    fn test_format_precedence() {
        let unset = FileOutputConfig::default();
        assert_eq!(unset.resolve_format(None), OutputFormat::Summary);

        let from_file = FileOutputConfig {
            format: Some(OutputFormat::Json),
            ..Default::default()
        };
        assert_eq!(from_file.resolve_format(None), OutputFormat::Json);
        assert_eq!(
            from_file.resolve_format(Some(OutputFormat::Full)),
            OutputFormat::Full
        );
    }
}
