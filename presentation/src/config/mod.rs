//! Runtime settings for the terminal front end
//!
//! Built by the binary from the `[output]` and `[repl]` file sections plus
//! command line flags.

use std::path::PathBuf;
use teamforge_domain::OutputFormat;

/// How a finished run is printed
#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color: bool,
    /// Print where the bundles were written after an export
    pub export_report: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: true,
            export_report: true,
        }
    }
}

impl OutputConfig {
    /// `--quiet` keeps the rendered session but drops the export report
    pub fn quiet(mut self, quiet: bool) -> Self {
        if quiet {
            self.export_report = false;
        }
        self
    }
}

/// Interactive session settings
#[derive(Debug, Clone, PartialEq)]
pub struct ReplConfig {
    pub show_progress: bool,
    pub history_file: Option<String>,
    pub history_size: usize,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
            history_size: 1000,
        }
    }
}

impl ReplConfig {
    /// Configured history file, or `<data_dir>/teamforge/history.txt`
    pub fn history_path(&self) -> Option<PathBuf> {
        match &self.history_file {
            Some(path) => Some(expand_home(path)),
            None => dirs::data_dir().map(|p| p.join("teamforge").join("history.txt")),
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_history_file() {
        let config = ReplConfig {
            history_file: Some("/tmp/teamforge-history.txt".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.history_path(),
            Some(PathBuf::from("/tmp/teamforge-history.txt"))
        );
    }

    #[test]
    fn test_home_relative_history_file() {
        let config = ReplConfig {
            history_file: Some("~/teamforge/history.txt".to_string()),
            ..Default::default()
        };
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                config.history_path(),
                Some(home.join("teamforge").join("history.txt"))
            );
        }
    }

    #[test]
    fn test_quiet_drops_only_the_export_report() {
        let config = OutputConfig {
            format: OutputFormat::Json,
            ..Default::default()
        }
        .quiet(true);
        assert!(!config.export_report);
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.color);

        assert!(OutputConfig::default().quiet(false).export_report);
    }
}
