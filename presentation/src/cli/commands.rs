//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use teamforge_domain::ProviderKind;

/// Output format for session results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every turn, the whiteboard and the deliverable checklist
    Full,
    /// Most recent turn and the deliverable checklist
    Summary,
    /// JSON output
    Json,
}

impl From<OutputFormat> for teamforge_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => teamforge_domain::OutputFormat::Full,
            OutputFormat::Summary => teamforge_domain::OutputFormat::Summary,
            OutputFormat::Json => teamforge_domain::OutputFormat::Json,
        }
    }
}

/// Parse a provider name for `--provider`
fn parse_provider(s: &str) -> Result<ProviderKind, String> {
    s.parse::<ProviderKind>().map_err(|e| e.to_string())
}

/// CLI arguments for teamforge
#[derive(Parser, Debug)]
#[command(name = "teamforge")]
#[command(author, version, about = "Generate a team of LLM agents and let them work through a project")]
#[command(long_about = r#"
teamforge turns a request into a team of LLM agents, has a project manager
break it into deliverables, and runs a moderated discussion until every
deliverable is done. The team is exported as agent, skill and workflow
documents for graph-style and crew-style agent frameworks.

Configuration files are loaded from (in priority order):
1. TEAMFORGE_* environment variables (e.g. TEAMFORGE_DISCUSSION__MAX_TURNS=5)
2. --config <path>         Explicit config file
3. ./teamforge.toml        Project-level config
4. ~/.config/teamforge/config.toml   Global config

Example:
  teamforge "Build a login API with rate limiting"
  teamforge --provider ollama --model llama3.1 --max-turns 6 "Plan a blog engine"
  teamforge --interactive
"#)]
pub struct Cli {
    /// What the team should build (not required in interactive mode)
    pub request: Option<String>,

    /// Start an interactive session
    #[arg(short, long)]
    pub interactive: bool,

    /// LLM provider (groq, openai, anthropic, ollama, lmstudio)
    #[arg(short, long, value_name = "PROVIDER", value_parser = parse_provider)]
    pub provider: Option<ProviderKind>,

    /// Model used by every agent and the moderator
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Maximum discussion turns
    #[arg(long, value_name = "N")]
    pub max_turns: Option<usize>,

    /// Directory for exported bundles
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// SQLite database that records every export
    #[arg(long, value_name = "PATH")]
    pub sqlite: Option<PathBuf>,

    /// Directory of tool files agents may reference
    #[arg(long, value_name = "DIR")]
    pub tools_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Directory for daily rolling diagnostic logs
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_full_invocation() {
        let cli = Cli::try_parse_from([
            "teamforge",
            "--provider",
            "anthropic",
            "--model",
            "claude-3-5-haiku-latest",
            "--max-turns",
            "6",
            "--output",
            "json",
            "-vv",
            "Build a login API",
        ])
        .unwrap();

        assert_eq!(cli.request.as_deref(), Some("Build a login API"));
        assert_eq!(cli.provider, Some(ProviderKind::Anthropic));
        assert_eq!(cli.max_turns, Some(6));
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
        assert!(!cli.interactive);
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        assert!(Cli::try_parse_from(["teamforge", "--provider", "bedrock", "x"]).is_err());
    }

    #[test]
    fn test_output_format_maps_to_domain() {
        assert_eq!(
            teamforge_domain::OutputFormat::from(OutputFormat::Summary),
            teamforge_domain::OutputFormat::Summary
        );
    }
}
