//! CLI entrypoint for teamforge
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use teamforge_application::{
    BeginProjectUseCase, ConversationLogger, ExportUseCase, GenerateTeamUseCase, NoProgress,
    NoTools, ProgressNotifier, RunDiscussionUseCase, RunOutcome, ToolRegistry,
};
use teamforge_domain::{AgentDefaults, ProviderConfig, Session, UserRequest};
use teamforge_infrastructure::{
    ConfigLoader, DirectoryExporter, DirectoryToolRegistry, FileConfig, JsonlConversationLogger,
    RoutingGateway, SqliteExportStore,
};
use teamforge_presentation::{
    ChatRepl, Cli, ConsoleFormatter, OutputConfig, ProgressReporter, ReplConfig, SimpleProgress,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    apply_cli_overrides(&mut config, &cli);
    config.validate().context("Invalid configuration")?;

    // Held until exit so buffered log lines are flushed
    let _log_guard = init_tracing(cli.verbose, config.logging.dir.as_deref());

    info!("Starting teamforge");

    let output = OutputConfig {
        format: config.output.resolve_format(cli.output.map(Into::into)),
        color: config.output.color,
        export_report: config.output.export_report,
    }
    .quiet(cli.quiet);
    if !output.color {
        colored::control::set_override(false);
    }

    // === Dependency Injection ===
    let provider_config = config.provider_config()?;
    let defaults = agent_defaults(&provider_config);
    let discussion_config = config.discussion_config();
    let gateway = Arc::new(RoutingGateway::new(provider_config)?);

    let mut generate =
        GenerateTeamUseCase::new(Arc::clone(&gateway), defaults.clone(), discussion_config.clone());
    let mut begin =
        BeginProjectUseCase::new(Arc::clone(&gateway), defaults.clone(), discussion_config.clone());
    let mut discussion = RunDiscussionUseCase::new(Arc::clone(&gateway), defaults, discussion_config);

    if let Some(logger) = conversation_logger(&config) {
        generate = generate.with_conversation_logger(Arc::clone(&logger));
        begin = begin.with_conversation_logger(Arc::clone(&logger));
        discussion = discussion.with_conversation_logger(logger);
    }

    let export = export_use_case(&config)?;

    // Interactive mode
    if cli.interactive {
        let repl_config = ReplConfig {
            show_progress: config.repl.show_progress && !cli.quiet,
            history_file: config.repl.history_file.clone(),
            history_size: config.repl.history_size,
        };
        let mut repl = ChatRepl::new(generate, begin, discussion, export)
            .with_config(&repl_config)
            .with_output_format(output.format);

        repl.run().await?;
        return Ok(());
    }

    // Single request mode - request is required
    let request = match cli.request.as_deref().and_then(UserRequest::try_new) {
        Some(request) => request,
        None => bail!("A request is required. Use --interactive for interactive mode."),
    };

    if !cli.quiet {
        println!();
        println!("+============================================================+");
        println!("|           teamforge - LLM Agent Team                       |");
        println!("+============================================================+");
        println!();
        println!("Request: {}", request.content());
        println!("Provider: {} ({})", gateway.config().default, gateway.config().default_model());
        println!();
    }

    let progress: Box<dyn ProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else if std::io::stdout().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let mut session = Session::new();

    let team = generate
        .execute_with_progress(&mut session, request, progress.as_ref())
        .await?;
    for diagnostic in &team.diagnostics {
        warn!("{}", diagnostic);
    }
    info!("Team: {}", team.agent_names.join(", "));

    begin
        .execute_with_progress(&mut session, progress.as_ref())
        .await?;

    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };
    let summary = discussion
        .run(&mut session, &cancel, progress.as_ref())
        .await;
    watcher.abort();
    let summary = summary?;

    match &summary.outcome {
        RunOutcome::Completed => info!("Every deliverable is done after {} turns", summary.turns),
        RunOutcome::Stopped => warn!("Discussion interrupted after {} turns", summary.turns),
        RunOutcome::MaxTurns => warn!("Turn limit reached with deliverables still open"),
        RunOutcome::NeedsInput(reason) => warn!("Discussion stalled: {}", reason),
    }

    let report = export.execute(&session)?;

    println!("{}", ConsoleFormatter::render(&session, output.format));
    if output.export_report {
        print!("{}", ConsoleFormatter::format_export(&report));
    }

    Ok(())
}

/// Command line flags win over every config source
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(provider) = cli.provider {
        config.provider.default = provider.to_string();
    }
    if let Some(model) = &cli.model {
        config.provider.model = Some(model.clone());
    }
    if let Some(max_turns) = cli.max_turns {
        config.discussion.max_turns = max_turns;
    }
    if let Some(dir) = &cli.export_dir {
        config.export.dir = dir.display().to_string();
    }
    if let Some(path) = &cli.sqlite {
        config.export.sqlite = Some(path.display().to_string());
    }
    if let Some(dir) = &cli.tools_dir {
        config.tools.dir = Some(dir.display().to_string());
    }
    if let Some(dir) = &cli.log_dir {
        config.logging.dir = Some(dir.display().to_string());
    }
}

/// Initialize logging based on verbosity level, optionally to a daily file
fn init_tracing(verbose: u8, log_dir: Option<&str>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "teamforge.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

fn agent_defaults(provider: &ProviderConfig) -> AgentDefaults {
    AgentDefaults {
        provider: provider.default,
        model: provider.default_model(),
        params: provider.params.clone(),
    }
}

fn conversation_logger(config: &FileConfig) -> Option<Arc<dyn ConversationLogger>> {
    let path = PathBuf::from(config.logging.conversation_log.as_ref()?);
    let logger = JsonlConversationLogger::new(&path)?;
    info!("Conversation log: {}", logger.path().display());
    Some(Arc::new(logger))
}

fn export_use_case(config: &FileConfig) -> Result<ExportUseCase> {
    let registry: Arc<dyn ToolRegistry> = match &config.tools.dir {
        Some(dir) => {
            let registry = DirectoryToolRegistry::load(dir)
                .with_context(|| format!("Failed to load tools from {dir}"))?;
            info!("Loaded {} tools from {}", registry.len(), dir);
            Arc::new(registry)
        }
        None => Arc::new(NoTools),
    };

    let mut export =
        ExportUseCase::new(registry).with_sink(Arc::new(DirectoryExporter::new(&config.export.dir)));

    if let Some(path) = &config.export.sqlite {
        let store = SqliteExportStore::open(path)
            .with_context(|| format!("Failed to open export database {path}"))?;
        export = export.with_sink(Arc::new(store));
    }

    Ok(export)
}
