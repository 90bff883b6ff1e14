//! REPL (Read-Eval-Print Loop) for interactive sessions

use crate::ConsoleFormatter;
use crate::ProgressReporter;
use crate::ReplConfig;
use crate::chat::commands::{HELP, ReplCommand, parse_tool_list, resolve_say};
use colored::Colorize;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::path::PathBuf;
use teamforge_application::{
    BeginProjectUseCase, ExportUseCase, GenerateTeamUseCase, LlmGateway, NoProgress, PendingTurn,
    ProgressNotifier, RunDiscussionUseCase, RunOutcome, StepOutcome, TurnError,
};
use teamforge_domain::{OutputFormat, Session, UserRequest};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Interactive session REPL
pub struct ChatRepl<G: LlmGateway + 'static> {
    generate: GenerateTeamUseCase<G>,
    begin: BeginProjectUseCase<G>,
    discussion: RunDiscussionUseCase<G>,
    export: ExportUseCase,
    session: Session,
    /// Rate-limited turn waiting for `/retry`
    pending: Option<PendingTurn>,
    show_progress: bool,
    output_format: OutputFormat,
    history_file: Option<PathBuf>,
    history_size: usize,
}

impl<G: LlmGateway + 'static> ChatRepl<G> {
    pub fn new(
        generate: GenerateTeamUseCase<G>,
        begin: BeginProjectUseCase<G>,
        discussion: RunDiscussionUseCase<G>,
        export: ExportUseCase,
    ) -> Self {
        Self {
            generate,
            begin,
            discussion,
            export,
            session: Session::new(),
            pending: None,
            show_progress: true,
            output_format: OutputFormat::Summary,
            history_file: None,
            history_size: ReplConfig::default().history_size,
        }
    }

    /// Progress display and the history file from `config`
    pub fn with_config(mut self, config: &ReplConfig) -> Self {
        self.show_progress = config.show_progress;
        self.history_file = config.history_path();
        self.history_size = config.history_size;
        self
    }

    /// Format used when the session is printed on exit
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn editor(&self) -> Reedline {
        let editor = Reedline::create();
        let Some(path) = &self.history_file else {
            return editor;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match FileBackedHistory::with_file(self.history_size, path.clone()) {
            Ok(history) => editor.with_history(Box::new(history)),
            Err(e) => {
                warn!("History disabled ({}): {}", path.display(), e);
                editor
            }
        }
    }

    fn progress(&self) -> Box<dyn ProgressNotifier> {
        if self.show_progress {
            Box::new(ProgressReporter::new())
        } else {
            Box::new(NoProgress)
        }
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut editor = self.editor();
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("teamforge".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    match ReplCommand::parse(line) {
                        Some(command) => {
                            if self.handle_command(command).await {
                                break;
                            }
                        }
                        None => self.handle_text(line).await,
                    }
                }
                Signal::CtrlC => {
                    println!("^C");
                    continue;
                }
                Signal::CtrlD => {
                    println!("Bye!");
                    break;
                }
                #[allow(unreachable_patterns)]
                _ => continue,
            }
        }

        if !self.session.log().is_empty() {
            println!("{}", ConsoleFormatter::render(&self.session, self.output_format));
        }
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│          teamforge - Interactive Mode       │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Describe what the team should build, or type /help.");
        println!();
    }

    /// Handle a slash command. Returns true if the REPL should exit.
    async fn handle_command(&mut self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => println!("\n{}\n", HELP),
            ReplCommand::Next => {
                let progress = self.progress();
                let result = self.discussion.step(&mut self.session, progress.as_ref()).await;
                self.report_step(result);
            }
            ReplCommand::Run => self.run_until_done().await,
            ReplCommand::Say(arg) => self.say(&arg).await,
            ReplCommand::Retry => self.retry().await,
            ReplCommand::History => {
                print!("{}", ConsoleFormatter::format_history(self.session.log()));
            }
            ReplCommand::Whiteboard => {
                print!(
                    "{}",
                    ConsoleFormatter::format_whiteboard(&self.session.log().whiteboard())
                );
            }
            ReplCommand::Deliverables => match self.session.project() {
                Some(project) => print!("{}", ConsoleFormatter::format_deliverables(project)),
                None => println!("{}", "No project yet.".dimmed()),
            },
            ReplCommand::Team => print!("{}", ConsoleFormatter::format_roster(self.session.roster())),
            ReplCommand::Rename(arg) => self.rename(&arg),
            ReplCommand::Tools(arg) => self.set_tools(&arg),
            ReplCommand::Remove(arg) => self.remove(&arg),
            ReplCommand::Export => match self.export.execute(&self.session) {
                Ok(report) => print!("{}", ConsoleFormatter::format_export(&report)),
                Err(e) => eprintln!("{} {}", "Export failed:".red(), e),
            },
            ReplCommand::Reset => {
                self.session.reset();
                self.pending = None;
                println!("Session cleared. Describe a new project to start over.");
            }
            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }
        false
    }

    /// Plain text starts a project or talks to the current speaker
    async fn handle_text(&mut self, text: &str) {
        if self.session.roster().is_empty() {
            self.start_project(text).await;
            return;
        }
        if self.session.project().is_none() {
            self.begin_project().await;
            return;
        }

        let target = self
            .session
            .last_speaker()
            .or_else(|| self.session.roster().coordinator())
            .map(|agent| agent.key().clone());
        let Some(target) = target else {
            println!("{}", "The team is empty.".yellow());
            return;
        };

        let progress = self.progress();
        let result = self
            .discussion
            .step_with(&mut self.session, &target, "", Some(text), progress.as_ref())
            .await;
        self.report_step(result);
    }

    async fn start_project(&mut self, text: &str) {
        let Some(request) = UserRequest::try_new(text) else {
            println!("{}", "Please describe what the team should build.".yellow());
            return;
        };

        let progress = self.progress();
        match self
            .generate
            .execute_with_progress(&mut self.session, request, progress.as_ref())
            .await
        {
            Ok(output) => {
                for diagnostic in &output.diagnostics {
                    println!("{} {}", "!".yellow(), diagnostic);
                }
                println!("\n{} {}\n", "Brief:".cyan().bold(), output.brief);
                print!("{}", ConsoleFormatter::format_roster(self.session.roster()));
            }
            Err(e) => {
                eprintln!("{} {}", "Team generation failed:".red(), e);
                return;
            }
        }

        self.begin_project().await;
    }

    async fn begin_project(&mut self) {
        let progress = self.progress();
        match self
            .begin
            .execute_with_progress(&mut self.session, progress.as_ref())
            .await
        {
            Ok(_) => {
                if let Some(project) = self.session.project() {
                    println!();
                    print!("{}", ConsoleFormatter::format_deliverables(project));
                }
                println!("\nUse /next for one turn or /run to let the team work.");
            }
            Err(e) => eprintln!("{} {}", "Could not start the project:".red(), e),
        }
    }

    async fn say(&mut self, arg: &str) {
        let Some((key, prompt)) = resolve_say(self.session.roster(), arg) else {
            println!(
                "Usage: /say <agent> <prompt>  (agents: {})",
                self.session.roster().names().join(", ")
            );
            return;
        };

        let progress = self.progress();
        let result = self
            .discussion
            .step_with(&mut self.session, &key, &prompt, None, progress.as_ref())
            .await;
        self.report_step(result);
    }

    fn rename(&mut self, arg: &str) {
        let Some((key, name)) = resolve_say(self.session.roster(), arg).filter(|(_, n)| !n.is_empty())
        else {
            println!("Usage: /rename <agent>: <new name>");
            return;
        };
        let description = self
            .session
            .roster()
            .get(&key)
            .map(|agent| agent.description().to_string())
            .unwrap_or_default();
        match self.session.rename_agent(&key, &name, description) {
            Ok(new_key) => println!("Renamed {} to {}", key, new_key),
            Err(e) => eprintln!("{} {}", "Error:".red(), e),
        }
    }

    fn set_tools(&mut self, arg: &str) {
        let Some((key, list)) = resolve_say(self.session.roster(), arg) else {
            println!("Usage: /tools <agent>: <tool>, <tool>");
            return;
        };
        let tools = parse_tool_list(&list);
        let count = tools.len();
        match self.session.roster_mut().set_tools(&key, tools) {
            Ok(()) => println!("{} now has {} tools", key, count),
            Err(e) => eprintln!("{} {}", "Error:".red(), e),
        }
    }

    fn remove(&mut self, arg: &str) {
        let Some((key, _)) = resolve_say(self.session.roster(), arg) else {
            println!("Usage: /remove <agent>");
            return;
        };
        match self.session.remove_agent(&key) {
            Ok(agent) => println!("Removed {}", agent.name()),
            Err(e) => eprintln!("{} {}", "Error:".red(), e),
        }
    }

    async fn retry(&mut self) {
        let Some(pending) = self.pending.take() else {
            println!("{}", "Nothing to retry.".dimmed());
            return;
        };

        let progress = self.progress();
        let result = self
            .discussion
            .retry_reduced(&mut self.session, pending, progress.as_ref())
            .await;
        self.report_step(result);
    }

    async fn run_until_done(&mut self) {
        let cancel = CancellationToken::new();
        let watcher = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            })
        };

        let progress = self.progress();
        let result = self
            .discussion
            .run(&mut self.session, &cancel, progress.as_ref())
            .await;
        watcher.abort();

        match result {
            Ok(summary) => {
                let message = match summary.outcome {
                    RunOutcome::Completed => "Every deliverable is done. /export writes the bundles.".to_string(),
                    RunOutcome::Stopped => "Stopped.".to_string(),
                    RunOutcome::MaxTurns => format!(
                        "Turn limit reached ({}). /run continues.",
                        self.discussion.config().max_turns
                    ),
                    RunOutcome::NeedsInput(reason) => {
                        format!("{} Type a message or use /say.", reason)
                    }
                };
                self.print_turn_if_quiet();
                println!("\n{} {} ({} turns)", "Run finished:".cyan().bold(), message, summary.turns);
            }
            Err(e) => self.report_error(e),
        }
    }

    fn report_step(&mut self, result: Result<StepOutcome, TurnError>) {
        match result {
            Ok(StepOutcome::Spoke(_)) => self.print_turn_if_quiet(),
            Ok(StepOutcome::NeedsInput(reason)) => {
                println!("{} {}", "Waiting for input:".yellow(), reason);
                println!("Type a message or use /say <agent> <prompt>.");
            }
            Ok(StepOutcome::NoResponse { agent, error }) => {
                eprintln!("{} {} ({})", "No response from".red(), agent, error);
            }
            Ok(StepOutcome::Completed) => {
                println!("{}", "Every deliverable is done. /export writes the bundles.".green());
            }
            Err(e) => self.report_error(e),
        }
    }

    fn report_error(&mut self, error: TurnError) {
        eprintln!("{} {}", "Error:".red(), error);
        if let TurnError::RateLimited { pending, .. } = error {
            self.pending = Some(pending);
            println!("Use /retry to take the turn again with a smaller token budget.");
        }
    }

    /// The progress reporter prints turns as they land
    fn print_turn_if_quiet(&self) {
        if !self.show_progress
            && let Some(turn) = self.session.log().most_recent()
        {
            println!("{}", ConsoleFormatter::format_turn(turn));
        }
    }
}
