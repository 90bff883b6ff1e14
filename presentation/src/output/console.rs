//! Console output formatter for teamforge sessions

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use serde_json::{Value, json};
use teamforge_application::ExportReport;
use teamforge_domain::{
    DiscussionLog, DiscussionTurn, OutputFormat, Phase, Project, Roster, Session, Speaker,
    Whiteboard,
};

/// Formats sessions for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render `session` in the requested format
    pub fn render(session: &Session, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::format(session),
            OutputFormat::Summary => Self::format_summary(session),
            OutputFormat::Json => Self::format_json(session),
        }
    }

    /// Team, full history, whiteboard and checklist
    pub fn format(session: &Session) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("teamforge session"));
        output.push('\n');

        if let Some(request) = session.request() {
            output.push_str(&format!("{} {}\n\n", "Request:".cyan().bold(), request.content()));
        }

        output.push_str(&Self::section_header("Team"));
        output.push_str(&Self::format_roster(session.roster()));

        output.push_str(&Self::section_header("Discussion"));
        output.push_str(&Self::format_history(session.log()));

        output.push_str(&Self::section_header("Whiteboard"));
        output.push_str(&Self::format_whiteboard(&session.log().whiteboard()));

        if let Some(project) = session.project() {
            output.push_str(&Self::section_header("Deliverables"));
            output.push_str(&Self::format_deliverables(project));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Most recent turn and the checklist
    pub fn format_summary(session: &Session) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n\n", "=== teamforge ===".cyan().bold()));
        if let Some(request) = session.request() {
            output.push_str(&format!("{} {}\n", "Request:".bold(), request.content()));
        }
        output.push_str(&format!(
            "{} {}\n\n",
            "Team:".dimmed(),
            session.roster().names().join(", ")
        ));

        match session.log().most_recent() {
            Some(turn) => output.push_str(&Self::format_turn(turn)),
            None => output.push_str(&format!("{}\n", "No turns yet.".dimmed())),
        }

        if let Some(project) = session.project() {
            output.push('\n');
            output.push_str(&Self::format_deliverables(project));
        }
        output
    }

    /// Machine-readable session summary
    pub fn format_json(session: &Session) -> String {
        serde_json::to_string_pretty(&Self::summary_value(session))
            .unwrap_or_else(|_| "{}".to_string())
    }

    pub fn summary_value(session: &Session) -> Value {
        let deliverables: Vec<Value> = session
            .project()
            .map(|project| {
                project
                    .deliverables()
                    .iter()
                    .map(|d| {
                        let phases: serde_json::Map<String, Value> = Phase::ALL
                            .iter()
                            .map(|p| (p.as_str().to_string(), json!(d.is_phase_done(*p))))
                            .collect();
                        json!({ "text": d.text(), "done": d.is_done(), "phases": phases })
                    })
                    .collect()
            })
            .unwrap_or_default();

        json!({
            "request": session.request().map(|r| r.content()),
            "brief": session.brief(),
            "agents": session.roster().names(),
            "current_phase": session.project().map(|p| p.current_phase().as_str()),
            "complete": session.project().is_some_and(|p| p.is_complete()),
            "deliverables": deliverables,
            "turns": session.log().len(),
            "last_turn": session.log().most_recent().map(|t| json!({
                "seq": t.seq,
                "speaker": t.speaker.name(),
                "text": t.text,
            })),
            "whiteboard": session.log().whiteboard().blocks(),
        })
    }

    /// One turn with a colored speaker banner
    pub fn format_turn(turn: &DiscussionTurn) -> String {
        let banner = format!("── #{} {} ──", turn.seq, turn.speaker.name());
        let banner = match turn.speaker {
            Speaker::User => banner.green().bold(),
            Speaker::ProjectManager => banner.magenta().bold(),
            Speaker::Agent(_) => banner.yellow().bold(),
        };
        format!("{}\n{}\n", banner, turn.text.trim())
    }

    pub fn format_history(log: &DiscussionLog) -> String {
        if log.is_empty() {
            return format!("{}\n", "No turns yet.".dimmed());
        }
        log.turns()
            .iter()
            .map(|turn| format!("\n{}", Self::format_turn(turn)))
            .collect()
    }

    pub fn format_whiteboard(whiteboard: &Whiteboard) -> String {
        if whiteboard.is_empty() {
            return format!("{}\n", "The whiteboard is empty.".dimmed());
        }
        format!("{}\n", whiteboard.render())
    }

    /// Checklist with one mark per phase
    pub fn format_deliverables(project: &Project) -> String {
        let tracker = project.deliverables();
        let mut output = format!(
            "{} ({}/{} done, phase: {})\n",
            "Deliverables".cyan().bold(),
            tracker.done_count(),
            tracker.len(),
            project.current_phase().as_str().bold()
        );

        for (index, deliverable) in tracker.iter().enumerate() {
            let check = if deliverable.is_done() {
                "[x]".green().to_string()
            } else {
                "[ ]".to_string()
            };
            let phases: Vec<String> = Phase::ALL
                .iter()
                .map(|phase| {
                    let mark = if deliverable.is_phase_done(*phase) { "x" } else { " " };
                    format!("{}[{}]", phase.as_str(), mark)
                })
                .collect();
            output.push_str(&format!(
                "  {} {}. {}  {}\n",
                check,
                index + 1,
                deliverable.text(),
                phases.join(" ").dimmed()
            ));
        }
        output
    }

    pub fn format_roster(roster: &Roster) -> String {
        if roster.is_empty() {
            return format!("{}\n", "No agents.".dimmed());
        }
        roster
            .iter()
            .enumerate()
            .map(|(i, agent)| {
                let tag = if i == 0 { " (coordinator)" } else { "" };
                format!(
                    "  {}{} {} {}\n",
                    agent.name().bold(),
                    tag.dimmed(),
                    "-".dimmed(),
                    agent.description()
                )
            })
            .collect()
    }

    pub fn format_export(report: &ExportReport) -> String {
        let mut output = String::new();
        for receipt in &report.receipts {
            output.push_str(&format!(
                "{} {} records -> {} ({})\n",
                "Exported".green().bold(),
                receipt.records,
                receipt.location,
                receipt.sink
            ));
        }
        if !report.missing_tools.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Unknown tools skipped:".yellow(),
                report.missing_tools.join(", ")
            ));
        }
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, session: &Session) -> String {
        Self::format(session)
    }

    fn format_json(&self, session: &Session) -> String {
        Self::format_json(session)
    }

    fn format_summary(&self, session: &Session) -> String {
        Self::format_summary(session)
    }
}
