//! Progress reporting while a team is generated and the discussion runs

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use teamforge_application::ports::progress::ProgressNotifier;
use teamforge_domain::{DiscussionTurn, ModeratorDirective, Phase};

/// Reports progress with a spinner per LLM step and prints turns as they land
pub struct ProgressReporter {
    multi: MultiProgress,
    step_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            step_bar: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn step_display_name(step: &str) -> String {
        match step {
            "rephrase" => "Rephrasing request".to_string(),
            "agents" => "Generating team".to_string(),
            "project manager" => "Planning deliverables".to_string(),
            "moderator" => "Moderator choosing next speaker".to_string(),
            agent => format!("{} is working", agent),
        }
    }

    /// Print above the spinner without tearing it
    fn print(&self, line: String) {
        if self.multi.println(&line).is_err() {
            println!("{}", line);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_step_start(&self, step: &str) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix(Self::step_display_name(step));
        pb.set_message("...");
        pb.enable_steady_tick(Duration::from_millis(120));

        if let Ok(mut slot) = self.step_bar.lock()
            && let Some(previous) = slot.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn on_step_complete(&self, step: &str, success: bool) {
        let Ok(mut slot) = self.step_bar.lock() else {
            return;
        };
        if let Some(pb) = slot.take() {
            if success {
                pb.finish_and_clear();
            } else {
                pb.finish_with_message(format!("{} {}", "x".red(), step));
            }
        }
    }

    fn on_retry(&self, step: &str, attempt: u32, max_attempts: u32, error: &str) {
        if let Ok(slot) = self.step_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            pb.set_message(format!(
                "{} retry {}/{} ({})",
                step.yellow(),
                attempt,
                max_attempts,
                error
            ));
        }
    }

    fn on_directive(&self, directive: &ModeratorDirective) {
        let mut signals = Vec::new();
        if directive.phase_completed {
            signals.push("phase completed");
        }
        if directive.deliverable_completed {
            signals.push("deliverable completed");
        }
        let suffix = if signals.is_empty() {
            String::new()
        } else {
            format!(" [{}]", signals.join(", "))
        };
        self.print(format!(
            "{} {}{}",
            "Moderator ->".dimmed(),
            directive.target_agent.bold(),
            suffix.dimmed()
        ));
    }

    fn on_directive_rejected(&self, reason: &str) {
        self.print(format!("{} {}", "Moderator response ignored:".yellow(), reason));
    }

    fn on_turn(&self, turn: &DiscussionTurn) {
        self.print(ConsoleFormatter::format_turn(turn));
    }

    fn on_phase_advanced(&self, phase: Phase) {
        self.print(format!("{} {}", "Phase advanced to".cyan().bold(), phase.as_str().bold()));
    }

    fn on_deliverable_completed(&self, index: usize, text: &str) {
        self.print(format!("{} {}. {}", "[x]".green(), index + 1, text));
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_step_start(&self, step: &str) {
        println!("{} {}", "->".cyan(), ProgressReporter::step_display_name(step).bold());
    }

    fn on_step_complete(&self, step: &str, success: bool) {
        if !success {
            println!("  {} {} (failed)", "x".red(), step);
        }
    }

    fn on_retry(&self, step: &str, attempt: u32, max_attempts: u32, error: &str) {
        println!("  {} {} retry {}/{}: {}", "!".yellow(), step, attempt, max_attempts, error);
    }

    fn on_turn(&self, turn: &DiscussionTurn) {
        println!("{}", ConsoleFormatter::format_turn(turn));
    }

    fn on_phase_advanced(&self, phase: Phase) {
        println!("{} {}", "Phase advanced to".cyan(), phase.as_str());
    }

    fn on_deliverable_completed(&self, index: usize, text: &str) {
        println!("{} {}. {}", "[x]".green(), index + 1, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_display_name() {
        assert_eq!(ProgressReporter::step_display_name("agents"), "Generating team");
        assert_eq!(
            ProgressReporter::step_display_name("QA Engineer"),
            "QA Engineer is working"
        );
    }

    #[test]
    fn test_step_lifecycle_clears_spinner() {
        let reporter = ProgressReporter::new();
        reporter.on_step_start("moderator");
        reporter.on_retry("moderator", 1, 3, "timeout");
        reporter.on_step_start("QA Engineer");
        reporter.on_step_complete("QA Engineer", true);
        assert!(reporter.step_bar.lock().unwrap().is_none());
    }
}
