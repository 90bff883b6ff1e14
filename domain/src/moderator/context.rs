//! Inputs of one moderator decision

use crate::core::string::tail_chars;
use crate::prompt::template::PromptTemplate;

/// Hard cap on the discussion history shown to the moderator, in characters
pub const HISTORY_CHAR_LIMIT: usize = 50_000;

/// Everything the moderator prompt is assembled from
#[derive(Debug, Clone)]
pub struct ModeratorContext<'a> {
    pub goal: &'a str,
    pub history: &'a str,
    pub last_speaker: Option<&'a str>,
    pub last_comment: Option<&'a str>,
    /// `name: description` lines
    pub roster: &'a str,
    pub deliverable: Option<&'a str>,
    pub phase: &'a str,
    pub history_limit: usize,
}

impl<'a> ModeratorContext<'a> {
    /// The most recent `history_limit` characters of the history
    pub fn bounded_history(&self) -> &'a str {
        tail_chars(self.history, self.history_limit)
    }

    /// Assemble the moderator prompt
    pub fn prompt(&self) -> String {
        PromptTemplate::moderator_prompt(
            self.goal,
            self.bounded_history(),
            self.last_speaker.unwrap_or("None"),
            self.last_comment.unwrap_or(""),
            self.roster,
            self.deliverable.unwrap_or("All deliverables are complete"),
            self.phase,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(history: &str) -> ModeratorContext<'_> {
        ModeratorContext {
            goal: "Build login",
            history,
            last_speaker: Some("Code Developer"),
            last_comment: Some("done"),
            roster: "Code Developer: codes\nCode Tester: tests",
            deliverable: Some("Build login API"),
            phase: "Planning",
            history_limit: HISTORY_CHAR_LIMIT,
        }
    }

    #[test]
    fn test_history_is_truncated_from_start() {
        let history = format!("{}{}", "a".repeat(10), "b".repeat(HISTORY_CHAR_LIMIT));
        let ctx = context(&history);
        let bounded = ctx.bounded_history();
        assert_eq!(bounded.chars().count(), HISTORY_CHAR_LIMIT);
        assert!(bounded.chars().all(|c| c == 'b'));

        let prompt = ctx.prompt();
        assert!(prompt.contains(bounded));
        assert!(!prompt.contains(&history));
    }

    #[test]
    fn test_short_history_untouched() {
        let ctx = context("short");
        assert_eq!(ctx.bounded_history(), "short");
    }

    #[test]
    fn test_prompt_mentions_inputs() {
        let prompt = context("history").prompt();
        assert!(prompt.contains("Build login API"));
        assert!(prompt.contains("Planning"));
        assert!(prompt.contains("Code Tester: tests"));
        assert!(prompt.contains("PHASE_COMPLETED"));
        assert!(prompt.contains("DELIVERABLE_COMPLETED"));
    }
}
