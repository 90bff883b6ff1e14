//! Output formatter trait

use teamforge_domain::Session;

/// Trait for formatting a session
pub trait OutputFormatter {
    /// Team, full transcript, whiteboard and checklist
    fn format(&self, session: &Session) -> String;

    /// Format as JSON
    fn format_json(&self, session: &Session) -> String;

    /// Most recent turn and checklist (concise output)
    fn format_summary(&self, session: &Session) -> String;
}
