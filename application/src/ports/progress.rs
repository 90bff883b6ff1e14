//! Progress notification port
//!
//! Defines the interface for reporting progress while a team is generated
//! and while the discussion runs.

use teamforge_domain::{DiscussionTurn, ModeratorDirective, Phase};

/// Callback for progress updates during a session
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, plain log lines, nothing).
pub trait ProgressNotifier: Send + Sync {
    /// Called before an LLM-backed step starts (e.g. "rephrase", "moderator")
    fn on_step_start(&self, step: &str);

    /// Called when that step finishes
    fn on_step_complete(&self, step: &str, success: bool);

    /// Called before a failed call is retried
    fn on_retry(&self, _step: &str, _attempt: u32, _max_attempts: u32, _error: &str) {}

    /// Called when the moderator produced a valid directive
    fn on_directive(&self, _directive: &ModeratorDirective) {}

    /// Called when the moderator response was rejected
    fn on_directive_rejected(&self, _reason: &str) {}

    /// Called after a turn is appended to the log
    fn on_turn(&self, _turn: &DiscussionTurn) {}

    /// Called when the global phase advances
    fn on_phase_advanced(&self, _phase: Phase) {}

    /// Called when a deliverable becomes done
    fn on_deliverable_completed(&self, _index: usize, _text: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_step_start(&self, _step: &str) {}
    fn on_step_complete(&self, _step: &str, _success: bool) {}
}
