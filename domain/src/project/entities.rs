//! Project entity

use super::deliverable::DeliverableTracker;
use super::phase::Phase;
use serde::{Deserialize, Serialize};

/// What applying one round of moderator signals changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalOutcome {
    /// Deliverable index and phase marked complete
    pub phase_marked: Option<(usize, Phase)>,
    /// Deliverable index completed outright
    pub deliverable_completed: Option<usize>,
    /// New global phase, if it advanced
    pub advanced_to: Option<Phase>,
}

impl SignalOutcome {
    pub fn changed(&self) -> bool {
        self.phase_marked.is_some()
            || self.deliverable_completed.is_some()
            || self.advanced_to.is_some()
    }
}

/// The live project of a session (Entity)
///
/// `current_phase` is global: it only moves forward, and only when no
/// deliverable still owes work in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    re_engineered_prompt: String,
    deliverables: DeliverableTracker,
    current_phase: Phase,
}

impl Project {
    pub fn new(re_engineered_prompt: impl Into<String>, deliverables: DeliverableTracker) -> Self {
        Self {
            re_engineered_prompt: re_engineered_prompt.into(),
            deliverables,
            current_phase: Phase::Planning,
        }
    }

    pub fn re_engineered_prompt(&self) -> &str {
        &self.re_engineered_prompt
    }

    pub fn deliverables(&self) -> &DeliverableTracker {
        &self.deliverables
    }

    pub fn deliverables_mut(&mut self) -> &mut DeliverableTracker {
        &mut self.deliverables
    }

    pub fn current_phase(&self) -> Phase {
        self.current_phase
    }

    /// Move to the next phase; stays put at the last phase.
    pub fn advance_phase(&mut self) -> bool {
        match self.current_phase.next() {
            Some(next) => {
                self.current_phase = next;
                true
            }
            None => false,
        }
    }

    /// Deliverable the discussion is working on: the first one still owing
    /// the current phase, else the first one not done.
    pub fn current_deliverable(&self) -> Option<usize> {
        self.deliverables
            .first_pending_in(self.current_phase)
            .or_else(|| self.deliverables.next_unchecked().map(|(i, _)| i))
    }

    /// Text of [`Self::current_deliverable`]
    pub fn current_deliverable_text(&self) -> Option<&str> {
        self.current_deliverable()
            .and_then(|i| self.deliverables.get(i))
            .map(|d| d.text())
    }

    pub fn is_complete(&self) -> bool {
        self.deliverables.all_done()
    }

    /// Apply the moderator's completion signals.
    ///
    /// Phase completion is applied first, to the current deliverable in the
    /// current phase. Deliverable completion is then evaluated against the
    /// updated state and completes the (possibly new) current deliverable's
    /// remaining phases. Finally the global phase advances while the current
    /// one is exhausted and the project is not complete.
    pub fn apply_signals(&mut self, phase_completed: bool, deliverable_completed: bool) -> SignalOutcome {
        let mut outcome = SignalOutcome::default();

        if phase_completed && let Some(index) = self.current_deliverable() {
            let phase = self.current_phase;
            let already_done = self
                .deliverables
                .get(index)
                .is_some_and(|d| d.is_phase_done(phase));
            if !already_done && self.deliverables.mark_phase_done(index, phase).is_ok() {
                outcome.phase_marked = Some((index, phase));
            }
        }

        if deliverable_completed {
            let target = outcome
                .phase_marked
                .map(|(i, _)| i)
                .filter(|i| self.deliverables.get(*i).is_some_and(|d| !d.is_done()))
                .or_else(|| self.current_deliverable());
            if let Some(index) = target
                && self.deliverables.complete(index).is_ok()
            {
                outcome.deliverable_completed = Some(index);
            }
        }

        while !self.is_complete()
            && self.deliverables.phase_exhausted(self.current_phase)
            && self.advance_phase()
        {
            outcome.advanced_to = Some(self.current_phase);
        }

        outcome
    }
}
