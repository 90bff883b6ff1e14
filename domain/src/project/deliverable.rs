//! Deliverables and the phase tracker.
//!
//! `done` is derived state: it is recomputed from the phase flags at every
//! mutation and can never be set on its own.

use super::phase::Phase;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A unit of project output tracked through every [`Phase`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deliverable {
    text: String,
    done: bool,
    phase_status: BTreeMap<Phase, bool>,
}

impl Deliverable {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            done: false,
            phase_status: Phase::ALL.iter().map(|p| (*p, false)).collect(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn phase_status(&self) -> &BTreeMap<Phase, bool> {
        &self.phase_status
    }

    pub fn is_phase_done(&self, phase: Phase) -> bool {
        self.phase_status.get(&phase).copied().unwrap_or(false)
    }

    /// First phase not yet completed
    pub fn next_uncompleted_phase(&self) -> Option<Phase> {
        Phase::ALL.into_iter().find(|p| !self.is_phase_done(*p))
    }

    pub fn mark_phase_done(&mut self, phase: Phase) {
        self.phase_status.insert(phase, true);
        self.recompute();
    }

    /// Complete every remaining phase
    pub fn complete_all(&mut self) {
        for phase in Phase::ALL {
            self.phase_status.insert(phase, true);
        }
        self.recompute();
    }

    /// Reopen the deliverable.
    ///
    /// Only the final phase flag is cleared: earlier progress is kept and
    /// `done` stays equal to the conjunction of the flags.
    pub fn mark_undone(&mut self) {
        if let Some(last) = Phase::ALL.last() {
            self.phase_status.insert(*last, false);
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        self.done = Phase::ALL.iter().all(|p| self.is_phase_done(*p));
    }
}

/// Ordered list of deliverables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliverableTracker {
    deliverables: Vec<Deliverable>,
}

impl DeliverableTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tracker = Self::new();
        for text in texts {
            tracker.add(text);
        }
        tracker
    }

    /// Append a deliverable with every phase pending
    pub fn add(&mut self, text: impl Into<String>) -> usize {
        self.deliverables.push(Deliverable::new(text));
        self.deliverables.len() - 1
    }

    pub fn len(&self) -> usize {
        self.deliverables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deliverables.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Deliverable> {
        self.deliverables.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Deliverable> {
        self.deliverables.iter()
    }

    fn get_mut(&mut self, index: usize) -> Result<&mut Deliverable, DomainError> {
        self.deliverables
            .get_mut(index)
            .ok_or(DomainError::DeliverableOutOfRange(index))
    }

    pub fn mark_phase_done(&mut self, index: usize, phase: Phase) -> Result<(), DomainError> {
        self.get_mut(index)?.mark_phase_done(phase);
        Ok(())
    }

    pub fn complete(&mut self, index: usize) -> Result<(), DomainError> {
        self.get_mut(index)?.complete_all();
        Ok(())
    }

    pub fn mark_undone(&mut self, index: usize) -> Result<(), DomainError> {
        self.get_mut(index)?.mark_undone();
        Ok(())
    }

    /// First deliverable not yet done
    pub fn next_unchecked(&self) -> Option<(usize, &str)> {
        self.deliverables
            .iter()
            .enumerate()
            .find(|(_, d)| !d.is_done())
            .map(|(i, d)| (i, d.text()))
    }

    pub fn next_uncompleted_phase(&self, index: usize) -> Option<Phase> {
        self.deliverables
            .get(index)
            .and_then(Deliverable::next_uncompleted_phase)
    }

    /// First deliverable still owing work in `phase`
    pub fn first_pending_in(&self, phase: Phase) -> Option<usize> {
        self.deliverables
            .iter()
            .position(|d| !d.is_done() && !d.is_phase_done(phase))
    }

    /// No deliverable still owes work in `phase`
    pub fn phase_exhausted(&self, phase: Phase) -> bool {
        self.first_pending_in(phase).is_none()
    }

    pub fn all_done(&self) -> bool {
        self.deliverables.iter().all(Deliverable::is_done)
    }

    pub fn done_count(&self) -> usize {
        self.deliverables.iter().filter(|d| d.is_done()).count()
    }
}
