//! Project subdomain: the [`Project`](entities::Project), its deliverables
//! and the phase state machine they move through.

pub mod deliverable;
pub mod entities;
pub mod parser;
pub mod phase;
