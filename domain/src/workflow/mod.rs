//! Workflow assembly: roster plus sender/receiver wiring

pub mod assembler;
pub mod document;

pub use assembler::{TERMINATE, assemble};
pub use document::{SkillDocument, WorkflowDocument};
