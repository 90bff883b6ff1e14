//! Agent subdomain: descriptors parsed from LLM output, the [`Agent`]
//! entity, the record builder that shapes agents for export, and the
//! [`Roster`] of live speakers.
//!
//! [`Agent`]: entities::Agent
//! [`Roster`]: roster::Roster

pub mod builder;
pub mod entities;
pub mod parser;
pub mod records;
pub mod roster;
pub mod value_objects;
