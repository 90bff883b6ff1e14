//! Use cases: one struct per user-facing operation

pub mod begin_project;
pub mod export;
pub mod generate_team;
pub mod moderate;
pub mod run_discussion;
pub(crate) mod shared;
