//! Interactive chat module
//!
//! A reedline-based session where the user starts a project, steps the
//! discussion, and talks to agents directly.

pub mod commands;
mod repl;

pub use commands::ReplCommand;
pub use repl::ChatRepl;
