//! Prompt domain
//!
//! Templates for every LLM call made during a session.

pub mod template;

pub use template::PromptTemplate;
