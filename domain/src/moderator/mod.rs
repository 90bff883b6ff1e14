//! Moderator protocol: prompt context and directive parsing

pub mod context;
pub mod directive;
