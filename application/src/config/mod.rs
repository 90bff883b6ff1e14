//! Application-level configuration.
//!
//! - [`DiscussionConfig`] - discussion loop control (turns, throttle, retries)

pub mod discussion_config;

pub use discussion_config::DiscussionConfig;
