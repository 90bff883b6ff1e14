//! Session domain.
//!
//! - [`entities::Session`] - the state one user works on
//! - [`entities::Message`] - a single message sent to the completion service

pub mod entities;
