//! Core domain concepts shared across all subdomains.
//!
//! - [`request::UserRequest`] - a validated free-text request for a team
//! - [`sanitize::sanitize`] - character filter applied before interpolation
//! - [`error::DomainError`] - domain-level errors

pub mod error;
pub mod request;
pub mod sanitize;
pub mod string;
