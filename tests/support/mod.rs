//! Shared test utilities.

pub mod client;
pub mod github;
