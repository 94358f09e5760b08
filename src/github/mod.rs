//! GitHub REST access for the badge workflow.
//!
//! This module wraps Octocrab behind the [`BadgeGateway`] trait, validates the
//! repository identifier and token, and maps Octocrab failures into
//! [`BadgeError`] variants so callers can report precise failures without
//! exposing Octocrab internals.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;

pub use error::BadgeError;
pub use gateway::{BadgeGateway, OctocrabGateway};
pub use locator::{PersonalAccessToken, RepositoryLocator, RepositoryName, RepositoryOwner};
pub use models::{
    BranchName, CommitSha, CreatedPullRequest, FileChange, MergeOutcome, NewPullRequest,
    RepositoryMetadata,
};

#[cfg(test)]
pub use gateway::MockBadgeGateway;

#[cfg(test)]
mod tests;
