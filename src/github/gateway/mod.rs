//! Gateway over the GitHub REST operations the badge workflow consumes.
//!
//! The trait keeps the runner independent of Octocrab so tests can drive it
//! with a mock, while [`OctocrabGateway`] performs the real HTTP requests.

mod client;
mod error_mapping;
mod rest;

pub use rest::OctocrabGateway;

use async_trait::async_trait;

use crate::github::error::BadgeError;
use crate::github::locator::RepositoryLocator;
use crate::github::models::{
    BranchName, CommitSha, CreatedPullRequest, FileChange, MergeOutcome, NewPullRequest,
    RepositoryMetadata,
};

/// Remote operations needed to branch, commit, open, and merge a pull request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BadgeGateway: Send + Sync {
    /// Fetch repository metadata, including the default branch.
    async fn repository(
        &self,
        repo: &RepositoryLocator,
    ) -> Result<RepositoryMetadata, BadgeError>;

    /// Resolve the commit a branch currently points at.
    async fn branch_head(
        &self,
        repo: &RepositoryLocator,
        branch: &BranchName,
    ) -> Result<CommitSha, BadgeError>;

    /// Create `refs/heads/<branch>` pointing at `sha`.
    async fn create_branch(
        &self,
        repo: &RepositoryLocator,
        branch: &BranchName,
        sha: &CommitSha,
    ) -> Result<(), BadgeError>;

    /// Blob SHA of `path` on `branch`, or `None` when the file does not exist.
    async fn file_sha(
        &self,
        repo: &RepositoryLocator,
        path: &str,
        branch: &BranchName,
    ) -> Result<Option<CommitSha>, BadgeError>;

    /// Create or update a file through the contents API, returning the new
    /// commit SHA. `existing` must carry the current blob SHA when updating.
    async fn put_file(
        &self,
        repo: &RepositoryLocator,
        branch: &BranchName,
        change: &FileChange,
        existing: Option<CommitSha>,
    ) -> Result<CommitSha, BadgeError>;

    /// Upload a UTF-8 blob and return its SHA.
    async fn create_blob(
        &self,
        repo: &RepositoryLocator,
        content: &str,
    ) -> Result<CommitSha, BadgeError>;

    /// Tree SHA of a commit.
    async fn commit_tree(
        &self,
        repo: &RepositoryLocator,
        commit: &CommitSha,
    ) -> Result<CommitSha, BadgeError>;

    /// Create a tree on top of `base_tree` with a single regular file entry.
    async fn create_tree(
        &self,
        repo: &RepositoryLocator,
        base_tree: &CommitSha,
        path: &str,
        blob: &CommitSha,
    ) -> Result<CommitSha, BadgeError>;

    /// Create a commit object with one parent.
    async fn create_commit(
        &self,
        repo: &RepositoryLocator,
        message: &str,
        tree: &CommitSha,
        parent: &CommitSha,
    ) -> Result<CommitSha, BadgeError>;

    /// Fast-forward `branch` to `sha`.
    async fn update_branch(
        &self,
        repo: &RepositoryLocator,
        branch: &BranchName,
        sha: &CommitSha,
    ) -> Result<(), BadgeError>;

    /// Open a pull request.
    async fn create_pull_request(
        &self,
        repo: &RepositoryLocator,
        request: &NewPullRequest,
    ) -> Result<CreatedPullRequest, BadgeError>;

    /// Merge a pull request with the `merge` strategy.
    async fn merge_pull_request(
        &self,
        repo: &RepositoryLocator,
        number: u64,
    ) -> Result<MergeOutcome, BadgeError>;
}
