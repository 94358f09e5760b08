//! Data models exchanged with the GitHub REST API.
//!
//! Types prefixed with `Api` are internal deserialisation targets that convert
//! into public domain types. Types suffixed with `Request` are serialised as
//! request bodies.

use serde::{Deserialize, Serialize};

use super::error::BadgeError;

/// Git branch name without the `refs/heads/` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchName(String);

impl BranchName {
    /// Wraps a branch name, rejecting blanks and full ref paths.
    ///
    /// # Errors
    ///
    /// Returns [`BadgeError::Configuration`] when the name is blank, starts
    /// with `refs/`, or contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, BadgeError> {
        let name = value.into();
        if name.is_empty() || name.starts_with("refs/") || name.contains(char::is_whitespace) {
            return Err(BadgeError::Configuration {
                message: format!("invalid branch name '{name}'"),
            });
        }
        Ok(Self(name))
    }

    /// Borrow the branch name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Fully qualified ref, e.g. `refs/heads/main`.
    #[must_use]
    pub fn full_ref(&self) -> String {
        format!("refs/heads/{}", self.0)
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Git object SHA (commit, tree, or blob).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitSha(String);

impl CommitSha {
    /// Wraps a SHA string as returned by GitHub.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the SHA.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for CommitSha {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Repository metadata the runner needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryMetadata {
    /// Full `owner/name`.
    pub full_name: Option<String>,
    /// Branch pull requests target when no base branch is configured.
    pub default_branch: String,
}

/// File to commit on a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// Repository-relative path.
    pub path: String,
    /// Plain-text file content.
    pub content: String,
    /// Full commit message including trailers.
    pub message: String,
}

/// Pull request to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPullRequest {
    /// Pull request title.
    pub title: String,
    /// Branch holding the change.
    pub head: BranchName,
    /// Branch to merge into.
    pub base: BranchName,
    /// Pull request description.
    pub body: String,
}

/// Pull request as returned after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPullRequest {
    /// Pull request number.
    pub number: u64,
    /// HTML URL for display.
    pub html_url: Option<String>,
}

/// Result of a merge call that GitHub accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Merge commit SHA.
    pub sha: Option<CommitSha>,
    /// Status message from GitHub.
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiRepository {
    pub(super) full_name: Option<String>,
    pub(super) default_branch: String,
}

impl From<ApiRepository> for RepositoryMetadata {
    fn from(api: ApiRepository) -> Self {
        Self {
            full_name: api.full_name,
            default_branch: api.default_branch,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiGitObject {
    pub(super) sha: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiReference {
    pub(super) object: ApiGitObject,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiContentFile {
    pub(super) sha: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiContentUpdate {
    pub(super) commit: ApiGitObject,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCommit {
    pub(super) tree: ApiGitObject,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequest {
    pub(super) number: u64,
    pub(super) html_url: Option<String>,
}

impl From<ApiPullRequest> for CreatedPullRequest {
    fn from(api: ApiPullRequest) -> Self {
        Self {
            number: api.number,
            html_url: api.html_url,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiMergeResult {
    pub(super) sha: Option<String>,
    pub(super) merged: bool,
    pub(super) message: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct CreateRefRequest<'a> {
    #[serde(rename = "ref")]
    pub(super) reference: String,
    pub(super) sha: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct UpdateRefRequest<'a> {
    pub(super) sha: &'a str,
    pub(super) force: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct PutContentsRequest<'a> {
    pub(super) message: &'a str,
    pub(super) content: String,
    pub(super) branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) sha: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(super) struct ContentsQuery<'a> {
    #[serde(rename = "ref")]
    pub(super) reference: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct CreateBlobRequest<'a> {
    pub(super) content: &'a str,
    pub(super) encoding: &'static str,
}

#[derive(Debug, Serialize)]
pub(super) struct TreeEntryRequest<'a> {
    pub(super) path: &'a str,
    pub(super) mode: &'static str,
    #[serde(rename = "type")]
    pub(super) kind: &'static str,
    pub(super) sha: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct CreateTreeRequest<'a> {
    pub(super) base_tree: &'a str,
    pub(super) tree: Vec<TreeEntryRequest<'a>>,
}

#[derive(Debug, Serialize)]
pub(super) struct CreateCommitRequest<'a> {
    pub(super) message: &'a str,
    pub(super) tree: &'a str,
    pub(super) parents: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
pub(super) struct CreatePullRequestRequest<'a> {
    pub(super) title: &'a str,
    pub(super) head: &'a str,
    pub(super) base: &'a str,
    pub(super) body: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct MergePullRequestRequest {
    pub(super) merge_method: &'static str,
}
