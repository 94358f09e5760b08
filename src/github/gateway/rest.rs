//! Octocrab implementation of the badge gateway.
//!
//! Requests go through Octocrab's raw route helpers so the request and
//! response shapes stay limited to the fields the workflow uses.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use octocrab::Octocrab;

use crate::github::error::BadgeError;
use crate::github::locator::{PersonalAccessToken, RepositoryLocator};
use crate::github::models::{
    ApiCommit, ApiContentFile, ApiContentUpdate, ApiGitObject, ApiMergeResult, ApiPullRequest,
    ApiReference, ApiRepository, BranchName, CommitSha, ContentsQuery, CreateBlobRequest,
    CreateCommitRequest, CreatePullRequestRequest, CreateRefRequest, CreateTreeRequest,
    CreatedPullRequest, FileChange, MergeOutcome, MergePullRequestRequest, NewPullRequest,
    PutContentsRequest, RepositoryMetadata, TreeEntryRequest, UpdateRefRequest,
};

use super::BadgeGateway;
use super::client::build_octocrab_client;
use super::error_mapping::{is_not_found, map_octocrab_error};

const REGULAR_FILE_MODE: &str = "100644";

/// Octocrab-backed gateway.
pub struct OctocrabGateway {
    client: Octocrab,
}

impl OctocrabGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client for the token and the locator's API base.
    ///
    /// # Errors
    ///
    /// Returns `BadgeError::InvalidUrl` when the base URI cannot be parsed or
    /// `BadgeError::Api` when Octocrab fails to construct a client.
    pub fn for_token(
        token: &PersonalAccessToken,
        repo: &RepositoryLocator,
    ) -> Result<Self, BadgeError> {
        let octocrab = build_octocrab_client(token, repo.api_base().as_str())?;
        Ok(Self::new(octocrab))
    }
}

#[async_trait]
impl BadgeGateway for OctocrabGateway {
    async fn repository(
        &self,
        repo: &RepositoryLocator,
    ) -> Result<RepositoryMetadata, BadgeError> {
        let api: ApiRepository = self
            .client
            .get(repo.repository_path(), None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("get repository", &error))?;
        Ok(api.into())
    }

    async fn branch_head(
        &self,
        repo: &RepositoryLocator,
        branch: &BranchName,
    ) -> Result<CommitSha, BadgeError> {
        let reference: ApiReference = self
            .client
            .get(repo.branch_ref_path(branch.as_str()), None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("get ref", &error))?;
        Ok(CommitSha::new(reference.object.sha))
    }

    async fn create_branch(
        &self,
        repo: &RepositoryLocator,
        branch: &BranchName,
        sha: &CommitSha,
    ) -> Result<(), BadgeError> {
        let body = CreateRefRequest {
            reference: branch.full_ref(),
            sha: sha.as_str(),
        };
        let _created: ApiReference = self
            .client
            .post(repo.refs_path(), Some(&body))
            .await
            .map_err(|error| map_octocrab_error("create ref", &error))?;
        Ok(())
    }

    async fn file_sha(
        &self,
        repo: &RepositoryLocator,
        path: &str,
        branch: &BranchName,
    ) -> Result<Option<CommitSha>, BadgeError> {
        let query = ContentsQuery {
            reference: branch.as_str(),
        };
        let result: Result<ApiContentFile, octocrab::Error> =
            self.client.get(repo.contents_path(path), Some(&query)).await;

        match result {
            Ok(file) => Ok(Some(CommitSha::new(file.sha))),
            Err(error) if is_not_found(&error) => Ok(None),
            Err(error) => Err(map_octocrab_error("get content", &error)),
        }
    }

    async fn put_file(
        &self,
        repo: &RepositoryLocator,
        branch: &BranchName,
        change: &FileChange,
        existing: Option<CommitSha>,
    ) -> Result<CommitSha, BadgeError> {
        let body = PutContentsRequest {
            message: &change.message,
            content: BASE64.encode(change.content.as_bytes()),
            branch: branch.as_str(),
            sha: existing.as_ref().map(CommitSha::as_str),
        };
        let update: ApiContentUpdate = self
            .client
            .put(repo.contents_path(&change.path), Some(&body))
            .await
            .map_err(|error| map_octocrab_error("create or update file", &error))?;
        Ok(CommitSha::new(update.commit.sha))
    }

    async fn create_blob(
        &self,
        repo: &RepositoryLocator,
        content: &str,
    ) -> Result<CommitSha, BadgeError> {
        let body = CreateBlobRequest {
            content,
            encoding: "utf-8",
        };
        let blob: ApiGitObject = self
            .client
            .post(repo.blobs_path(), Some(&body))
            .await
            .map_err(|error| map_octocrab_error("create blob", &error))?;
        Ok(CommitSha::new(blob.sha))
    }

    async fn commit_tree(
        &self,
        repo: &RepositoryLocator,
        commit: &CommitSha,
    ) -> Result<CommitSha, BadgeError> {
        let api: ApiCommit = self
            .client
            .get(repo.commit_path(commit.as_str()), None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("get commit", &error))?;
        Ok(CommitSha::new(api.tree.sha))
    }

    async fn create_tree(
        &self,
        repo: &RepositoryLocator,
        base_tree: &CommitSha,
        path: &str,
        blob: &CommitSha,
    ) -> Result<CommitSha, BadgeError> {
        let body = CreateTreeRequest {
            base_tree: base_tree.as_str(),
            tree: vec![TreeEntryRequest {
                path,
                mode: REGULAR_FILE_MODE,
                kind: "blob",
                sha: blob.as_str(),
            }],
        };
        let tree: ApiGitObject = self
            .client
            .post(repo.trees_path(), Some(&body))
            .await
            .map_err(|error| map_octocrab_error("create tree", &error))?;
        Ok(CommitSha::new(tree.sha))
    }

    async fn create_commit(
        &self,
        repo: &RepositoryLocator,
        message: &str,
        tree: &CommitSha,
        parent: &CommitSha,
    ) -> Result<CommitSha, BadgeError> {
        let body = CreateCommitRequest {
            message,
            tree: tree.as_str(),
            parents: vec![parent.as_str()],
        };
        let commit: ApiGitObject = self
            .client
            .post(repo.commits_path(), Some(&body))
            .await
            .map_err(|error| map_octocrab_error("create commit", &error))?;
        Ok(CommitSha::new(commit.sha))
    }

    async fn update_branch(
        &self,
        repo: &RepositoryLocator,
        branch: &BranchName,
        sha: &CommitSha,
    ) -> Result<(), BadgeError> {
        let body = UpdateRefRequest {
            sha: sha.as_str(),
            force: false,
        };
        let _updated: ApiReference = self
            .client
            .patch(repo.update_ref_path(branch.as_str()), Some(&body))
            .await
            .map_err(|error| map_octocrab_error("update ref", &error))?;
        Ok(())
    }

    async fn create_pull_request(
        &self,
        repo: &RepositoryLocator,
        request: &NewPullRequest,
    ) -> Result<CreatedPullRequest, BadgeError> {
        let body = CreatePullRequestRequest {
            title: &request.title,
            head: request.head.as_str(),
            base: request.base.as_str(),
            body: &request.body,
        };
        let pull: ApiPullRequest = self
            .client
            .post(repo.pulls_path(), Some(&body))
            .await
            .map_err(|error| map_octocrab_error("create pull request", &error))?;
        Ok(pull.into())
    }

    async fn merge_pull_request(
        &self,
        repo: &RepositoryLocator,
        number: u64,
    ) -> Result<MergeOutcome, BadgeError> {
        let body = MergePullRequestRequest {
            merge_method: "merge",
        };
        let result: ApiMergeResult = self
            .client
            .put(repo.merge_path(number), Some(&body))
            .await
            .map_err(|error| map_octocrab_error("merge pull request", &error))?;

        if !result.merged {
            return Err(BadgeError::MergeRejected {
                number,
                message: result
                    .message
                    .unwrap_or_else(|| "GitHub did not merge the pull request".to_owned()),
            });
        }

        Ok(MergeOutcome {
            sha: result.sha.map(CommitSha::new),
            message: result.message,
        })
    }
}
