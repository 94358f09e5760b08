//! Drives the branch, commit, pull request, merge workflow for each iteration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::github::{
    BadgeError, BadgeGateway, BranchName, CommitSha, FileChange, NewPullRequest,
    RepositoryLocator,
};
use crate::telemetry::{TelemetryEvent, TelemetrySink};

use super::naming::{ArtifactNames, RunStamp};
use super::template::{CommitTemplate, IterationContext};

/// Default pause between iterations.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(30);

/// What to do when an iteration fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the run at the first failed iteration.
    #[default]
    Abort,
    /// Log the failure and move on to the next iteration.
    Continue,
}

/// How the throwaway file is committed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommitMode {
    /// One create-or-update call against the contents API.
    #[default]
    Contents,
    /// Blob, tree, and commit objects followed by a ref update.
    GitData,
}

impl FromStr for CommitMode {
    type Err = BadgeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "contents" => Ok(Self::Contents),
            "git-data" | "git_data" | "gitdata" => Ok(Self::GitData),
            other => Err(BadgeError::Configuration {
                message: format!("unknown commit mode '{other}' (expected contents or git-data)"),
            }),
        }
    }
}

/// Workflow step reached by an iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationStep {
    /// Deriving names and rendering templates.
    Prepare,
    /// Looking up the base branch and its head commit.
    ResolveBase,
    /// Creating the head branch.
    CreateBranch,
    /// Committing the file on the head branch.
    CommitFile,
    /// Opening the pull request.
    OpenPullRequest,
    /// Merging the pull request.
    MergePullRequest,
}

impl fmt::Display for IterationStep {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Prepare => "prepare the change",
            Self::ResolveBase => "resolve the base branch",
            Self::CreateBranch => "create the branch",
            Self::CommitFile => "commit the file",
            Self::OpenPullRequest => "open the pull request",
            Self::MergePullRequest => "merge the pull request",
        };
        formatter.write_str(label)
    }
}

/// An iteration that stopped before its pull request was merged.
///
/// Branches and commits created before the failing step are left in place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("iteration {index} failed to {step}: {error}")]
pub struct IterationFailure {
    /// 1-based iteration number.
    pub index: u32,
    /// Step that failed.
    pub step: IterationStep,
    /// Underlying error.
    #[source]
    pub error: BadgeError,
}

/// A pull request the run opened and merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedPullRequest {
    /// 1-based iteration number.
    pub index: u32,
    /// Pull request number.
    pub number: u64,
    /// Head branch.
    pub branch: BranchName,
    /// Committed file path.
    pub path: String,
    /// HTML URL, when GitHub returned one.
    pub html_url: Option<String>,
    /// Merge commit SHA, when GitHub returned one.
    pub merge_sha: Option<CommitSha>,
}

/// Outcome of a run that was not aborted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Merged pull requests in iteration order.
    pub merged: Vec<MergedPullRequest>,
    /// Failed iterations in iteration order.
    pub failures: Vec<IterationFailure>,
}

impl RunReport {
    /// True when every iteration merged its pull request.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Everything the runner needs besides the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    /// Number of iterations.
    pub count: u32,
    /// Pause between the end of one iteration and the start of the next.
    pub delay: Duration,
    /// Behaviour after a failed iteration.
    pub policy: FailurePolicy,
    /// Commit strategy.
    pub mode: CommitMode,
    /// Base branch; the repository default branch when `None`.
    pub base_branch: Option<BranchName>,
    /// Branch and file naming.
    pub names: ArtifactNames,
    /// Commit and pull request text.
    pub template: CommitTemplate,
    /// Run stamp shared by every iteration.
    pub stamp: RunStamp,
}

impl RunPlan {
    /// Plan with default settings for `count` iterations stamped now.
    ///
    /// # Errors
    ///
    /// Returns [`BadgeError::InvalidCount`] when `count` is zero.
    pub fn new(count: u32) -> Result<Self, BadgeError> {
        if count == 0 {
            return Err(BadgeError::InvalidCount);
        }
        Ok(Self {
            count,
            delay: DEFAULT_DELAY,
            policy: FailurePolicy::default(),
            mode: CommitMode::default(),
            base_branch: None,
            names: ArtifactNames::default(),
            template: CommitTemplate::default(),
            stamp: RunStamp::now(),
        })
    }

    /// Renders the first iteration without contacting GitHub so template and
    /// naming problems surface before any remote call.
    ///
    /// # Errors
    ///
    /// Returns the naming or template error for iteration 1.
    pub fn validate(&self) -> Result<(), BadgeError> {
        if self.count == 0 {
            return Err(BadgeError::InvalidCount);
        }
        self.prepare(1).map(|_| ())
    }

    fn prepare(&self, index: u32) -> Result<PreparedIteration, BadgeError> {
        let branch = self.names.branch(self.stamp, index)?;
        let path = self.names.file_path(self.stamp, index);
        let rendered = self.template.render(IterationContext {
            index,
            count: self.count,
            branch: branch.as_str(),
            path: &path,
        })?;

        Ok(PreparedIteration {
            change: FileChange {
                path,
                content: rendered.content,
                message: rendered.message,
            },
            branch,
            pr_title: rendered.pr_title,
            pr_body: rendered.pr_body,
        })
    }
}

struct PreparedIteration {
    branch: BranchName,
    change: FileChange,
    pr_title: String,
    pr_body: String,
}

/// Runs badge iterations strictly one after another.
pub struct BadgeRunner<'a, Gateway>
where
    Gateway: BadgeGateway,
{
    gateway: &'a Gateway,
    repo: &'a RepositoryLocator,
    telemetry: &'a dyn TelemetrySink,
}

impl<'a, Gateway> BadgeRunner<'a, Gateway>
where
    Gateway: BadgeGateway,
{
    /// Create a runner for `repo` using the provided gateway.
    #[must_use]
    pub const fn new(
        gateway: &'a Gateway,
        repo: &'a RepositoryLocator,
        telemetry: &'a dyn TelemetrySink,
    ) -> Self {
        Self {
            gateway,
            repo,
            telemetry,
        }
    }

    /// Execute every iteration of `plan`, pausing `plan.delay` between them.
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::Abort`], returns the first failed iteration and
    /// attempts no further iterations. Under [`FailurePolicy::Continue`],
    /// failures are collected in the report and this never errors.
    pub async fn run(&self, plan: &RunPlan) -> Result<RunReport, IterationFailure> {
        let mut report = RunReport::default();
        tracing::info!(
            repository = %self.repo.slug(),
            count = plan.count,
            "starting badge run"
        );

        for index in 1..=plan.count {
            match self.run_iteration(plan, index).await {
                Ok(merged) => {
                    tracing::info!(
                        index,
                        branch = %merged.branch,
                        "pull request #{} created and merged",
                        merged.number
                    );
                    self.telemetry.record(TelemetryEvent::PullRequestMerged {
                        index,
                        number: merged.number,
                        branch: merged.branch.as_str().to_owned(),
                    });
                    report.merged.push(merged);
                }
                Err(failure) => {
                    tracing::error!(index, step = %failure.step, "{failure}");
                    self.telemetry.record(TelemetryEvent::IterationFailed {
                        index,
                        step: failure.step.to_string(),
                        message: failure.error.to_string(),
                    });
                    if plan.policy == FailurePolicy::Abort {
                        self.record_completion(&report, true);
                        return Err(failure);
                    }
                    report.failures.push(failure);
                }
            }

            if index < plan.count {
                tracing::info!(delay = ?plan.delay, "waiting before next pull request");
                tokio::time::sleep(plan.delay).await;
            }
        }

        self.record_completion(&report, false);
        Ok(report)
    }

    fn record_completion(&self, report: &RunReport, aborted: bool) {
        self.telemetry.record(TelemetryEvent::RunCompleted {
            merged: report.merged.len(),
            failed: report.failures.len() + usize::from(aborted),
            aborted,
        });
    }

    async fn run_iteration(
        &self,
        plan: &RunPlan,
        index: u32,
    ) -> Result<MergedPullRequest, IterationFailure> {
        let fail = |step: IterationStep| {
            move |error: BadgeError| IterationFailure { index, step, error }
        };

        let prepared = plan.prepare(index).map_err(fail(IterationStep::Prepare))?;

        let (base, head) = self
            .resolve_base(plan)
            .await
            .map_err(fail(IterationStep::ResolveBase))?;

        tracing::debug!(index, branch = %prepared.branch, head = %head, "creating branch");
        self.gateway
            .create_branch(self.repo, &prepared.branch, &head)
            .await
            .map_err(fail(IterationStep::CreateBranch))?;

        tracing::debug!(index, path = %prepared.change.path, mode = ?plan.mode, "committing file");
        self.commit_file(plan.mode, &prepared.branch, &head, &prepared.change)
            .await
            .map_err(fail(IterationStep::CommitFile))?;

        let request = NewPullRequest {
            title: prepared.pr_title,
            head: prepared.branch.clone(),
            base,
            body: prepared.pr_body,
        };
        let pull = self
            .gateway
            .create_pull_request(self.repo, &request)
            .await
            .map_err(fail(IterationStep::OpenPullRequest))?;

        tracing::debug!(index, number = pull.number, "merging pull request");
        let outcome = self
            .gateway
            .merge_pull_request(self.repo, pull.number)
            .await
            .map_err(fail(IterationStep::MergePullRequest))?;

        Ok(MergedPullRequest {
            index,
            number: pull.number,
            branch: prepared.branch,
            path: prepared.change.path,
            html_url: pull.html_url,
            merge_sha: outcome.sha,
        })
    }

    async fn resolve_base(&self, plan: &RunPlan) -> Result<(BranchName, CommitSha), BadgeError> {
        let base = match &plan.base_branch {
            Some(branch) => branch.clone(),
            None => {
                let metadata = self.gateway.repository(self.repo).await?;
                BranchName::new(metadata.default_branch)?
            }
        };
        let head = self.gateway.branch_head(self.repo, &base).await?;
        Ok((base, head))
    }

    async fn commit_file(
        &self,
        mode: CommitMode,
        branch: &BranchName,
        head: &CommitSha,
        change: &FileChange,
    ) -> Result<CommitSha, BadgeError> {
        match mode {
            CommitMode::Contents => {
                let existing = self.gateway.file_sha(self.repo, &change.path, branch).await?;
                self.gateway
                    .put_file(self.repo, branch, change, existing)
                    .await
            }
            CommitMode::GitData => {
                let blob = self.gateway.create_blob(self.repo, &change.content).await?;
                let base_tree = self.gateway.commit_tree(self.repo, head).await?;
                let tree = self
                    .gateway
                    .create_tree(self.repo, &base_tree, &change.path, &blob)
                    .await?;
                let commit = self
                    .gateway
                    .create_commit(self.repo, &change.message, &tree, head)
                    .await?;
                self.gateway.update_branch(self.repo, branch, &commit).await?;
                Ok(commit)
            }
        }
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
