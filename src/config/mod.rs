//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.pairbadge.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `PAIRBADGE_*`, plus the legacy
//!    `GITHUB_TOKEN`, `REPO`, `PRS_PER_RUN`, and `DELAY_MS` as fallbacks
//! 4. **Command-line arguments** – `--token`/`-t`, `--repository`/`-r`, ...
//!
//! # Configuration File
//!
//! ```toml
//! token = "ghp_example"
//! repository = "octocat/hello-world"
//! count = 5
//! delay_ms = 30000
//! continue_on_error = false
//! commit_mode = "contents"
//! co_author_name = "Pair Partner"
//! co_author_email = "pair-partner@users.noreply.github.com"
//! ```

use std::env;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::badge::naming::{DEFAULT_BRANCH_PREFIX, DEFAULT_FILE_PREFIX};
use crate::badge::template::{
    DEFAULT_CONTENT, DEFAULT_MESSAGE, DEFAULT_PR_BODY, DEFAULT_PR_TITLE, CoAuthor,
    CommitTemplate,
};
use crate::badge::{ArtifactNames, CommitMode, FailurePolicy, RunPlan, RunStamp};
use crate::github::{BadgeError, BranchName, PersonalAccessToken, RepositoryLocator};

/// Iterations per run when nothing is configured.
pub const DEFAULT_COUNT: u32 = 5;

/// Pause between iterations when nothing is configured.
pub const DEFAULT_DELAY_MS: u64 = 30_000;

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use pairbadge::PairBadgeConfig;
///
/// let config = PairBadgeConfig::load().expect("failed to load configuration");
/// let token = config.resolve_token().expect("token required");
/// let repo = config.resolve_repository().expect("repository required");
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "PAIRBADGE",
    discovery(
        dotfile_name = ".pairbadge.toml",
        config_file_name = "pairbadge.toml",
        app_name = "pairbadge"
    )
)]
pub struct PairBadgeConfig {
    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `PAIRBADGE_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Target repository as `owner/name` or a repository URL.
    ///
    /// Can be provided via:
    /// - CLI: `--repository <REPO>` or `-r <REPO>`
    /// - Environment: `PAIRBADGE_REPOSITORY` or `REPO` (legacy)
    /// - Config file: `repository = "..."`
    #[ortho_config(cli_short = 'r')]
    pub repository: Option<String>,

    /// API base URL, overriding the one derived from `repository`.
    ///
    /// Useful for GitHub Enterprise hosts that do not serve the API under
    /// `/api/v3`.
    #[ortho_config(cli_short = 'a')]
    pub api_url: Option<String>,

    /// Number of pull requests to create and merge.
    ///
    /// Can be provided via:
    /// - CLI: `--count <N>` or `-c <N>`
    /// - Environment: `PAIRBADGE_COUNT` or `PRS_PER_RUN` (legacy)
    /// - Config file: `count = 5`
    ///
    /// Defaults to 5.
    #[ortho_config(cli_short = 'c')]
    pub count: Option<u32>,

    /// Pause between iterations in milliseconds.
    ///
    /// Can be provided via:
    /// - CLI: `--delay-ms <MS>` or `-d <MS>`
    /// - Environment: `PAIRBADGE_DELAY_MS` or `DELAY_MS` (legacy)
    /// - Config file: `delay_ms = 30000`
    ///
    /// Defaults to 30 seconds.
    #[ortho_config(cli_short = 'd')]
    pub delay_ms: Option<u64>,

    /// Keeps going after a failed iteration instead of stopping the run.
    ///
    /// Can be provided via:
    /// - CLI: `--continue-on-error` / `-k`
    /// - Config file: `continue_on_error = true`
    ///
    /// Note: there is no environment variable because `ortho_config` does not
    /// load boolean values from the environment.
    #[ortho_config(cli_short = 'k')]
    pub continue_on_error: bool,

    /// `contents` (create-or-update file call) or `git-data` (blob, tree,
    /// commit, and ref update calls). Defaults to `contents`.
    #[ortho_config(cli_short = 'm')]
    pub commit_mode: Option<String>,

    /// Branch to merge into; defaults to the repository's default branch.
    #[ortho_config(cli_short = 'b')]
    pub base_branch: Option<String>,

    /// Name credited in the `Co-authored-by` trailer.
    #[ortho_config(cli_short = 'N')]
    pub co_author_name: Option<String>,

    /// Email credited in the `Co-authored-by` trailer.
    #[ortho_config(cli_short = 'E')]
    pub co_author_email: Option<String>,

    /// Prefix for generated branch names.
    #[ortho_config(cli_short = 'B')]
    pub branch_prefix: Option<String>,

    /// Prefix for generated file paths.
    #[ortho_config(cli_short = 'F')]
    pub file_prefix: Option<String>,

    /// Commit subject template.
    #[ortho_config(cli_short = 'M')]
    pub message: Option<String>,

    /// File content template.
    #[ortho_config(cli_short = 'C')]
    pub content: Option<String>,

    /// Pull request title template.
    #[ortho_config(cli_short = 'P')]
    pub pr_title: Option<String>,

    /// Pull request body template.
    #[ortho_config(cli_short = 'D')]
    pub pr_body: Option<String>,

    /// Emits structured run events to stderr as JSON lines.
    ///
    /// Can be provided via:
    /// - CLI: `--telemetry` / `-T`
    /// - Config file: `telemetry = true`
    #[ortho_config(cli_short = 'T')]
    pub telemetry: bool,
}

/// Reads a legacy environment variable, ignoring blanks.
fn legacy_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Reads a positive number from a legacy environment variable; zero and
/// unparseable values count as unset.
fn legacy_number<T>(name: &str) -> Option<T>
where
    T: std::str::FromStr + Default + PartialOrd,
{
    legacy_env(name)
        .and_then(|raw| raw.trim().parse::<T>().ok())
        .filter(|value| *value > T::default())
}

impl PairBadgeConfig {
    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`BadgeError::MissingToken`] when no token source provides a
    /// non-blank value.
    pub fn resolve_token(&self) -> Result<PersonalAccessToken, BadgeError> {
        let token = self
            .token
            .clone()
            .or_else(|| legacy_env("GITHUB_TOKEN"))
            .ok_or(BadgeError::MissingToken)?;
        PersonalAccessToken::new(token)
    }

    /// Resolves the target repository from configuration or the legacy
    /// `REPO` environment variable, applying `api_url` when set.
    ///
    /// # Errors
    ///
    /// Returns [`BadgeError::MissingRepository`] when no repository is
    /// configured, or the parse error for a malformed identifier.
    pub fn resolve_repository(&self) -> Result<RepositoryLocator, BadgeError> {
        let identifier = self
            .repository
            .clone()
            .or_else(|| legacy_env("REPO"))
            .ok_or(BadgeError::MissingRepository)?;
        let locator = RepositoryLocator::parse(&identifier)?;
        match self.api_url.as_deref() {
            Some(api_url) => locator.with_api_base(api_url),
            None => Ok(locator),
        }
    }

    /// Iteration count, falling back to `PRS_PER_RUN` and then the default.
    ///
    /// A legacy value that is zero or unparseable falls back to the default.
    ///
    /// # Errors
    ///
    /// Returns [`BadgeError::InvalidCount`] when the resolved count is zero.
    pub fn resolve_count(&self) -> Result<u32, BadgeError> {
        let count = self
            .count
            .or_else(|| legacy_number("PRS_PER_RUN"))
            .unwrap_or(DEFAULT_COUNT);
        if count == 0 {
            return Err(BadgeError::InvalidCount);
        }
        Ok(count)
    }

    /// Pause between iterations, falling back to `DELAY_MS` and then the
    /// default. A legacy `DELAY_MS=0` also means the default.
    #[must_use]
    pub fn resolve_delay(&self) -> Duration {
        let millis = self
            .delay_ms
            .or_else(|| legacy_number("DELAY_MS"))
            .unwrap_or(DEFAULT_DELAY_MS);
        Duration::from_millis(millis)
    }

    /// Failure policy selected by `continue_on_error`.
    #[must_use]
    pub const fn failure_policy(&self) -> FailurePolicy {
        if self.continue_on_error {
            FailurePolicy::Continue
        } else {
            FailurePolicy::Abort
        }
    }

    /// Builds the run plan and renders the first iteration as a dry run, so
    /// every configuration problem surfaces before any remote call.
    ///
    /// # Errors
    ///
    /// Returns [`BadgeError::InvalidCount`], [`BadgeError::Configuration`], or
    /// [`BadgeError::Template`] for invalid settings.
    pub fn run_plan(&self) -> Result<RunPlan, BadgeError> {
        let mode = self
            .commit_mode
            .as_deref()
            .map(str::parse::<CommitMode>)
            .transpose()?
            .unwrap_or_default();
        let base_branch = self
            .base_branch
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(BranchName::new)
            .transpose()?;
        let names = ArtifactNames::new(
            self.branch_prefix.as_deref().unwrap_or(DEFAULT_BRANCH_PREFIX),
            self.file_prefix.as_deref().unwrap_or(DEFAULT_FILE_PREFIX),
        )?;
        let template = self.commit_template()?;

        let plan = RunPlan {
            count: self.resolve_count()?,
            delay: self.resolve_delay(),
            policy: self.failure_policy(),
            mode,
            base_branch,
            names,
            template,
            stamp: RunStamp::now(),
        };
        plan.validate()?;
        Ok(plan)
    }

    fn commit_template(&self) -> Result<CommitTemplate, BadgeError> {
        let defaults = CoAuthor::default();
        let co_author = CoAuthor::new(
            self.co_author_name.as_deref().unwrap_or(defaults.name()),
            self.co_author_email.as_deref().unwrap_or(defaults.email()),
        )?;

        Ok(CommitTemplate {
            co_author,
            message: self.message.as_deref().unwrap_or(DEFAULT_MESSAGE).to_owned(),
            content: self.content.as_deref().unwrap_or(DEFAULT_CONTENT).to_owned(),
            pr_title: self.pr_title.as_deref().unwrap_or(DEFAULT_PR_TITLE).to_owned(),
            pr_body: self.pr_body.as_deref().unwrap_or(DEFAULT_PR_BODY).to_owned(),
        })
    }
}

#[cfg(test)]
mod tests;
