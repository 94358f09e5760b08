//! Error types exposed by the GitHub gateway and the badge runner.

use thiserror::Error;

/// Errors surfaced while resolving configuration or communicating with GitHub.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BadgeError {
    /// The authentication token was missing.
    #[error("personal access token is required (use --token or GITHUB_TOKEN)")]
    MissingToken,

    /// No target repository was configured.
    #[error("repository is required (use --repository or REPO, as owner/name)")]
    MissingRepository,

    /// The repository identifier could not be split into owner and name.
    #[error("repository must be given as owner/name or a GitHub URL: {0}")]
    InvalidRepository(String),

    /// A URL could not be parsed.
    #[error("URL is invalid: {0}")]
    InvalidUrl(String),

    /// The iteration count was zero.
    #[error("pull request count must be a positive integer")]
    InvalidCount,

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// A commit or pull request template failed to compile or render.
    #[error("template error: {message}")]
    Template {
        /// Template engine diagnostic.
        message: String,
    },

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// GitHub refused the request because the rate limit was exhausted.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimited {
        /// Error message from GitHub.
        message: String,
    },

    /// GitHub returned a non-authentication API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body from GitHub describing the failure.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// GitHub answered the merge call but did not merge the pull request.
    #[error("pull request #{number} was not merged: {message}")]
    MergeRejected {
        /// Pull request number.
        number: u64,
        /// Message returned by GitHub.
        message: String,
    },
}
