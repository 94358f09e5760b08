//! Maps Octocrab failures onto [`BadgeError`] variants.

use http::StatusCode;
use octocrab::GitHubError;

use crate::github::error::BadgeError;

/// True when GitHub answered 404 Not Found.
pub(super) fn is_not_found(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::GitHub { source, .. } if source.status_code == StatusCode::NOT_FOUND
    )
}

/// GitHub signals an exhausted quota with 403 or 429 and a message or
/// documentation link naming the rate limit.
fn mentions_rate_limit(source: &GitHubError) -> bool {
    source.message.to_lowercase().contains("rate limit")
        || source
            .documentation_url
            .as_deref()
            .is_some_and(|url| url.contains("rate-limit"))
}

fn map_github_error(operation: &str, source: &GitHubError) -> BadgeError {
    let status = source.status_code;
    let message = &source.message;
    match status {
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS if mentions_rate_limit(source) => {
            BadgeError::RateLimited {
                message: format!("{operation} failed: {message}"),
            }
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BadgeError::Authentication {
            message: format!("{operation} failed: GitHub returned {status} {message}"),
        },
        _ => BadgeError::Api {
            message: format!("{operation} failed with status {status}: {message}"),
        },
    }
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> BadgeError {
    match error {
        octocrab::Error::GitHub { source, .. } => map_github_error(operation, source),
        octocrab::Error::Http { .. }
        | octocrab::Error::Hyper { .. }
        | octocrab::Error::Service { .. } => BadgeError::Network {
            message: format!("{operation} failed: {error}"),
        },
        _ => BadgeError::Api {
            message: format!("{operation} failed: {error}"),
        },
    }
}
