//! Gateway inputs pointing at the mock GitHub server.

use pairbadge::{PersonalAccessToken, RepositoryLocator};
use wiremock::MockServer;

/// Builds a locator for `octo/badges` that targets the mock server.
///
/// # Panics
///
/// Panics if the mock server URI is not a valid URL.
pub fn locator(server: &MockServer) -> RepositoryLocator {
    RepositoryLocator::parse("octo/badges")
        .and_then(|repo| repo.with_api_base(&server.uri()))
        .unwrap_or_else(|error| panic!("locator should build: {error}"))
}

/// A token accepted by every mock.
///
/// # Panics
///
/// Never in practice; the literal is non-blank.
pub fn token() -> PersonalAccessToken {
    PersonalAccessToken::new("ghp_test")
        .unwrap_or_else(|error| panic!("token should be valid: {error}"))
}
