//! Unit tests for repository identity, token, and branch validation.

use rstest::rstest;

use super::{BadgeError, BranchName, PersonalAccessToken, RepositoryLocator};

#[rstest]
fn parses_owner_name_slug() {
    let locator = RepositoryLocator::parse("octo/repo").expect("slug should parse");
    assert_eq!(locator.owner().as_str(), "octo", "owner mismatch");
    assert_eq!(locator.repository().as_str(), "repo", "repository mismatch");
    assert_eq!(
        locator.api_base().as_str(),
        "https://api.github.com/",
        "api base mismatch"
    );
}

#[rstest]
fn parses_repository_url() {
    let locator = RepositoryLocator::parse("https://github.com/octo/repo")
        .expect("should parse repository URL");
    assert_eq!(locator.slug(), "octo/repo", "slug mismatch");
    assert_eq!(
        locator.api_base().as_str(),
        "https://api.github.com/",
        "api base mismatch"
    );
}

#[rstest]
#[case::slug("octo/repo.git")]
#[case::url("https://github.com/octo/repo.git")]
fn strips_git_suffix(#[case] input: &str) {
    let locator = RepositoryLocator::parse(input).expect("should parse");
    assert_eq!(locator.repository().as_str(), "repo", "suffix should be dropped");
}

#[rstest]
#[case::plain("https://ghe.example.com/foo/bar", "https://ghe.example.com/api/v3")]
#[case::with_port(
    "https://ghe.example.com:8443/foo/bar",
    "https://ghe.example.com:8443/api/v3"
)]
fn parses_enterprise_repository_url(#[case] input: &str, #[case] expected: &str) {
    let locator = RepositoryLocator::parse(input).expect("should parse enterprise URL");
    assert_eq!(
        locator.api_base().as_str(),
        expected,
        "enterprise api base mismatch"
    );
}

#[rstest]
#[case::single_segment("repo")]
#[case::too_many_segments("octo/repo/extra")]
#[case::empty_owner("/repo")]
#[case::empty_name("octo/")]
#[case::blank("   ")]
fn rejects_malformed_slug(#[case] input: &str) {
    let result = RepositoryLocator::parse(input);
    assert!(
        matches!(result, Err(BadgeError::InvalidRepository(_))),
        "expected InvalidRepository for {input:?}, got {result:?}"
    );
}

#[rstest]
fn rejects_url_without_repository() {
    let result = RepositoryLocator::parse("https://github.com/octo");
    assert!(
        matches!(result, Err(BadgeError::InvalidRepository(_))),
        "expected InvalidRepository, got {result:?}"
    );
}

#[rstest]
fn rejects_unparseable_url() {
    let result = RepositoryLocator::parse("http://[::1/octo/repo");
    assert!(
        matches!(result, Err(BadgeError::InvalidUrl(_))),
        "expected InvalidUrl, got {result:?}"
    );
}

#[rstest]
fn api_base_can_be_overridden() {
    let locator = RepositoryLocator::parse("octo/repo")
        .and_then(|locator| locator.with_api_base("http://127.0.0.1:8080"))
        .expect("override should apply");
    assert_eq!(locator.api_base().as_str(), "http://127.0.0.1:8080/");
    assert_eq!(locator.slug(), "octo/repo", "identity should be kept");
}

#[rstest]
fn api_base_override_rejects_garbage() {
    let result = RepositoryLocator::parse("octo/repo")
        .and_then(|locator| locator.with_api_base("not a url"));
    assert!(
        matches!(result, Err(BadgeError::InvalidUrl(_))),
        "expected InvalidUrl, got {result:?}"
    );
}

#[rstest]
fn builds_workflow_routes() {
    let locator =
        RepositoryLocator::from_owner_repo("octo", "repo").expect("should create locator");

    assert_eq!(locator.repository_path(), "/repos/octo/repo");
    assert_eq!(
        locator.branch_ref_path("main"),
        "/repos/octo/repo/git/ref/heads/main"
    );
    assert_eq!(locator.refs_path(), "/repos/octo/repo/git/refs");
    assert_eq!(
        locator.update_ref_path("feature"),
        "/repos/octo/repo/git/refs/heads/feature"
    );
    assert_eq!(
        locator.contents_path("badge.txt"),
        "/repos/octo/repo/contents/badge.txt"
    );
    assert_eq!(locator.blobs_path(), "/repos/octo/repo/git/blobs");
    assert_eq!(locator.trees_path(), "/repos/octo/repo/git/trees");
    assert_eq!(locator.commits_path(), "/repos/octo/repo/git/commits");
    assert_eq!(
        locator.commit_path("abc123"),
        "/repos/octo/repo/git/commits/abc123"
    );
    assert_eq!(locator.pulls_path(), "/repos/octo/repo/pulls");
    assert_eq!(locator.merge_path(9), "/repos/octo/repo/pulls/9/merge");
}

#[rstest]
#[case::empty("")]
#[case::whitespace("  \t ")]
fn rejects_blank_token(#[case] raw: &str) {
    assert_eq!(PersonalAccessToken::new(raw), Err(BadgeError::MissingToken));
}

#[rstest]
fn token_is_trimmed_and_redacted() {
    let token = PersonalAccessToken::new("  ghp_secret\n").expect("token should be valid");
    assert_eq!(token.value(), "ghp_secret");
    assert!(
        !format!("{token:?}").contains("ghp_secret"),
        "debug output must not leak the token"
    );
}

#[rstest]
fn branch_name_exposes_full_ref() {
    let branch = BranchName::new("coauthor-pr-1-1").expect("branch should be valid");
    assert_eq!(branch.as_str(), "coauthor-pr-1-1");
    assert_eq!(branch.full_ref(), "refs/heads/coauthor-pr-1-1");
    assert_eq!(branch.to_string(), "coauthor-pr-1-1");
}

#[rstest]
#[case::empty("")]
#[case::qualified("refs/heads/main")]
#[case::whitespace("two words")]
fn rejects_invalid_branch_name(#[case] raw: &str) {
    let result = BranchName::new(raw);
    assert!(
        matches!(result, Err(BadgeError::Configuration { .. })),
        "expected Configuration for {raw:?}, got {result:?}"
    );
}

#[rstest]
#[case::fragment_marker("notes#draft-1-1.txt", "/repos/octo/repo/contents/notes%23draft-1-1.txt")]
#[case::query_marker("a?b-1-1.txt", "/repos/octo/repo/contents/a%3Fb-1-1.txt")]
#[case::percent("100%-1-1.txt", "/repos/octo/repo/contents/100%25-1-1.txt")]
#[case::nested("badges/pair-1-1.txt", "/repos/octo/repo/contents/badges/pair-1-1.txt")]
fn contents_route_encodes_reserved_characters(#[case] file_path: &str, #[case] expected: &str) {
    let locator =
        RepositoryLocator::from_owner_repo("octo", "repo").expect("should create locator");

    let route = locator.contents_path(file_path);
    assert_eq!(route, expected);

    let uri: http::Uri = route.parse().expect("route should be a valid URI");
    assert_eq!(uri.path(), expected, "no part of the file path may leak out");
    assert_eq!(uri.query(), None);
}

#[rstest]
fn ref_routes_encode_branch_names() {
    let locator =
        RepositoryLocator::from_owner_repo("octo", "repo").expect("should create locator");

    assert_eq!(
        locator.branch_ref_path("pair/notes#1"),
        "/repos/octo/repo/git/ref/heads/pair/notes%231"
    );
    assert_eq!(
        locator.update_ref_path("pair?x"),
        "/repos/octo/repo/git/refs/heads/pair%3Fx"
    );
}

#[rstest]
fn routes_ignore_api_base_path() {
    let locator = RepositoryLocator::parse("https://ghe.example.com/foo/bar")
        .expect("should parse enterprise URL");

    assert_eq!(locator.pulls_path(), "/repos/foo/bar/pulls");
}

#[rstest]
fn api_base_override_rejects_opaque_url() {
    let result = RepositoryLocator::parse("octo/repo")
        .and_then(|locator| locator.with_api_base("mailto:octo@example.com"));
    assert!(
        matches!(result, Err(BadgeError::InvalidUrl(_))),
        "expected InvalidUrl, got {result:?}"
    );
}
