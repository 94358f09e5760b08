//! Repository identity wrappers and API route construction.

use url::Url;

use super::error::BadgeError;

const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    pub(crate) fn new(value: &str) -> Result<Self, BadgeError> {
        if value.is_empty() {
            return Err(BadgeError::InvalidRepository(
                "repository owner is empty".to_owned(),
            ));
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    pub(crate) fn new(value: &str) -> Result<Self, BadgeError> {
        let trimmed = value.strip_suffix(".git").unwrap_or(value);
        if trimmed.is_empty() {
            return Err(BadgeError::InvalidRepository(
                "repository name is empty".to_owned(),
            ));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `BadgeError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, BadgeError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(BadgeError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl std::fmt::Debug for PersonalAccessToken {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("PersonalAccessToken(***)")
    }
}

/// Derives the GitHub API base URL from a web URL.
///
/// `github.com` maps to the public API; any other host is treated as GitHub
/// Enterprise and served under `/api/v3`.
fn derive_api_base(parsed: &Url) -> Result<Url, BadgeError> {
    let host = parsed
        .host_str()
        .ok_or_else(|| BadgeError::InvalidUrl("URL must include a host".to_owned()))?;

    if host.eq_ignore_ascii_case("github.com") {
        return Url::parse(DEFAULT_API_BASE)
            .map_err(|error| BadgeError::InvalidUrl(error.to_string()));
    }

    let authority = if host.contains(':') {
        format!("[{host}]")
    } else {
        host.to_owned()
    };
    let mut api_url = Url::parse(&format!("{}://{authority}", parsed.scheme()))
        .map_err(|error| BadgeError::InvalidUrl(error.to_string()))?;
    api_url
        .set_port(parsed.port())
        .map_err(|()| BadgeError::InvalidUrl("invalid port".to_owned()))?;
    api_url.set_path("api/v3");
    Ok(api_url)
}

/// Target repository together with the API base used to reach it.
///
/// # Example
///
/// ```
/// use pairbadge::github::RepositoryLocator;
///
/// let locator = RepositoryLocator::parse("octo/repo").expect("slug should parse");
/// assert_eq!(locator.owner().as_str(), "octo");
/// assert_eq!(locator.repository().as_str(), "repo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocator {
    api_base: Url,
    owner: RepositoryOwner,
    repository: RepositoryName,
}

impl RepositoryLocator {
    /// Creates a locator for `github.com` from owner and repository strings.
    ///
    /// # Errors
    ///
    /// Returns `BadgeError::InvalidRepository` when either part is empty.
    pub fn from_owner_repo(owner: &str, repo: &str) -> Result<Self, BadgeError> {
        let api_base = Url::parse(DEFAULT_API_BASE)
            .map_err(|error| BadgeError::InvalidUrl(error.to_string()))?;
        Ok(Self {
            api_base,
            owner: RepositoryOwner::new(owner)?,
            repository: RepositoryName::new(repo)?,
        })
    }

    /// Parses either an `owner/name` slug or a repository URL such as
    /// `https://github.com/owner/name`.
    ///
    /// # Errors
    ///
    /// Returns `BadgeError::InvalidRepository` when the input does not name
    /// exactly one owner and repository, or `BadgeError::InvalidUrl` when a
    /// URL cannot be parsed.
    pub fn parse(input: &str) -> Result<Self, BadgeError> {
        let trimmed = input.trim();
        if trimmed.contains("://") {
            return Self::parse_url(trimmed);
        }

        let mut segments = trimmed.split('/');
        let (Some(owner), Some(repo), None) = (segments.next(), segments.next(), segments.next())
        else {
            return Err(BadgeError::InvalidRepository(trimmed.to_owned()));
        };
        Self::from_owner_repo(owner, repo)
    }

    fn parse_url(input: &str) -> Result<Self, BadgeError> {
        let parsed = Url::parse(input).map_err(|error| BadgeError::InvalidUrl(error.to_string()))?;
        let mut segments = parsed
            .path_segments()
            .ok_or_else(|| BadgeError::InvalidRepository(input.to_owned()))?;
        let owner = segments
            .next()
            .ok_or_else(|| BadgeError::InvalidRepository(input.to_owned()))?;
        let repo = segments
            .next()
            .ok_or_else(|| BadgeError::InvalidRepository(input.to_owned()))?;

        Ok(Self {
            api_base: derive_api_base(&parsed)?,
            owner: RepositoryOwner::new(owner)?,
            repository: RepositoryName::new(repo)?,
        })
    }

    /// Replaces the derived API base, e.g. for GitHub Enterprise or tests.
    ///
    /// # Errors
    ///
    /// Returns `BadgeError::InvalidUrl` when `api_base` is not a valid
    /// hierarchical URL.
    pub fn with_api_base(self, api_base: &str) -> Result<Self, BadgeError> {
        let parsed =
            Url::parse(api_base).map_err(|error| BadgeError::InvalidUrl(error.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(BadgeError::InvalidUrl(format!(
                "{api_base} cannot be used as an API base"
            )));
        }
        Ok(Self {
            api_base: parsed,
            ..self
        })
    }

    /// API base URL used for every request.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// `owner/name` form for log output.
    #[must_use]
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner.as_str(), self.repository.as_str())
    }

    /// Builds `/repos/{owner}/{name}/...` with every segment percent-encoded.
    ///
    /// Segments may contain `/`, which is kept as a path separator, so file
    /// paths and branch names such as `feature/x` keep their hierarchy.
    fn route<'s>(&self, tail: impl IntoIterator<Item = &'s str>) -> String {
        let mut url = self.api_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .clear()
                .extend(["repos", self.owner.as_str(), self.repository.as_str()])
                .extend(tail.into_iter().flat_map(|segment| segment.split('/')));
        }
        url.path().to_owned()
    }

    pub(crate) fn repository_path(&self) -> String {
        self.route(std::iter::empty())
    }

    pub(crate) fn branch_ref_path(&self, branch: &str) -> String {
        self.route(["git", "ref", "heads", branch])
    }

    pub(crate) fn refs_path(&self) -> String {
        self.route(["git", "refs"])
    }

    pub(crate) fn update_ref_path(&self, branch: &str) -> String {
        self.route(["git", "refs", "heads", branch])
    }

    pub(crate) fn contents_path(&self, file_path: &str) -> String {
        self.route(["contents", file_path])
    }

    pub(crate) fn blobs_path(&self) -> String {
        self.route(["git", "blobs"])
    }

    pub(crate) fn commit_path(&self, sha: &str) -> String {
        self.route(["git", "commits", sha])
    }

    pub(crate) fn commits_path(&self) -> String {
        self.route(["git", "commits"])
    }

    pub(crate) fn trees_path(&self) -> String {
        self.route(["git", "trees"])
    }

    pub(crate) fn pulls_path(&self) -> String {
        self.route(["pulls"])
    }

    pub(crate) fn merge_path(&self, number: u64) -> String {
        let segment = number.to_string();
        self.route(["pulls", segment.as_str(), "merge"])
    }
}
