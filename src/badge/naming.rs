//! Unique branch names and file paths for each iteration.

use chrono::Utc;

use crate::github::{BadgeError, BranchName};

/// Default prefix for generated branches.
pub const DEFAULT_BRANCH_PREFIX: &str = "coauthor-pr";

/// Default prefix for generated files.
pub const DEFAULT_FILE_PREFIX: &str = "coauthor-badge";

/// Millisecond timestamp captured once per run.
///
/// Combined with the 1-based iteration index it keeps names unique within a
/// run and across reruns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStamp(i64);

impl RunStamp {
    /// Captures the current UTC time.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    /// Uses a fixed timestamp, e.g. in tests.
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Milliseconds since the Unix epoch.
    #[must_use]
    pub const fn millis(self) -> i64 {
        self.0
    }
}

/// Derives per-iteration branch names and file paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNames {
    branch_prefix: String,
    file_prefix: String,
}

impl Default for ArtifactNames {
    fn default() -> Self {
        Self {
            branch_prefix: DEFAULT_BRANCH_PREFIX.to_owned(),
            file_prefix: DEFAULT_FILE_PREFIX.to_owned(),
        }
    }
}

impl ArtifactNames {
    /// Validates both prefixes.
    ///
    /// # Errors
    ///
    /// Returns [`BadgeError::Configuration`] when a prefix is blank, contains
    /// whitespace, or when the file prefix is absolute or ends with `/`.
    pub fn new(branch_prefix: &str, file_prefix: &str) -> Result<Self, BadgeError> {
        let branch = branch_prefix.trim();
        let file = file_prefix.trim();
        if branch.is_empty() {
            return Err(invalid_prefix("branch", branch));
        }
        // Probe with a representative name so invalid prefixes fail up front.
        BranchName::new(format!("{branch}-0-1"))?;
        if file.is_empty()
            || file.contains(char::is_whitespace)
            || file.starts_with('/')
            || file.ends_with('/')
        {
            return Err(invalid_prefix("file", file));
        }
        Ok(Self {
            branch_prefix: branch.to_owned(),
            file_prefix: file.to_owned(),
        })
    }

    /// Branch for iteration `index`.
    ///
    /// # Errors
    ///
    /// Returns [`BadgeError::Configuration`] if the assembled name is not a
    /// valid branch name.
    pub fn branch(&self, stamp: RunStamp, index: u32) -> Result<BranchName, BadgeError> {
        BranchName::new(format!(
            "{}-{}-{index}",
            self.branch_prefix,
            stamp.millis()
        ))
    }

    /// Repository-relative file path for iteration `index`.
    #[must_use]
    pub fn file_path(&self, stamp: RunStamp, index: u32) -> String {
        format!("{}-{}-{index}.txt", self.file_prefix, stamp.millis())
    }
}

fn invalid_prefix(kind: &str, value: &str) -> BadgeError {
    BadgeError::Configuration {
        message: format!("invalid {kind} prefix '{value}'"),
    }
}
