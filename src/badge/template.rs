//! Commit, file, and pull request text rendered from Jinja2 templates.
//!
//! Templates are rendered with `minijinja` in strict mode, so a misspelt
//! variable fails instead of rendering as an empty string.
//!
//! # Available Variables
//!
//! - `index`: 1-based iteration number
//! - `count`: total iterations in the run
//! - `branch`: head branch of the pull request
//! - `path`: file committed on the branch
//! - `co_author_name`, `co_author_email`: configured co-author identity
//! - `trailer`: the full `Co-authored-by: Name <email>` line

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Serialize;

use crate::github::BadgeError;

/// Default co-author display name.
pub const DEFAULT_CO_AUTHOR_NAME: &str = "Pair Partner";

/// Default co-author email.
pub const DEFAULT_CO_AUTHOR_EMAIL: &str = "pair-partner@users.noreply.github.com";

/// Default commit subject.
pub const DEFAULT_MESSAGE: &str = "Add coauthor trailer commit for badge";

/// Default file content.
pub const DEFAULT_CONTENT: &str =
    "This commit is to get the Pair Extraordinaire badge.\n\n{{ trailer }}\n";

/// Default pull request title.
pub const DEFAULT_PR_TITLE: &str = "Coauthor Badge PR";

/// Default pull request body.
pub const DEFAULT_PR_BODY: &str = "This PR is created to get the Pair Extraordinaire badge.";

/// Identity credited through the `Co-authored-by` trailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoAuthor {
    name: String,
    email: String,
}

impl CoAuthor {
    /// Validates the identity.
    ///
    /// # Errors
    ///
    /// Returns [`BadgeError::Configuration`] when the name is blank or contains
    /// angle brackets or a newline, or when the email lacks an `@`.
    pub fn new(name: &str, email: &str) -> Result<Self, BadgeError> {
        let trimmed_name = name.trim();
        let trimmed_email = email.trim();
        if trimmed_name.is_empty() || trimmed_name.contains(['<', '>', '\n']) {
            return Err(BadgeError::Configuration {
                message: format!("invalid co-author name '{trimmed_name}'"),
            });
        }
        if !trimmed_email.contains('@') || trimmed_email.contains(['<', '>', '\n', ' ']) {
            return Err(BadgeError::Configuration {
                message: format!("invalid co-author email '{trimmed_email}'"),
            });
        }
        Ok(Self {
            name: trimmed_name.to_owned(),
            email: trimmed_email.to_owned(),
        })
    }

    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Email address.
    #[must_use]
    pub const fn email(&self) -> &str {
        self.email.as_str()
    }

    /// `Co-authored-by: Name <email>`.
    #[must_use]
    pub fn trailer(&self) -> String {
        format!("Co-authored-by: {} <{}>", self.name, self.email)
    }
}

impl Default for CoAuthor {
    fn default() -> Self {
        Self {
            name: DEFAULT_CO_AUTHOR_NAME.to_owned(),
            email: DEFAULT_CO_AUTHOR_EMAIL.to_owned(),
        }
    }
}

/// Template sources for the text produced each iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitTemplate {
    /// Co-author credited in every commit.
    pub co_author: CoAuthor,
    /// Commit subject (and optional body).
    pub message: String,
    /// File content.
    pub content: String,
    /// Pull request title.
    pub pr_title: String,
    /// Pull request body.
    pub pr_body: String,
}

impl Default for CommitTemplate {
    fn default() -> Self {
        Self {
            co_author: CoAuthor::default(),
            message: DEFAULT_MESSAGE.to_owned(),
            content: DEFAULT_CONTENT.to_owned(),
            pr_title: DEFAULT_PR_TITLE.to_owned(),
            pr_body: DEFAULT_PR_BODY.to_owned(),
        }
    }
}

/// Per-iteration values exposed to templates.
#[derive(Debug, Clone, Copy)]
pub struct IterationContext<'a> {
    /// 1-based iteration number.
    pub index: u32,
    /// Total iterations.
    pub count: u32,
    /// Head branch.
    pub branch: &'a str,
    /// Committed file path.
    pub path: &'a str,
}

#[derive(Debug, Serialize)]
struct TemplateVariables<'a> {
    index: u32,
    count: u32,
    branch: &'a str,
    path: &'a str,
    co_author_name: &'a str,
    co_author_email: &'a str,
    trailer: &'a str,
}

/// Text produced for one iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedIteration {
    /// Commit message, always ending with the co-author trailer.
    pub message: String,
    /// File content.
    pub content: String,
    /// Pull request title.
    pub pr_title: String,
    /// Pull request body.
    pub pr_body: String,
}

impl CommitTemplate {
    /// Renders every template for one iteration.
    ///
    /// # Errors
    ///
    /// Returns [`BadgeError::Template`] when a template has invalid syntax or
    /// references an unknown variable, and [`BadgeError::Configuration`] when
    /// the commit subject or pull request title renders empty.
    pub fn render(&self, iteration: IterationContext<'_>) -> Result<RenderedIteration, BadgeError> {
        let trailer = self.co_author.trailer();
        let variables = TemplateVariables {
            index: iteration.index,
            count: iteration.count,
            branch: iteration.branch,
            path: iteration.path,
            co_author_name: self.co_author.name(),
            co_author_email: self.co_author.email(),
            trailer: &trailer,
        };

        let subject = render_one("message", &self.message, &variables)?;
        let pr_title = render_one("pr_title", &self.pr_title, &variables)?;
        if subject.trim().is_empty() || pr_title.trim().is_empty() {
            return Err(BadgeError::Configuration {
                message: "commit message and pull request title must not be empty".to_owned(),
            });
        }

        Ok(RenderedIteration {
            message: with_trailer(subject.trim_end(), &trailer),
            content: render_one("content", &self.content, &variables)?,
            pr_title: pr_title.trim().to_owned(),
            pr_body: render_one("pr_body", &self.pr_body, &variables)?,
        })
    }
}

/// Appends the trailer as its own paragraph unless the message already has it.
fn with_trailer(message: &str, trailer: &str) -> String {
    if message.lines().any(|line| line.trim() == trailer) {
        return message.to_owned();
    }
    format!("{message}\n\n{trailer}")
}

fn render_one(
    name: &str,
    source: &str,
    variables: &TemplateVariables<'_>,
) -> Result<String, BadgeError> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    // Keep trailing newlines in file content.
    env.set_keep_trailing_newline(true);

    env.add_template(name, source)
        .map_err(|error| BadgeError::Template {
            message: format!("invalid {name} template: {error}"),
        })?;
    let template = env.get_template(name).map_err(|error| BadgeError::Template {
        message: format!("failed to retrieve {name} template: {error}"),
    })?;

    template
        .render(variables)
        .map_err(|error| BadgeError::Template {
            message: format!("{name} template rendering failed: {error}"),
        })
}
