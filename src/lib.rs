//! Pairbadge library crate: automated co-authored pull requests.
//!
//! The library wraps Octocrab behind a gateway trait, then drives a fixed
//! number of sequential iterations that each create a branch, commit a file
//! whose message carries a `Co-authored-by` trailer, open a pull request, and
//! merge it. Configuration is layered with ortho-config so the binary and
//! tests share one resolution path.

pub mod badge;
pub mod config;
pub mod github;
pub mod telemetry;

pub use badge::{
    BadgeRunner, CommitMode, FailurePolicy, IterationFailure, IterationStep, MergedPullRequest,
    RunPlan, RunReport,
};
pub use config::PairBadgeConfig;
pub use github::{BadgeError, BadgeGateway, OctocrabGateway, PersonalAccessToken, RepositoryLocator};
pub use telemetry::{NoopTelemetrySink, StderrJsonlTelemetrySink, TelemetryEvent, TelemetrySink};
