//! Badge pull request workflow.
//!
//! Each iteration branches off the base branch, commits one throwaway file
//! whose commit message carries a `Co-authored-by` trailer, opens a pull
//! request, and merges it. Iterations run strictly in sequence with a fixed
//! pause between them.

pub mod naming;
pub mod runner;
pub mod template;

pub use naming::{ArtifactNames, RunStamp};
pub use runner::{
    BadgeRunner, CommitMode, FailurePolicy, IterationFailure, IterationStep, MergedPullRequest,
    RunPlan, RunReport,
};
pub use template::{CoAuthor, CommitTemplate};
