//! Structured run events and sinks.
//!
//! Events mirror the runner's progress (one per merged pull request, one per
//! failed iteration, one at the end of the run) so a caller can capture a
//! machine-readable record alongside the human-oriented `tracing` output.

use std::io;

use serde::{Deserialize, Serialize};

/// A structured telemetry event emitted by the runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// An iteration opened and merged its pull request.
    PullRequestMerged {
        /// 1-based iteration number.
        index: u32,
        /// Pull request number.
        number: u64,
        /// Head branch of the pull request.
        branch: String,
    },
    /// An iteration stopped at `step`.
    IterationFailed {
        /// 1-based iteration number.
        index: u32,
        /// Workflow step that failed.
        step: String,
        /// Error description.
        message: String,
    },
    /// The run finished (or aborted).
    RunCompleted {
        /// Pull requests merged.
        merged: usize,
        /// Iterations that failed.
        failed: usize,
        /// Whether the run stopped before attempting every iteration.
        aborted: bool,
    },
}

/// A sink that can record telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Records a telemetry event.
    fn record(&self, event: TelemetryEvent);
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Records telemetry events to stderr as JSON lines (JSONL).
#[derive(Debug, Default)]
pub struct StderrJsonlTelemetrySink;

impl TelemetrySink for StderrJsonlTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };

        let _ignored = writeln_stderr(&serialised);
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}

/// Sink that keeps events in memory, for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    events: std::sync::Mutex<Vec<TelemetryEvent>>,
}

#[cfg(test)]
impl RecordingSink {
    pub(crate) fn take(&self) -> Vec<TelemetryEvent> {
        self.events
            .lock()
            .expect("events mutex should be available")
            .drain(..)
            .collect()
    }
}

#[cfg(test)]
impl TelemetrySink for RecordingSink {
    fn record(&self, event: TelemetryEvent) {
        self.events
            .lock()
            .expect("events mutex should be available")
            .push(event);
    }
}
