//! Pairbadge CLI entrypoint.

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use pairbadge::{
    BadgeError, BadgeRunner, FailurePolicy, IterationFailure, NoopTelemetrySink, OctocrabGateway,
    PairBadgeConfig, RunReport, StderrJsonlTelemetrySink, TelemetrySink,
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Failures that end the process with a non-zero status.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Badge(#[from] BadgeError),
    #[error(transparent)]
    Iteration(#[from] IterationFailure),
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ignored = writeln!(io::stderr().lock(), "{error}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _already_set = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

async fn run() -> Result<(), CliError> {
    let config = load_config()?;

    // Everything that can be checked locally is checked before the first
    // remote call.
    let token = config.resolve_token()?;
    let repo = config.resolve_repository()?;
    let plan = config.run_plan()?;

    let gateway = OctocrabGateway::for_token(&token, &repo)?;
    let telemetry: Box<dyn TelemetrySink> = if config.telemetry {
        Box::new(StderrJsonlTelemetrySink)
    } else {
        Box::new(NoopTelemetrySink)
    };

    let runner = BadgeRunner::new(&gateway, &repo, &*telemetry);
    let report = runner.run(&plan).await?;
    log_summary(&report, plan.policy);
    Ok(())
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`BadgeError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<PairBadgeConfig, BadgeError> {
    PairBadgeConfig::load().map_err(|error| BadgeError::Configuration {
        message: error.to_string(),
    })
}

fn log_summary(report: &RunReport, policy: FailurePolicy) {
    if report.is_clean() {
        tracing::info!(merged = report.merged.len(), "badge run complete");
        return;
    }

    tracing::warn!(
        merged = report.merged.len(),
        failed = report.failures.len(),
        ?policy,
        "badge run finished with failed iterations"
    );
    for failure in &report.failures {
        tracing::warn!(index = failure.index, step = %failure.step, "{failure}");
    }
}
