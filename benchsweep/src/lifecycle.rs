//! Sequences the external-command phases of a single run.
//!
//! Every experiment goes through the same strictly sequential phases: setup,
//! a settle delay, the load run, stop. Phases never overlap, neither within
//! one experiment nor across experiments; the server under test is a shared
//! resource and concurrent runs would invalidate each other's measurements.

use std::fmt;
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use anyhow::{Context, Result};
use thiserror::Error;
use tokio::process::Command;

use crate::config::Config;
use crate::invocation::Invocation;
use crate::sweep::Experiment;

/// A lifecycle phase of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Bringing the server under test into a clean state.
    Setup,
    /// The load-generator run itself.
    Load,
    /// Tearing the server under test down.
    Stop,
    /// Archiving the server's log after the run.
    Collect,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Setup => "setup",
            Phase::Load => "load",
            Phase::Stop => "stop",
            Phase::Collect => "collect",
        };
        f.write_str(name)
    }
}

/// Why a phase failed.
#[derive(Debug, Error)]
pub enum PhaseError {
    /// The collaborator ran but exited unsuccessfully.
    #[error("exited with {0}")]
    Exit(ExitStatus),

    /// An I/O error, e.g. the server log could not be copied.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A recoverable failure of one phase, recorded on the run's report.
#[derive(Debug)]
pub struct PhaseFailure {
    /// The phase that failed.
    pub phase: Phase,
    /// What went wrong.
    pub error: PhaseError,
}

/// What one run left behind: the experiment identity and any recoverable
/// failures its phases produced.
#[derive(Debug)]
pub struct RunReport {
    /// The experiment this run executed.
    pub experiment: Experiment,
    /// Recoverable failures, in phase order. Empty means a clean run.
    pub failures: Vec<PhaseFailure>,
}

impl RunReport {
    /// Whether every phase of the run succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs individual experiments through their lifecycle phases.
#[derive(Debug)]
pub struct Lifecycle {
    setup: PathBuf,
    stop: PathBuf,
    load_generator: PathBuf,
    output_dir: PathBuf,
    settle: Duration,
}

impl Lifecycle {
    /// Creates a controller over the configured collaborators and delays.
    pub fn new(config: &Config) -> Self {
        Self {
            setup: config.commands.setup.clone(),
            stop: config.commands.stop.clone(),
            load_generator: config.commands.load_generator.clone(),
            output_dir: config.output_dir.clone(),
            settle: config.timing.settle,
        }
    }

    /// Runs one experiment through setup, settle, load and stop.
    ///
    /// A collaborator exiting unsuccessfully is recorded on the report and
    /// the remaining phases still run, so the sweep survives a single bad
    /// configuration. Failing to launch a collaborator at all is returned as
    /// an error and aborts the sweep, since no later experiment could fare
    /// better.
    pub async fn run(&self, experiment: &Experiment) -> Result<RunReport> {
        let mut failures = Vec::new();

        self.invoke(Phase::Setup, experiment, Command::new(&self.setup), &mut failures)
            .await?;

        // Let the server finish initialization before traffic starts.
        tokio::time::sleep(self.settle).await;

        let invocation = Invocation::new(experiment);
        let output_path = self.output_dir.join(invocation.output_name());
        // Truncates any stale capture of the same name from an earlier sweep.
        let output = File::create(&output_path)
            .with_context(|| format!("failed to create {}", output_path.display()))?;

        let mut load = Command::new(&self.load_generator);
        load.args(invocation.args())
            .stdout(output.try_clone().context("failed to clone output handle")?)
            .stderr(output);

        // Blocks for approximately the experiment duration; the load
        // generator owns its own runtime and the controller does not enforce
        // an independent timeout.
        self.invoke(Phase::Load, experiment, load, &mut failures).await?;

        self.invoke(Phase::Stop, experiment, Command::new(&self.stop), &mut failures)
            .await?;

        Ok(RunReport {
            experiment: experiment.clone(),
            failures,
        })
    }

    async fn invoke(
        &self,
        phase: Phase,
        experiment: &Experiment,
        mut command: Command,
        failures: &mut Vec<PhaseFailure>,
    ) -> Result<()> {
        let program = command.as_std().get_program().to_owned();
        let status = command.status().await.with_context(|| {
            format!(
                "failed to launch {phase} command `{}`",
                program.to_string_lossy()
            )
        })?;

        if !status.success() {
            tracing::warn!(%phase, %experiment, %status, "collaborator exited unsuccessfully");
            failures.push(PhaseFailure {
                phase,
                error: PhaseError::Exit(status),
            });
        }

        Ok(())
    }
}
