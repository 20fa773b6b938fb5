//! Configuration for the sweep driver.
//!
//! Loaded once from a YAML file passed on the command line and treated as
//! immutable for the lifetime of the sweep. All sweep and timing parameters
//! default to the reference experiment; only the collaborator commands and
//! the server log location are mandatory.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level configuration for one sweep.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// The external collaborator commands.
    pub commands: Commands,

    /// The log file the server under test writes. The collector copies this
    /// file into the output directory after every run.
    pub server_log: PathBuf,

    /// Directory receiving captured load-generator output and archived
    /// server logs. Created if it does not exist.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// The parameter grid and the fixed workload parameters.
    #[serde(default)]
    pub sweep: Sweep,

    /// Delays between lifecycle phases and between runs.
    #[serde(default)]
    pub timing: Timing,
}

/// Paths of the external collaborator executables.
#[derive(Debug, Deserialize)]
pub struct Commands {
    /// Brings the server under test into a clean, ready-to-serve state.
    /// Invoked without arguments.
    pub setup: PathBuf,

    /// Terminates and resets the server under test. Invoked without
    /// arguments.
    pub stop: PathBuf,

    /// The load generator run against the server. See
    /// [`Invocation`](crate::invocation::Invocation) for its argument
    /// contract.
    pub load_generator: PathBuf,
}

/// The enumerated parameter grid plus the fixed workload parameters passed
/// through to the load generator unmodified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Sweep {
    /// Concurrency levels to sweep over. Entries must be positive.
    pub threads: Vec<usize>,

    /// Update (write) percentages to sweep over, each in `0..=100`.
    pub update_percents: Vec<u8>,

    /// How often each (threads, update) point is repeated.
    pub repetitions: u32,

    /// Requests-per-second target per worker: a run's target rate is
    /// `threads * rate_factor`.
    pub rate_factor: u64,

    /// Wall-clock duration of a single load-generator run.
    #[serde(with = "humantime_serde")]
    pub duration: Duration,

    /// Number of items the load generator pre-loads before taking traffic.
    pub load_size: u64,

    /// Payload size of a single update request, in bytes.
    pub request_size: u64,
}

impl Default for Sweep {
    fn default() -> Self {
        Self {
            threads: vec![1, 4, 8, 12, 16, 20, 24, 28],
            update_percents: vec![0, 100],
            repetitions: 3,
            rate_factor: 10,
            duration: Duration::from_secs(30),
            load_size: 100,
            request_size: 100,
        }
    }
}

/// Fixed delays around the lifecycle phases.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// Pause after setup returns, before load starts. Gives the server time
    /// to finish initialization so traffic never hits a cold process.
    #[serde(with = "humantime_serde")]
    pub settle: Duration,

    /// Pause between successive runs, so residual load from one run cannot
    /// bleed into the next measurement.
    #[serde(with = "humantime_serde")]
    pub cooldown: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            settle: Duration::from_secs(1),
            cooldown: Duration::from_secs(2),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Config {
    /// Loads the configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).context("failed to open config file")?;
        serde_yaml::from_reader(file).context("failed to parse config YAML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_experiment() {
        let sweep = Sweep::default();
        assert_eq!(sweep.threads, vec![1, 4, 8, 12, 16, 20, 24, 28]);
        assert_eq!(sweep.update_percents, vec![0, 100]);
        assert_eq!(sweep.repetitions, 3);
        assert_eq!(sweep.rate_factor, 10);
        assert_eq!(sweep.duration, Duration::from_secs(30));
        assert_eq!(sweep.load_size, 100);
        assert_eq!(sweep.request_size, 100);

        let timing = Timing::default();
        assert_eq!(timing.settle, Duration::from_secs(1));
        assert_eq!(timing.cooldown, Duration::from_secs(2));
    }

    #[test]
    fn parses_minimal_yaml() {
        let config: Config = serde_yaml::from_str(
            r#"
            commands:
                setup: ./setup.sh
                stop: ./stop.sh
                load_generator: ./loadgen
            server_log: /srv/storage/server_logs
            "#,
        )
        .unwrap();

        assert_eq!(config.commands.setup, PathBuf::from("./setup.sh"));
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.sweep.repetitions, 3);
        assert_eq!(config.timing.cooldown, Duration::from_secs(2));
    }

    #[test]
    fn yaml_overrides_defaults() {
        let config: Config = serde_yaml::from_str(
            r#"
            commands:
                setup: ./setup.sh
                stop: ./stop.sh
                load_generator: ./loadgen
            server_log: server_logs
            output_dir: results
            sweep:
                threads: [2, 6]
                update_percents: [0, 5, 50, 95, 100]
                repetitions: 1
                duration: 45s
            timing:
                settle: 500ms
            "#,
        )
        .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("results"));
        assert_eq!(config.sweep.threads, vec![2, 6]);
        assert_eq!(config.sweep.update_percents, vec![0, 5, 50, 95, 100]);
        assert_eq!(config.sweep.repetitions, 1);
        assert_eq!(config.sweep.duration, Duration::from_secs(45));
        assert_eq!(config.timing.settle, Duration::from_millis(500));

        // Untouched fields keep their defaults.
        assert_eq!(config.sweep.rate_factor, 10);
        assert_eq!(config.timing.cooldown, Duration::from_secs(2));
    }
}
