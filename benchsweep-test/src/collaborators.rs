//! Fake collaborator executables for integration tests.
//!
//! Mirrors what a real deployment provides around the driver: a setup
//! script, a stop script and a load generator. The fakes are tiny shell
//! scripts in a temporary directory; each appends a line to a shared journal
//! so tests can assert what ran, with which arguments, and in which order.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use benchsweep::config::{Commands, Config, Sweep, Timing};
use tempfile::TempDir;

/// A temporary directory populated with fake collaborator scripts.
///
/// The directory and everything in it is deleted on drop.
#[derive(Debug)]
pub struct Collaborators {
    dir: TempDir,
}

impl Collaborators {
    /// Creates well-behaved collaborators:
    ///
    /// * `setup` journals itself and writes a fresh server log,
    /// * `loadgen` journals itself with its arguments and prints to both
    ///   stdout and stderr,
    /// * `stop` journals itself.
    pub fn new() -> Self {
        let collaborators = Self {
            dir: TempDir::new().expect("failed to create collaborator dir"),
        };

        let journal = collaborators.journal_path();
        let server_log = collaborators.server_log_path();

        collaborators.install(
            "setup",
            &format!(
                "echo setup >> \"{}\"\necho \"server boot\" > \"{}\"\n",
                journal.display(),
                server_log.display()
            ),
        );
        collaborators.install(
            "loadgen",
            &format!(
                "echo \"load $@\" >> \"{}\"\necho \"generator stdout\"\necho \"generator stderr\" >&2\n",
                journal.display()
            ),
        );
        collaborators.install("stop", &format!("echo stop >> \"{}\"\n", journal.display()));

        collaborators
    }

    /// Installs (or replaces) one of the scripts with a custom body.
    ///
    /// The body runs under `/bin/sh`; use [`Self::journal_path`] and
    /// [`Self::server_log_path`] to interact with the shared files.
    pub fn install(&self, name: &str, body: &str) {
        let path = self.dir.path().join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}")).expect("failed to write script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("failed to mark script executable");
    }

    /// A driver configuration wired to the fake collaborators.
    ///
    /// Uses a single-experiment grid (1 thread, 0% updates, one repetition)
    /// and zero delays so tests stay fast; tests mutate the returned config
    /// for bigger grids or broken collaborators.
    pub fn config(&self, output_dir: &Path) -> Config {
        Config {
            commands: Commands {
                setup: self.dir.path().join("setup"),
                stop: self.dir.path().join("stop"),
                load_generator: self.dir.path().join("loadgen"),
            },
            server_log: self.server_log_path(),
            output_dir: output_dir.into(),
            sweep: Sweep {
                threads: vec![1],
                update_percents: vec![0],
                repetitions: 1,
                ..Sweep::default()
            },
            timing: Timing {
                settle: Duration::ZERO,
                cooldown: Duration::ZERO,
            },
        }
    }

    /// Path of the shared journal the scripts append to.
    pub fn journal_path(&self) -> PathBuf {
        self.dir.path().join("journal")
    }

    /// Path of the fake server log written by `setup`.
    pub fn server_log_path(&self) -> PathBuf {
        self.dir.path().join("server_logs")
    }

    /// The journal lines recorded so far, oldest first.
    pub fn journal(&self) -> Vec<String> {
        match fs::read_to_string(self.journal_path()) {
            Ok(contents) => contents.lines().map(str::to_owned).collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::new()
    }
}
