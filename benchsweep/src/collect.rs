//! Archives the server's log after a run.

use std::path::Path;

use crate::invocation::Invocation;
use crate::lifecycle::{Phase, PhaseError, PhaseFailure};
use crate::sweep::Experiment;

/// Copies the server's log file into the output directory under the run's
/// archive name.
///
/// A pre-existing archive of the same name is silently overwritten; names
/// encode the experiment identity, so only a re-run of the identical
/// experiment can collide. A missing or unreadable source is reported as a
/// recoverable failure rather than an abort: the log belongs to the server
/// under test, and a run without a server log is still a run.
pub async fn archive_server_log(
    server_log: &Path,
    output_dir: &Path,
    experiment: &Experiment,
) -> Option<PhaseFailure> {
    let invocation = Invocation::new(experiment);
    let destination = output_dir.join(invocation.server_log_name());

    match tokio::fs::copy(server_log, &destination).await {
        Ok(_) => None,
        Err(err) => {
            tracing::warn!(
                %experiment,
                source = %server_log.display(),
                error = %err,
                "failed to archive server log"
            );
            Some(PhaseFailure {
                phase: Phase::Collect,
                error: PhaseError::Io(err),
            })
        }
    }
}
