//! The top-level sweep loop and its end-of-sweep summary.

use anyhow::{Context, Result};
use yansi::Paint;

use crate::collect;
use crate::config::Config;
use crate::lifecycle::{Lifecycle, RunReport};
use crate::sweep::Grid;

/// Runs the full sweep described by the configuration.
///
/// Experiments run strictly one after another in grid order, with the
/// configured cool-down between them. Recoverable failures are recorded on
/// the run reports and never stop the sweep; only the inability to launch a
/// collaborator aborts it.
pub async fn run(config: &Config) -> Result<Vec<RunReport>> {
    let grid = Grid::new(config.sweep.clone());
    let lifecycle = Lifecycle::new(config);

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .context("failed to create output directory")?;

    tracing::info!(experiments = grid.len(), "starting sweep");

    let mut reports = Vec::with_capacity(grid.len());
    for experiment in grid.iter() {
        tracing::info!("running with {experiment}");

        let mut report = lifecycle.run(&experiment).await?;
        if let Some(failure) =
            collect::archive_server_log(&config.server_log, &config.output_dir, &experiment).await
        {
            report.failures.push(failure);
        }
        reports.push(report);

        tokio::time::sleep(config.timing.cooldown).await;
    }

    Ok(reports)
}

/// Prints the end-of-sweep summary.
///
/// Lists every run that had a failing phase, so an operator does not have to
/// scan the whole log to learn which measurements to distrust.
pub fn print_summary(reports: &[RunReport]) {
    let failed = reports.iter().filter(|r| !r.is_clean()).count();

    println!();
    print!("{} ({} runs", "## SWEEP".bold(), reports.len().bold());
    if failed > 0 {
        print!(", {}", format!("{failed} with failures").bold().red());
    }
    println!(")");

    for report in reports.iter().filter(|r| !r.is_clean()) {
        println!("{} {}", "FAILED".bold().red(), report.experiment.bold());
        for failure in &report.failures {
            println!("  {}: {}", failure.phase, failure.error);
        }
    }

    if failed == 0 {
        println!("{}", "all runs completed cleanly".green());
    }
}
