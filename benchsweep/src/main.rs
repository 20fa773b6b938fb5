//! Command line entry point for the sweep driver.

use std::path::PathBuf;

use anyhow::{Context, Result};
use argh::FromArgs;

use benchsweep::config::Config;
use benchsweep::invocation::Invocation;
use benchsweep::sweep::Grid;
use benchsweep::{driver, observability};

/// Benchmark-sweep driver for a storage server under test.
#[derive(Debug, FromArgs)]
struct Args {
    /// path to the yaml configuration file
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    #[argh(subcommand)]
    command: Command,
}

#[derive(Debug, FromArgs)]
#[argh(subcommand)]
enum Command {
    Run(RunCommand),
    Plan(PlanCommand),
    Version(VersionCommand),
}

/// run the full sweep and print a summary
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "run")]
struct RunCommand {}

/// print the experiments the sweep would run, without running anything
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "plan")]
struct PlanCommand {}

/// print the driver version
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "version")]
struct VersionCommand {}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Args = argh::from_env();

    // Special switch to just print the version and exit.
    if let Command::Version(_) = args.command {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    observability::initialize_tracing();

    let config_path = args
        .config
        .context("a configuration file is required (-c <path>)")?;
    let config = Config::load(&config_path)?;
    tracing::debug!(?config);

    match args.command {
        Command::Run(_) => {
            let reports = driver::run(&config).await?;
            driver::print_summary(&reports);
        }
        Command::Plan(_) => plan(&config),
        Command::Version(_) => unreachable!(),
    }

    Ok(())
}

fn plan(config: &Config) {
    let grid = Grid::new(config.sweep.clone());
    println!("{} experiments:", grid.len());
    for experiment in grid.iter() {
        let invocation = Invocation::new(&experiment);
        println!(
            "  {experiment} -> {} rps, {}",
            experiment.target_rps,
            invocation.output_name()
        );
    }
}
