//! Tracing bootstrap for the driver binary.

use std::env;

use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, prelude::*};

/// Initializes the global tracing subscriber, writing to stderr so captured
/// load-generator output on stdout stays clean.
pub fn initialize_tracing() {
    let (level, env_filter) = parse_rust_log();
    let format = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(format.with_filter(LevelFilter::from(level)))
        .with(env_filter)
        .init();
}

/// Interprets `RUST_LOG` for the driver.
///
/// Tries to parse `RUST_LOG` as a simple level filter and applies default
/// per-crate levels internally. Otherwise the value is used literally, for
/// users who know which overrides they want to run.
pub fn parse_rust_log() -> (Level, EnvFilter) {
    let level = match env::var(EnvFilter::DEFAULT_ENV) {
        Ok(value) => match value.parse::<Level>() {
            Ok(level) => level,
            Err(_) => return (Level::TRACE, EnvFilter::new(value)),
        },
        Err(_) => Level::INFO,
    };

    // This is the maximum verbosity that will be logged, filtered down to `level`.
    let env_filter = EnvFilter::new("INFO,benchsweep=TRACE");

    (level, env_filter)
}
