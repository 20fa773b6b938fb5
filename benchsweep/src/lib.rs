//! A sweep driver that benchmarks a storage server across a parameter grid.
//!
//! For every point in the grid (concurrency level × update ratio, repeated
//! several times for statistical variance) the driver brings the server under
//! test into a clean state, runs an external load generator against it for a
//! fixed duration, tears the server down, and archives the run's logs under
//! names that encode the run's parameters.
//!
//! The server and the load generator are external collaborators: the driver
//! invokes them as child processes and places their output, nothing more. It
//! never parses or validates what they print.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod collect;
pub mod config;
pub mod driver;
pub mod invocation;
pub mod lifecycle;
pub mod observability;
pub mod sweep;

pub use crate::config::Config;
pub use crate::driver::run;
pub use crate::sweep::{Experiment, Grid};
