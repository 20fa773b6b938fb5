//! Test utilities for the sweep driver.
//!
//! This crate provides fake collaborator executables that record their
//! invocations to a journal, plus a tracing initializer for tests. See the
//! modules for all available utilities.

pub mod collaborators;
pub mod tracing;
