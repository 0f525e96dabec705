//! Lanesim command line.
//!
//! Argument parsing, environment configuration, the top-level error type and
//! the `run` and `generate` commands. The `lanesim` binary is a thin wrapper
//! that sets up logging and maps errors to the exit status.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
