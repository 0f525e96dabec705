//! Shared helpers for CLI integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use lanesim_cli::cli::OutputFormat;
use lanesim_cli::commands::run;
use lanesim_cli::config::RunConfig;
use lanesim_cli::error::AppError;

/// Scenario A in the text format: two cars five cells apart, certain start,
/// no random deceleration, one step.
pub const SCENARIO_A: &str = "2\n10\n2\n0\n1\n1\n42\n\n0 0 0\n0 5 0\n";

/// Writes `contents` to a file named `name` in this test binary's scratch
/// directory and returns its path.
pub fn write_input(name: &str, contents: &str) -> PathBuf {
    let path = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// A run configuration reading `input` with every option off.
pub fn run_config(input: PathBuf) -> RunConfig {
    RunConfig {
        input: Some(input),
        format: None,
        threads: 0,
        output: OutputFormat::Text,
        digest: false,
        check_invariants: false,
        dump_steps: false,
    }
}

/// Runs `config` and returns stdout as a string.
pub fn run_to_string(config: &RunConfig) -> Result<String, AppError> {
    let mut out = Vec::new();
    run::execute(config, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}
