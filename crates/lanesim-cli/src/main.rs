//! `lanesim` binary entry point.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use clap::Parser;
use lanesim_cli::cli::Cli;
use lanesim_cli::commands;
use lanesim_cli::config::EnvConfig;
use lanesim_cli::error::AppError;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only the report.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Fatal error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let env = EnvConfig::from_env()?;
    let mut out = BufWriter::new(io::stdout().lock());
    commands::execute(cli, &env, &mut out)?;
    out.flush()?;
    Ok(())
}
