//! Subcommand implementations.

pub mod generate;
pub mod run;

use std::io::Write;

use crate::cli::{Cli, Command};
use crate::config::{EnvConfig, RunConfig};
use crate::error::AppError;

/// Executes the parsed command line, writing the primary output to `out`.
///
/// # Errors
///
/// Returns the first error of the selected command.
pub fn execute(cli: Cli, env: &EnvConfig, out: &mut impl Write) -> Result<(), AppError> {
    match cli.command {
        Command::Run(args) => run::execute(&RunConfig::resolve(args, env), out),
        Command::Generate(args) => generate::execute(&args, out),
    }
}
