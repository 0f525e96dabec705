//! `lanesim generate`: write a fresh scenario in the text format.

use std::fs::File;
use std::io::{BufWriter, Write};

use lanesim_io::generator::{self, GeneratorConfig};

use crate::cli::GenerateArgs;
use crate::error::AppError;

/// Generates a scenario and writes it to `args.out`, or to `out` when no
/// file is given.
///
/// # Errors
///
/// Returns `AppError::Simulation` if the arguments do not form a valid
/// scenario and `AppError::Io` if writing fails.
pub fn execute(args: &GenerateArgs, out: &mut impl Write) -> Result<(), AppError> {
    let scenario = generator::generate(&GeneratorConfig::from(args))?;

    match &args.out {
        Some(path) => {
            let mut file = BufWriter::new(File::create(path)?);
            generator::write_text(&mut file, &scenario)?;
            file.flush()?;
            tracing::info!(path = %path.display(), n = scenario.params.n, "Wrote scenario");
        }
        None => generator::write_text(out, &scenario)?,
    }
    Ok(())
}
