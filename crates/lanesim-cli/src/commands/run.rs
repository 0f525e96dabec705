//! `lanesim run`: load a scenario, simulate it and report the final state.

use std::io::{self, Write};

use lanesim_core::observer::NoopObserver;
use lanesim_engine::application::simulation::Simulation;
use lanesim_io::loader;
use lanesim_io::reporter::{self, FinalReport, StepDump};

use crate::cli::OutputFormat;
use crate::config::RunConfig;
use crate::error::AppError;

/// Runs the scenario described by `config` and writes the report to `out`.
///
/// # Errors
///
/// Returns `AppError::Simulation` if the scenario cannot be loaded or the
/// run fails, and `AppError::Io` if the report cannot be written.
pub fn execute(config: &RunConfig, out: &mut impl Write) -> Result<(), AppError> {
    let scenario = loader::load(config.input.as_deref(), config.format)?;
    let steps = scenario.params.steps;
    tracing::info!(
        n = scenario.params.n,
        length = scenario.params.length,
        vmax = scenario.params.vmax,
        p_dec = scenario.params.p_dec,
        p_start = scenario.params.p_start,
        seed = ?scenario.params.seed,
        "Loaded scenario"
    );

    let mut sim = Simulation::seeded(scenario.params, scenario.cars)?
        .with_threads(config.threads)?
        .with_invariant_checks(config.check_invariants);

    if config.dump_steps {
        let mut dump = StepDump::new(io::stderr());
        dump.write_initial(sim.cars())?;
        sim.run(&mut dump)?;
    } else {
        sim.run(&mut NoopObserver)?;
    }

    let digest = config.digest.then(|| reporter::state_digest(sim.cars()));
    match config.output {
        OutputFormat::Text => {
            reporter::write_text(out, sim.cars())?;
            if let Some(digest) = digest {
                writeln!(out, "Digest: {digest}")?;
            }
        }
        OutputFormat::Json => {
            reporter::write_json(out, &FinalReport::new(steps, sim.cars(), digest))?;
        }
    }
    Ok(())
}
