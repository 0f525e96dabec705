//! Command line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use lanesim_io::generator::{GeneratorConfig, Layout, Velocities};
use lanesim_io::loader::InputFormat;

/// Two-lane traffic cellular automaton.
///
/// Runs a scenario to completion and prints the final state, or generates a
/// new scenario file.
#[derive(Parser, Debug)]
#[command(name = "lanesim")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a scenario and report the final state.
    Run(RunArgs),
    /// Generate a scenario in the text format.
    Generate(GenerateArgs),
}

/// Scenario encodings accepted by `run`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    /// Whitespace-separated tokens.
    Text,
    /// YAML with `params` and `cars`.
    Yaml,
}

impl From<FormatArg> for InputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Text => InputFormat::Text,
            FormatArg::Yaml => InputFormat::Yaml,
        }
    }
}

/// Final report encodings.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// The correctness-check listing of the first ten cars.
    #[default]
    Text,
    /// Every car as JSON.
    Json,
}

/// Arguments of `lanesim run`.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Scenario file. Reads stdin when omitted.
    pub input: Option<PathBuf>,

    /// Input format. Defaults to the file extension (.yaml/.yml), else text.
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Worker threads. 0 uses the rayon default. Overrides `LANESIM_THREADS`.
    #[arg(long)]
    pub threads: Option<usize>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Append a SHA-256 digest of the final state to the report.
    #[arg(long)]
    pub digest: bool,

    /// Verify the road invariants after every step.
    #[arg(long)]
    pub check_invariants: bool,

    /// Write every car after every step to stderr.
    #[arg(long)]
    pub dump_steps: bool,
}

/// Initial placement of cars within a lane.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionArg {
    /// Evenly spaced.
    Even,
    /// Random distinct cells.
    Random,
}

/// Initial velocities.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VelocityArg {
    /// All cars at rest.
    Zero,
    /// Uniform in `[0, vmax]`.
    Random,
}

/// Arguments of `lanesim generate`.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Number of cars.
    #[arg(long)]
    pub n: usize,

    /// Road length in cells.
    #[arg(long, visible_alias = "L")]
    pub length: u32,

    /// Maximum velocity.
    #[arg(long)]
    pub vmax: u32,

    /// Random deceleration probability.
    #[arg(long)]
    pub p_dec: f64,

    /// Start probability for stopped cars.
    #[arg(long)]
    pub p_start: f64,

    /// Number of steps to simulate.
    #[arg(long, default_value_t = 1000)]
    pub steps: usize,

    /// Placement within each lane.
    #[arg(long, value_enum, default_value_t = PositionArg::Even)]
    pub pos: PositionArg,

    /// Initial velocities.
    #[arg(long, value_enum, default_value_t = VelocityArg::Zero)]
    pub vel: VelocityArg,

    /// Seed for the generator and the scenario. Random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file. Writes to stdout when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

impl From<&GenerateArgs> for GeneratorConfig {
    fn from(args: &GenerateArgs) -> Self {
        Self {
            n: args.n,
            length: args.length,
            vmax: args.vmax,
            p_dec: args.p_dec,
            p_start: args.p_start,
            steps: args.steps,
            layout: match args.pos {
                PositionArg::Even => Layout::Even,
                PositionArg::Random => Layout::Random,
            },
            velocities: match args.vel {
                VelocityArg::Zero => Velocities::Zero,
                VelocityArg::Random => Velocities::Random,
            },
            seed: args.seed,
        }
    }
}
