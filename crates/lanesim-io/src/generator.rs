//! Scenario generator.
//!
//! Produces a fresh initial state: every car gets a random lane, cars are
//! laid out within each lane either evenly or at random distinct cells, and
//! start at rest or at a random velocity. All draws come from one seeded
//! [`MinStdRand`] stream, so a seed fully determines the scenario.

use std::io::{self, Write};

use lanesim_core::car::{Car, Lane};
use lanesim_core::error::SimError;
use lanesim_core::params::Params;
use lanesim_core::rng::{MinStdRand, RandomSource};

use crate::loader::{NO_SEED, Scenario};

/// How cars are placed within a lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// The k-th of m cars sits at `floor(k * L / m)`.
    #[default]
    Even,
    /// Distinct cells drawn at random.
    Random,
}

/// How initial velocities are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Velocities {
    /// Every car starts at rest.
    #[default]
    Zero,
    /// Uniform in `[0, vmax]`.
    Random,
}

/// Everything needed to generate a scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Number of cars.
    pub n: usize,
    /// Road length in cells.
    pub length: u32,
    /// Maximum velocity.
    pub vmax: u32,
    /// Random deceleration probability.
    pub p_dec: f64,
    /// Start probability.
    pub p_start: f64,
    /// Number of steps to simulate.
    pub steps: usize,
    /// Placement within each lane.
    pub layout: Layout,
    /// Initial velocities.
    pub velocities: Velocities,
    /// Seed for both the generator and the generated scenario. A random one
    /// is picked when absent.
    pub seed: Option<u64>,
}

/// Generates a validated scenario.
///
/// # Errors
///
/// Returns `SimError::InvalidParameter` if the configuration does not make
/// valid parameters or the road is too long for the generator's integer
/// range.
pub fn generate(config: &GeneratorConfig) -> Result<Scenario, SimError> {
    let seed = config.seed.unwrap_or_else(|| {
        let seed = u64::from(rand::random::<u32>());
        tracing::info!(seed, "No seed given, picked one at random");
        seed
    });
    let params = Params::new(
        config.n,
        config.length,
        config.vmax,
        config.p_dec,
        config.p_start,
        config.steps,
        Some(seed),
    )?;
    let mut rng = MinStdRand::new(seed);

    let lanes: Vec<Lane> = (0..params.n)
        .map(|_| {
            if rng.uniform_int(0, 1) == 0 {
                Lane::Left
            } else {
                Lane::Right
            }
        })
        .collect();

    let mut slots = [Vec::new(), Vec::new()];
    for lane in Lane::ALL {
        let count = lanes.iter().filter(|&&l| l == lane).count();
        slots[lane.index()] = match config.layout {
            Layout::Even => even_positions(params.length, count),
            Layout::Random => random_positions(&mut rng, params.length, count)?,
        };
    }

    let top_speed = to_bound(params.vmax, "vmax")?;
    let mut next_slot = [0_usize; 2];
    let cars = lanes
        .iter()
        .enumerate()
        .map(|(id, &lane)| {
            let slot = &mut next_slot[lane.index()];
            let position = slots[lane.index()][*slot];
            *slot += 1;
            let v = match config.velocities {
                Velocities::Zero => 0,
                Velocities::Random => rng.uniform_int(0, top_speed).unsigned_abs(),
            };
            Car::new(id, lane, position, v)
        })
        .collect();

    tracing::debug!(
        n = params.n,
        left = slots[0].len(),
        right = slots[1].len(),
        "Generated scenario"
    );
    Scenario::new(params, cars)
}

/// Writes `scenario` in the text format: one parameter per line, a blank
/// line, then one `lane position v` record per car.
///
/// # Errors
///
/// Returns any error from `out`.
pub fn write_text(out: &mut impl Write, scenario: &Scenario) -> io::Result<()> {
    let params = &scenario.params;
    writeln!(out, "{}", params.n)?;
    writeln!(out, "{}", params.length)?;
    writeln!(out, "{}", params.vmax)?;
    writeln!(out, "{}", params.p_dec)?;
    writeln!(out, "{}", params.p_start)?;
    writeln!(out, "{}", params.steps)?;
    match params.seed {
        Some(seed) => writeln!(out, "{seed}")?,
        None => writeln!(out, "{NO_SEED}")?,
    }
    writeln!(out)?;
    for car in &scenario.cars {
        writeln!(out, "{} {} {}", car.lane, car.position, car.v)?;
    }
    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
fn even_positions(length: u32, count: usize) -> Vec<u32> {
    let count = count as u64;
    (0..count)
        .map(|k| (k * u64::from(length) / count) as u32)
        .collect()
}

/// Draws `count` sorted offsets in `[0, L - count]` and adds each one's
/// index, which yields distinct ascending cells in `[0, L)`.
fn random_positions(
    rng: &mut MinStdRand,
    length: u32,
    count: usize,
) -> Result<Vec<u32>, SimError> {
    if count == 0 {
        return Ok(Vec::new());
    }
    let free = u32::try_from(count)
        .ok()
        .and_then(|count| length.checked_sub(count))
        .ok_or_else(|| {
            SimError::InvalidParameter(format!("{count} cars do not fit in one lane of {length}"))
        })?;
    let top = to_bound(free, "L")?;

    let mut offsets: Vec<u32> = (0..count)
        .map(|_| rng.uniform_int(0, top).unsigned_abs())
        .collect();
    offsets.sort_unstable();
    Ok(offsets
        .into_iter()
        .zip(0_u32..)
        .map(|(offset, index)| offset + index)
        .collect())
}

fn to_bound(value: u32, name: &str) -> Result<i32, SimError> {
    i32::try_from(value).map_err(|_| {
        SimError::InvalidParameter(format!("{name} = {value} is too large to generate"))
    })
}
