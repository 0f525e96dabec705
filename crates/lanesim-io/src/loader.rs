//! Scenario loader.
//!
//! Two formats are accepted. The text format is a whitespace-separated token
//! stream: `n L vmax p_dec p_start steps seed`, where the seed may be the
//! literal `None`, followed by `n` records of `lane position v`. The YAML
//! format carries the same data as a `params` map and a `cars` list.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

use lanesim_core::car::Car;
use lanesim_core::error::SimError;
use lanesim_core::params::{Params, ParamsRecord};
use serde::{Deserialize, Serialize};

/// Literal seed token meaning "no seed".
pub const NO_SEED: &str = "None";

/// Supported scenario encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// Whitespace-separated tokens.
    #[default]
    Text,
    /// YAML document with `params` and `cars`.
    Yaml,
}

impl InputFormat {
    /// Picks the format from a file extension: `.yaml` and `.yml` are YAML,
    /// anything else is text.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(OsStr::to_str) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Text,
        }
    }
}

/// A validated initial state: parameters plus one car per id.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// Simulation parameters.
    pub params: Params,
    /// Initial cars, ids `0..n` in order.
    pub cars: Vec<Car>,
}

impl Scenario {
    /// Checks the cars against the parameters.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidParameter` if the number of cars differs
    /// from `params.n`, and `SimError::InvalidCar` for a car that is off the
    /// road, faster than `vmax` or in an occupied cell.
    pub fn new(params: Params, cars: Vec<Car>) -> Result<Self, SimError> {
        if cars.len() != params.n {
            return Err(SimError::InvalidParameter(format!(
                "n is {} but {} car records were given",
                params.n,
                cars.len()
            )));
        }

        let mut occupied = HashSet::with_capacity(cars.len());
        for car in &cars {
            if car.position >= params.length {
                return Err(SimError::InvalidCar {
                    id: car.id,
                    reason: format!(
                        "position {} is outside the road [0, {})",
                        car.position, params.length
                    ),
                });
            }
            if car.v > params.vmax {
                return Err(SimError::InvalidCar {
                    id: car.id,
                    reason: format!("velocity {} exceeds vmax {}", car.v, params.vmax),
                });
            }
            if !occupied.insert((car.lane, car.position)) {
                return Err(SimError::InvalidCar {
                    id: car.id,
                    reason: format!(
                        "lane {} position {} is already occupied",
                        car.lane, car.position
                    ),
                });
            }
        }
        Ok(Self { params, cars })
    }
}

/// Reads a scenario from `path`, or from stdin when there is no path.
///
/// Without an explicit `format` the file extension decides; stdin defaults
/// to text.
///
/// # Errors
///
/// Returns `SimError::Io` if the input cannot be read, and any error from
/// [`parse`].
pub fn load(path: Option<&Path>, format: Option<InputFormat>) -> Result<Scenario, SimError> {
    let input = match path {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let format = format
        .or_else(|| path.map(InputFormat::from_path))
        .unwrap_or_default();

    tracing::debug!(
        source = %path.map_or_else(|| "<stdin>".to_owned(), |p| p.display().to_string()),
        ?format,
        bytes = input.len(),
        "Loading scenario"
    );
    parse(&input, format)
}

/// Parses a scenario in the given format.
///
/// # Errors
///
/// Returns `SimError::Parse` for malformed input and the validation errors
/// of [`Params`] and [`Scenario::new`] for out-of-range values.
pub fn parse(input: &str, format: InputFormat) -> Result<Scenario, SimError> {
    match format {
        InputFormat::Text => parse_text(input),
        InputFormat::Yaml => parse_yaml(input),
    }
}

/// Parses the text format.
///
/// # Errors
///
/// See [`parse`].
pub fn parse_text(input: &str) -> Result<Scenario, SimError> {
    let mut tokens = Tokens::new(input);
    let record = ParamsRecord {
        n: tokens.parse("n")?,
        length: tokens.parse("L")?,
        vmax: tokens.parse("vmax")?,
        p_dec: tokens.parse("p_dec")?,
        p_start: tokens.parse("p_start")?,
        steps: tokens.parse("steps")?,
        seed: tokens.seed()?,
    };
    let params = Params::try_from(record)?;

    let cars = (0..params.n)
        .map(|id| {
            let lane = tokens.parse("lane")?;
            let position = tokens.parse("position")?;
            let v = tokens.parse("velocity")?;
            Car::from_record(id, lane, position, v)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let leftover = tokens.remaining();
    if leftover > 0 {
        tracing::warn!(leftover, "Ignoring trailing tokens after the last car record");
    }
    Scenario::new(params, cars)
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioRecord {
    params: ParamsRecord,
    cars: Vec<CarRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct CarRecord {
    lane: i64,
    position: i64,
    v: i64,
}

/// Parses the YAML format.
///
/// # Errors
///
/// See [`parse`].
pub fn parse_yaml(input: &str) -> Result<Scenario, SimError> {
    let record: ScenarioRecord = serde_yaml::from_str(input).map_err(|e| SimError::Parse {
        line: e.location().map_or(0, |location| location.line()),
        message: e.to_string(),
    })?;
    let params = Params::try_from(record.params)?;
    let cars = record
        .cars
        .into_iter()
        .enumerate()
        .map(|(id, car)| Car::from_record(id, car.lane, car.position, car.v))
        .collect::<Result<Vec<_>, _>>()?;
    Scenario::new(params, cars)
}

/// Renders a scenario as YAML.
///
/// # Errors
///
/// Returns `SimError::Io` if serialization fails.
pub fn to_yaml(scenario: &Scenario) -> Result<String, SimError> {
    let record = ScenarioRecord {
        params: ParamsRecord::from(&scenario.params),
        cars: scenario
            .cars
            .iter()
            .map(|car| CarRecord {
                lane: i64::from(u8::from(car.lane)),
                position: i64::from(car.position),
                v: i64::from(car.v),
            })
            .collect(),
    };
    serde_yaml::to_string(&record).map_err(|e| SimError::Io(io::Error::other(e)))
}

/// Token stream over the text format, tracking 1-based line numbers.
struct Tokens<'a> {
    tokens: Vec<(usize, &'a str)>,
    cursor: usize,
}

impl<'a> Tokens<'a> {
    fn new(input: &'a str) -> Self {
        let tokens = input
            .lines()
            .enumerate()
            .flat_map(|(index, line)| line.split_whitespace().map(move |token| (index + 1, token)))
            .collect();
        Self { tokens, cursor: 0 }
    }

    fn next(&mut self, what: &str) -> Result<(usize, &'a str), SimError> {
        let Some(&token) = self.tokens.get(self.cursor) else {
            return Err(SimError::Parse {
                line: self.tokens.last().map_or(0, |&(line, _)| line),
                message: format!("unexpected end of input, expected {what}"),
            });
        };
        self.cursor += 1;
        Ok(token)
    }

    fn parse<T>(&mut self, what: &str) -> Result<T, SimError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let (line, token) = self.next(what)?;
        token.parse().map_err(|e| SimError::Parse {
            line,
            message: format!("invalid {what} {token:?}: {e}"),
        })
    }

    /// Accepts the full unsigned range as well as negative seeds, keeping
    /// the 64-bit pattern of either.
    #[allow(clippy::cast_possible_wrap)]
    fn seed(&mut self) -> Result<Option<i64>, SimError> {
        let (line, token) = self.next("seed")?;
        if token == NO_SEED {
            return Ok(None);
        }
        if let Ok(seed) = token.parse::<u64>() {
            return Ok(Some(seed as i64));
        }
        token.parse().map(Some).map_err(|e| SimError::Parse {
            line,
            message: format!("invalid seed {token:?}: {e}"),
        })
    }

    fn remaining(&self) -> usize {
        self.tokens.len() - self.cursor
    }
}
