//! Reporting of simulation state.
//!
//! The final report lists the first cars in id order, either as the plain
//! correctness-check text or as JSON. A SHA-256 digest over the full state
//! gives a compact fingerprint for comparing runs, and [`StepDump`] writes
//! every car after every step for debugging.

use std::fmt::Write as _;
use std::io::{self, Write};

use lanesim_core::car::{Car, Lane};
use lanesim_core::error::SimError;
use lanesim_core::observer::StepObserver;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Number of cars listed in the text report.
pub const CHECK_LIMIT: usize = 10;

/// One car as it appears in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CarReport {
    /// Car id.
    pub id: usize,
    /// Lane, serialized as 0 or 1.
    pub lane: Lane,
    /// Cell index.
    pub position: u32,
    /// Velocity.
    pub v: u32,
}

impl From<&Car> for CarReport {
    fn from(car: &Car) -> Self {
        Self {
            id: car.id,
            lane: car.lane,
            position: car.position,
            v: car.v,
        }
    }
}

/// The final state of a run in machine-readable form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalReport {
    /// Number of steps simulated.
    pub steps: usize,
    /// Every car in id order.
    pub cars: Vec<CarReport>,
    /// State digest, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

impl FinalReport {
    /// Builds a report over all `cars`.
    #[must_use]
    pub fn new(steps: usize, cars: &[Car], digest: Option<String>) -> Self {
        Self {
            steps,
            cars: cars.iter().map(CarReport::from).collect(),
            digest,
        }
    }
}

/// Writes the correctness-check listing of the first [`CHECK_LIMIT`] cars.
///
/// # Errors
///
/// Returns any error from `out`.
pub fn write_text(out: &mut impl Write, cars: &[Car]) -> io::Result<()> {
    writeln!(out, "Correctness check:")?;
    for car in cars.iter().take(CHECK_LIMIT) {
        write_car(out, car)?;
    }
    Ok(())
}

/// Writes `report` as pretty-printed JSON followed by a newline.
///
/// # Errors
///
/// Returns any error from serialization or from `out`.
pub fn write_json(out: &mut impl Write, report: &FinalReport) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)
}

/// SHA-256 over every car's id, lane, position and velocity in id order,
/// as lowercase hex.
#[must_use]
pub fn state_digest(cars: &[Car]) -> String {
    let mut hasher = Sha256::new();
    for car in cars {
        hasher.update((car.id as u64).to_le_bytes());
        hasher.update([u8::from(car.lane)]);
        hasher.update(car.position.to_le_bytes());
        hasher.update(car.v.to_le_bytes());
    }
    hasher
        .finalize()
        .iter()
        .fold(String::with_capacity(64), |mut hex, byte| {
            let _ = write!(hex, "{byte:02x}");
            hex
        })
}

fn write_car(out: &mut impl Write, car: &Car) -> io::Result<()> {
    writeln!(
        out,
        "Car {}: Lane {}: Position {}, Speed {}",
        car.id, car.lane, car.position, car.v
    )
}

/// Step observer that writes every car after every step.
///
/// Each block starts with `Epoch: {step}`. The initial state is written as
/// epoch -1 by [`StepDump::write_initial`].
#[derive(Debug)]
pub struct StepDump<W> {
    out: W,
}

impl<W: Write> StepDump<W> {
    /// Dumps to `out`.
    #[must_use]
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Writes the state before the first step.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Io` if writing fails.
    pub fn write_initial(&mut self, cars: &[Car]) -> Result<(), SimError> {
        self.write_epoch("-1", cars)?;
        Ok(())
    }

    /// Returns the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_epoch(&mut self, epoch: impl std::fmt::Display, cars: &[Car]) -> io::Result<()> {
        writeln!(self.out, "Epoch: {epoch}")?;
        for car in cars {
            write_car(&mut self.out, car)?;
        }
        self.out.flush()
    }
}

impl<W: Write> StepObserver for StepDump<W> {
    fn on_step(&mut self, step: usize, cars: &[Car]) -> Result<(), SimError> {
        self.write_epoch(step, cars)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanesim_test_support::car;

    fn fleet(n: usize) -> Vec<Car> {
        (0..n)
            .map(|i| car(i, u8::from(i % 3 == 0), u32::try_from(i * 2).unwrap(), 1))
            .collect()
    }

    // --- text ---

    #[test]
    fn test_text_report_lists_cars() {
        let mut out = Vec::new();

        write_text(&mut out, &[car(0, 0, 1, 1), car(1, 1, 6, 2)]).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Correctness check:\n\
             Car 0: Lane 0: Position 1, Speed 1\n\
             Car 1: Lane 1: Position 6, Speed 2\n"
        );
    }

    #[test]
    fn test_text_report_stops_after_ten_cars() {
        let mut out = Vec::new();

        write_text(&mut out, &fleet(25)).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1 + CHECK_LIMIT);
        assert!(text.lines().last().unwrap().starts_with("Car 9:"));
    }

    // --- json ---

    #[test]
    fn test_json_report_includes_every_car() {
        let report = FinalReport::new(3, &fleet(12), Some("ab".to_owned()));
        let mut out = Vec::new();

        write_json(&mut out, &report).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["steps"], 3);
        assert_eq!(json["cars"].as_array().unwrap().len(), 12);
        assert_eq!(json["cars"][3]["lane"], 1);
        assert_eq!(json["cars"][3]["position"], 6);
        assert_eq!(json["digest"], "ab");
    }

    #[test]
    fn test_json_report_omits_missing_digest() {
        let mut out = Vec::new();

        write_json(&mut out, &FinalReport::new(1, &fleet(1), None)).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert!(json.get("digest").is_none());
    }

    // --- digest ---

    #[test]
    fn test_digest_is_hex_sha256() {
        let digest = state_digest(&fleet(4));

        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_digest_of_empty_state_is_sha256_of_nothing() {
        assert_eq!(
            state_digest(&[]),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_digest_changes_with_any_field() {
        let base = fleet(3);
        let original = state_digest(&base);

        let mut moved = base.clone();
        moved[1].position += 1;
        let mut switched = base.clone();
        switched[2].lane = switched[2].lane.other();
        let mut faster = base;
        faster[0].v += 1;

        assert_ne!(state_digest(&moved), original);
        assert_ne!(state_digest(&switched), original);
        assert_ne!(state_digest(&faster), original);
    }

    // --- step dump ---

    #[test]
    fn test_step_dump_writes_epoch_blocks() {
        let mut dump = StepDump::new(Vec::new());

        dump.write_initial(&[car(0, 0, 0, 0)]).unwrap();
        dump.on_step(0, &[car(0, 0, 1, 1)]).unwrap();

        assert_eq!(
            String::from_utf8(dump.into_inner()).unwrap(),
            "Epoch: -1\n\
             Car 0: Lane 0: Position 0, Speed 0\n\
             Epoch: 0\n\
             Car 0: Lane 0: Position 1, Speed 1\n"
        );
    }
}
