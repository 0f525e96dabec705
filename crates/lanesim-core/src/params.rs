//! Simulation parameters.

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Validated, immutable simulation parameters.
///
/// Construct through [`Params::try_from`] on a [`ParamsRecord`] or through
/// [`Params::new`]; both run the same checks.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    /// Number of cars.
    pub n: usize,
    /// Road length in cells.
    pub length: u32,
    /// Maximum velocity in cells per step.
    pub vmax: u32,
    /// Random deceleration probability.
    pub p_dec: f64,
    /// Start probability for a stopped car.
    pub p_start: f64,
    /// Number of steps to simulate.
    pub steps: usize,
    /// Generator seed; `None` selects the generator's default seed.
    pub seed: Option<u64>,
}

/// Unvalidated parameter record as it appears in an input file.
///
/// Integers are signed so that negative inputs reach validation and get a
/// descriptive error instead of a parse failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamsRecord {
    /// Number of cars.
    pub n: i64,
    /// Road length in cells.
    pub length: i64,
    /// Maximum velocity.
    pub vmax: i64,
    /// Random deceleration probability.
    pub p_dec: f64,
    /// Start probability.
    pub p_start: f64,
    /// Number of steps.
    pub steps: i64,
    /// Optional seed.
    #[serde(default)]
    pub seed: Option<i64>,
}

impl Params {
    /// Creates validated parameters.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidParameter` if any value is out of range.
    pub fn new(
        n: usize,
        length: u32,
        vmax: u32,
        p_dec: f64,
        p_start: f64,
        steps: usize,
        seed: Option<u64>,
    ) -> Result<Self, SimError> {
        let params = Self {
            n,
            length,
            vmax,
            p_dec,
            p_start,
            steps,
            seed,
        };
        params.validate()?;
        Ok(params)
    }

    /// Checks every range constraint.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidParameter` describing the first violation.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.n == 0 {
            return Err(invalid("n must be positive"));
        }
        if self.length == 0 {
            return Err(invalid("L must be positive"));
        }
        if u64::from(self.length) <= self.n as u64 {
            return Err(invalid(format!(
                "L must exceed n (L = {}, n = {})",
                self.length, self.n
            )));
        }
        if self.vmax == 0 {
            return Err(invalid("vmax must be positive"));
        }
        if !(0.0..=1.0).contains(&self.p_dec) {
            return Err(invalid(format!("p_dec must be in [0, 1], got {}", self.p_dec)));
        }
        if !(0.0..=1.0).contains(&self.p_start) {
            return Err(invalid(format!(
                "p_start must be in [0, 1], got {}",
                self.p_start
            )));
        }
        if self.steps == 0 {
            return Err(invalid("steps must be positive"));
        }
        Ok(())
    }
}

impl TryFrom<ParamsRecord> for Params {
    type Error = SimError;

    #[allow(clippy::cast_sign_loss)]
    fn try_from(record: ParamsRecord) -> Result<Self, Self::Error> {
        let n = usize::try_from(record.n)
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| invalid(format!("n must be positive, got {}", record.n)))?;
        let length = u32::try_from(record.length)
            .ok()
            .filter(|&l| l > 0)
            .ok_or_else(|| invalid(format!("L must be a positive cell count, got {}", record.length)))?;
        let vmax = u32::try_from(record.vmax)
            .ok()
            .filter(|&v| v > 0)
            .ok_or_else(|| invalid(format!("vmax must be positive, got {}", record.vmax)))?;
        let steps = usize::try_from(record.steps)
            .ok()
            .filter(|&s| s > 0)
            .ok_or_else(|| invalid(format!("steps must be positive, got {}", record.steps)))?;
        // Negative seeds wrap to their unsigned bit pattern.
        let seed = record.seed.map(|s| s as u64);

        Self::new(n, length, vmax, record.p_dec, record.p_start, steps, seed)
    }
}

impl From<&Params> for ParamsRecord {
    #[allow(clippy::cast_possible_wrap)]
    fn from(params: &Params) -> Self {
        Self {
            n: params.n as i64,
            length: i64::from(params.length),
            vmax: i64::from(params.vmax),
            p_dec: params.p_dec,
            p_start: params.p_start,
            steps: params.steps as i64,
            seed: params.seed.map(|s| s as i64),
        }
    }
}

fn invalid(message: impl Into<String>) -> SimError {
    SimError::InvalidParameter(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ParamsRecord {
        ParamsRecord {
            n: 4,
            length: 20,
            vmax: 5,
            p_dec: 0.2,
            p_start: 0.5,
            steps: 10,
            seed: Some(42),
        }
    }

    fn expect_invalid(record: ParamsRecord) {
        match Params::try_from(record) {
            Err(SimError::InvalidParameter(_)) => {}
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_record_converts() {
        let params = Params::try_from(record()).unwrap();
        assert_eq!(params.n, 4);
        assert_eq!(params.length, 20);
        assert_eq!(params.vmax, 5);
        assert_eq!(params.steps, 10);
        assert_eq!(params.seed, Some(42));
    }

    #[test]
    fn test_non_positive_counts_are_rejected() {
        expect_invalid(ParamsRecord { n: 0, ..record() });
        expect_invalid(ParamsRecord { n: -2, ..record() });
        expect_invalid(ParamsRecord { length: 0, ..record() });
        expect_invalid(ParamsRecord { vmax: 0, ..record() });
        expect_invalid(ParamsRecord { steps: -1, ..record() });
    }

    #[test]
    fn test_probabilities_outside_unit_interval_are_rejected() {
        expect_invalid(ParamsRecord { p_dec: -0.1, ..record() });
        expect_invalid(ParamsRecord { p_dec: 1.5, ..record() });
        expect_invalid(ParamsRecord { p_start: 2.0, ..record() });
        expect_invalid(ParamsRecord { p_start: f64::NAN, ..record() });
    }

    #[test]
    fn test_probability_bounds_are_inclusive() {
        let params = Params::try_from(ParamsRecord {
            p_dec: 0.0,
            p_start: 1.0,
            ..record()
        })
        .unwrap();
        assert!((params.p_start - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_road_must_be_longer_than_car_count() {
        expect_invalid(ParamsRecord { n: 20, length: 20, ..record() });
    }

    #[test]
    fn test_negative_seed_wraps() {
        let params = Params::try_from(ParamsRecord { seed: Some(-1), ..record() }).unwrap();
        assert_eq!(params.seed, Some(u64::MAX));
    }

    #[test]
    fn test_record_round_trips_through_params() {
        let params = Params::try_from(record()).unwrap();
        assert_eq!(ParamsRecord::from(&params), record());
    }
}
