//! Car and lane records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// One of the two lanes of the road.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Lane {
    /// Lane 0.
    Left,
    /// Lane 1.
    Right,
}

impl Lane {
    /// Both lanes, in index order.
    pub const ALL: [Lane; 2] = [Lane::Left, Lane::Right];

    /// Returns the numeric index of this lane (0 or 1).
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Lane::Left => 0,
            Lane::Right => 1,
        }
    }

    /// Returns the opposite lane.
    #[must_use]
    pub fn other(self) -> Lane {
        match self {
            Lane::Left => Lane::Right,
            Lane::Right => Lane::Left,
        }
    }
}

impl TryFrom<i64> for Lane {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Lane::Left),
            1 => Ok(Lane::Right),
            other => Err(format!("lane must be 0 or 1, got {other}")),
        }
    }
}

impl TryFrom<u8> for Lane {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Lane::try_from(i64::from(value))
    }
}

impl From<Lane> for u8 {
    fn from(lane: Lane) -> Self {
        match lane {
            Lane::Left => 0,
            Lane::Right => 1,
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// A single agent on the road.
///
/// The id is assigned once at load time and never reassigned. Everything else
/// is rewritten in place every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Car {
    /// Stable 0-based identifier.
    pub id: usize,
    /// Current lane.
    pub lane: Lane,
    /// Cell index in `[0, L)`.
    pub position: u32,
    /// Velocity in cells per step, `[0, vmax]`.
    pub v: u32,
    /// Sticky slow-to-start flag: set when a stopped car misses its start
    /// draw, consumed on the next velocity update.
    pub slow_start_pending: bool,
}

impl Car {
    /// Creates a car with no pending slow-to-start.
    #[must_use]
    pub fn new(id: usize, lane: Lane, position: u32, v: u32) -> Self {
        Self {
            id,
            lane,
            position,
            v,
            slow_start_pending: false,
        }
    }

    /// Builds a car from a raw `(lane, position, v)` record, rejecting values
    /// that cannot be represented.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidCar` if the lane is not 0 or 1, or if the
    /// position or velocity is negative or does not fit in a `u32`.
    pub fn from_record(id: usize, lane: i64, position: i64, v: i64) -> Result<Self, SimError> {
        let lane = Lane::try_from(lane).map_err(|reason| SimError::InvalidCar { id, reason })?;
        let position = u32::try_from(position).map_err(|_| SimError::InvalidCar {
            id,
            reason: format!("position must be a non-negative cell index, got {position}"),
        })?;
        let v = u32::try_from(v).map_err(|_| SimError::InvalidCar {
            id,
            reason: format!("velocity must be non-negative, got {v}"),
        })?;
        Ok(Self::new(id, lane, position, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_other_flips() {
        assert_eq!(Lane::Left.other(), Lane::Right);
        assert_eq!(Lane::Right.other(), Lane::Left);
    }

    #[test]
    fn test_lane_try_from_rejects_out_of_range() {
        assert_eq!(Lane::try_from(1_i64), Ok(Lane::Right));
        assert!(Lane::try_from(2_i64).is_err());
        assert!(Lane::try_from(-1_i64).is_err());
    }

    #[test]
    fn test_lane_displays_as_index() {
        assert_eq!(Lane::Left.to_string(), "0");
        assert_eq!(Lane::Right.to_string(), "1");
    }

    #[test]
    fn test_from_record_builds_car() {
        let car = Car::from_record(4, 1, 17, 3).unwrap();
        assert_eq!(car, Car::new(4, Lane::Right, 17, 3));
        assert!(!car.slow_start_pending);
    }

    #[test]
    fn test_from_record_rejects_negative_position() {
        match Car::from_record(2, 0, -5, 0) {
            Err(SimError::InvalidCar { id, .. }) => assert_eq!(id, 2),
            other => panic!("expected InvalidCar, got {other:?}"),
        }
    }

    #[test]
    fn test_from_record_rejects_bad_lane() {
        assert!(matches!(
            Car::from_record(0, 3, 0, 0),
            Err(SimError::InvalidCar { id: 0, .. })
        ));
    }
}
