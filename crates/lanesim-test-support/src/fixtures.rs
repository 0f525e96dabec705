//! Fixture builders for cars and parameters.

use lanesim_core::car::{Car, Lane};
use lanesim_core::params::Params;

/// Builds a car, taking the lane as 0 or 1.
///
/// # Panics
///
/// Panics if `lane` is not 0 or 1.
#[must_use]
pub fn car(id: usize, lane: u8, position: u32, v: u32) -> Car {
    let lane = Lane::try_from(lane).expect("fixture lane must be 0 or 1");
    Car::new(id, lane, position, v)
}

/// Builds validated parameters with a fixed seed of 42.
///
/// # Panics
///
/// Panics if the values do not pass validation.
#[must_use]
pub fn params(n: usize, length: u32, vmax: u32, p_dec: f64, p_start: f64, steps: usize) -> Params {
    Params::new(n, length, vmax, p_dec, p_start, steps, Some(42))
        .expect("fixture parameters must be valid")
}
