//! Shared helpers for engine integration tests.
#![allow(dead_code)]

use std::collections::HashSet;

use lanesim_core::car::{Car, Lane};
use lanesim_core::params::Params;
use lanesim_core::rng::{MinStdRand, RandomSource};

/// Builds `n` non-overlapping cars on a road of `length` cells, drawn from a
/// generator seeded with `seed`. Velocities lie in `[0, vmax]`.
pub fn scattered_cars(seed: u64, n: usize, length: u32, vmax: u32) -> Vec<Car> {
    let mut rng = MinStdRand::new(seed);
    let last_cell = i32::try_from(length - 1).unwrap();
    let top_speed = i32::try_from(vmax).unwrap();
    let mut occupied = HashSet::new();

    (0..n)
        .map(|id| {
            let lane = if rng.uniform_int(0, 1) == 0 {
                Lane::Left
            } else {
                Lane::Right
            };
            let mut position = u32::try_from(rng.uniform_int(0, last_cell)).unwrap();
            while !occupied.insert((lane, position)) {
                position = (position + 1) % length;
            }
            let v = u32::try_from(rng.uniform_int(0, top_speed)).unwrap();
            Car::new(id, lane, position, v)
        })
        .collect()
}

/// Parameters with an explicit seed.
pub fn seeded_params(
    n: usize,
    length: u32,
    vmax: u32,
    p_dec: f64,
    p_start: f64,
    steps: usize,
    seed: u64,
) -> Params {
    Params::new(n, length, vmax, p_dec, p_start, steps, Some(seed)).unwrap()
}

/// Asserts every structural property that must hold between steps.
pub fn assert_well_formed(cars: &[Car], params: &Params) {
    assert_eq!(cars.len(), params.n, "car count changed");
    let mut cells = HashSet::new();
    for (index, car) in cars.iter().enumerate() {
        assert_eq!(car.id, index, "car ids must stay 0..n in order");
        assert!(car.position < params.length, "car {} off the road", car.id);
        assert!(car.v <= params.vmax, "car {} exceeds vmax", car.id);
        assert!(
            cells.insert((car.lane, car.position)),
            "two cars share lane {} position {}",
            car.lane,
            car.position
        );
    }
}
