//! Road model: the cars on a circular lattice and their per-lane order.

use std::collections::HashSet;

use lanesim_core::car::{Car, Lane};
use lanesim_core::error::SimError;
use rayon::iter::Either;
use rayon::prelude::*;

/// Circular distance in cells from `from` to `to` on a ring of `length`
/// cells. Always in `(0, length]`: a car at the same cell is a full lap away.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn circular_gap(length: u32, from: u32, to: u32) -> u32 {
    let raw = i64::from(to) - i64::from(from);
    let gap = if raw <= 0 { raw + i64::from(length) } else { raw };
    gap as u32
}

/// All cars on the road plus one position-sorted id list per lane.
///
/// The lane lists partition the car ids exactly and are kept in ascending
/// position order at every step boundary.
#[derive(Debug, Clone)]
pub struct Road {
    length: u32,
    cars: Vec<Car>,
    lanes: [Vec<usize>; 2],
}

impl Road {
    /// Builds a road from its initial cars.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidCar` if ids are not exactly `0..n` in order,
    /// if a position lies outside `[0, length)`, or if two cars share a lane
    /// and position.
    pub fn new(length: u32, cars: Vec<Car>) -> Result<Self, SimError> {
        let mut occupied = HashSet::with_capacity(cars.len());
        for (index, car) in cars.iter().enumerate() {
            if car.id != index {
                return Err(SimError::InvalidCar {
                    id: car.id,
                    reason: format!("found at index {index}; ids must be 0..n in order"),
                });
            }
            if car.position >= length {
                return Err(SimError::InvalidCar {
                    id: car.id,
                    reason: format!("position {} is outside the road [0, {length})", car.position),
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

        let mut road = Self {
            length,
            cars,
            lanes: [Vec::new(), Vec::new()],
        };
        road.rebuild_lanes();
        Ok(road)
    }

    /// Road length in cells.
    #[must_use]
    pub fn length(&self) -> u32 {
        self.length
    }

    /// All cars in id order.
    #[must_use]
    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    /// Ids of the cars in `lane`, ascending by position.
    #[must_use]
    pub fn lane(&self, lane: Lane) -> &[usize] {
        &self.lanes[lane.index()]
    }

    /// Circular gap from car `back` to car `front`.
    #[must_use]
    pub fn gap(&self, back: usize, front: usize) -> u32 {
        circular_gap(
            self.length,
            self.cars[back].position,
            self.cars[front].position,
        )
    }

    pub(crate) fn cars_mut(&mut self) -> &mut [Car] {
        &mut self.cars
    }

    /// Mutable cars alongside the read-only lane lists.
    pub(crate) fn split_mut(&mut self) -> (&mut [Car], &[Vec<usize>; 2]) {
        (&mut self.cars, &self.lanes)
    }

    /// Rebuilds both lane lists from current lane membership and sorts them
    /// by position.
    pub fn rebuild_lanes(&mut self) {
        let (left, right): (Vec<usize>, Vec<usize>) =
            self.cars.par_iter().partition_map(|car| match car.lane {
                Lane::Left => Either::Left(car.id),
                Lane::Right => Either::Right(car.id),
            });
        self.lanes = [left, right];

        let cars = &self.cars;
        let [left, right] = &mut self.lanes;
        rayon::join(
            || sort_by_position(left, cars),
            || sort_by_position(right, cars),
        );
    }

    /// Moves every car forward by its velocity, wrapping at the road end,
    /// and restores ascending order in both lane lists.
    #[allow(clippy::cast_possible_truncation)]
    pub fn advance(&mut self) {
        let length = u64::from(self.length);
        self.cars.par_iter_mut().for_each(|car| {
            car.position = ((u64::from(car.position) + u64::from(car.v)) % length) as u32;
        });

        let cars = &self.cars;
        self.lanes
            .par_iter_mut()
            .for_each(|lane| restore_order(lane, cars));
    }

    /// Verifies the structural invariants of the road.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violation found: a lane list that
    /// does not match lane membership, a lane out of position order, two cars
    /// in one cell, a position off the road, or a velocity above `vmax`.
    pub fn check_invariants(&self, vmax: u32) -> Result<(), String> {
        let listed: usize = self.lanes.iter().map(Vec::len).sum();
        if listed != self.cars.len() {
            return Err(format!(
                "lane lists hold {listed} ids for {} cars",
                self.cars.len()
            ));
        }

        let mut seen = vec![false; self.cars.len()];
        for lane in Lane::ALL {
            let ids = self.lane(lane);
            for &id in ids {
                let Some(car) = self.cars.get(id) else {
                    return Err(format!("lane {lane} lists unknown car {id}"));
                };
                if std::mem::replace(&mut seen[id], true) {
                    return Err(format!("car {id} is listed twice"));
                }
                if car.lane != lane {
                    return Err(format!("car {id} is in lane {} but listed in lane {lane}", car.lane));
                }
            }
            for pair in ids.windows(2) {
                let (a, b) = (&self.cars[pair[0]], &self.cars[pair[1]]);
                if a.position == b.position {
                    return Err(format!(
                        "cars {} and {} share lane {lane} position {}",
                        a.id, b.id, a.position
                    ));
                }
                if a.position > b.position {
                    return Err(format!("lane {lane} is out of position order at car {}", b.id));
                }
            }
        }

        for car in &self.cars {
            if car.position >= self.length {
                return Err(format!("car {} is off the road at {}", car.id, car.position));
            }
            if car.v > vmax {
                return Err(format!("car {} exceeds vmax with v = {}", car.id, car.v));
            }
        }
        Ok(())
    }
}

fn sort_by_position(lane: &mut [usize], cars: &[Car]) {
    lane.par_sort_unstable_by_key(|&id| (cars[id].position, id));
}

/// Cars never overtake within a lane, so after advancing each list is still
/// in cyclic order and only the cars that wrapped past cell 0 sit at the end.
fn restore_order(lane: &mut [usize], cars: &[Car]) {
    if let Some(i) = lane
        .windows(2)
        .position(|pair| cars[pair[1]].position < cars[pair[0]].position)
    {
        lane.rotate_left(i + 1);
    }
    if !lane.is_sorted_by_key(|&id| cars[id].position) {
        sort_by_position(lane, cars);
    }
}
