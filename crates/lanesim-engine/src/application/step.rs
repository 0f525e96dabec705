//! Step orchestrator.
//!
//! One step runs seven phases in strict order. Every parallel phase is a
//! rayon call that returns only once all of its work is done, which is the
//! barrier before the next phase.
//!
//! 1. Draw the start and deceleration coins for every car (sequential; the
//!    only phase that touches the generator).
//! 2. Snapshot every car.
//! 3. Decide lane changes, lane 0 against lane 1, then lane 1 against lane 0.
//! 4. Apply the lane changes.
//! 5. Rebuild and sort the lane lists.
//! 6. Update every velocity.
//! 7. Advance every position.

use std::sync::atomic::{AtomicBool, Ordering};

use lanesim_core::car::{Car, Lane};
use lanesim_core::error::SimError;
use lanesim_core::params::Params;
use lanesim_core::rng::RandomSource;
use rayon::prelude::*;

use crate::domain::lane_change::decide_lane_change;
use crate::domain::road::Road;
use crate::domain::velocity::{Draws, Headway, update_velocity};

/// Drives single steps of the automaton and owns the per-step scratch state.
#[derive(Debug)]
pub struct StepOrchestrator {
    vmax: u32,
    p_start: f64,
    p_dec: f64,
    steps_done: usize,
    draws: Vec<Draws>,
    snapshot: Vec<Car>,
    lane_change: Vec<AtomicBool>,
}

impl StepOrchestrator {
    /// Creates an orchestrator sized for `params.n` cars.
    #[must_use]
    pub fn new(params: &Params) -> Self {
        Self {
            vmax: params.vmax,
            p_start: params.p_start,
            p_dec: params.p_dec,
            steps_done: 0,
            draws: vec![Draws::default(); params.n],
            snapshot: Vec::with_capacity(params.n),
            lane_change: (0..params.n).map(|_| AtomicBool::new(false)).collect(),
        }
    }

    /// Number of steps completed so far.
    #[must_use]
    pub fn steps_done(&self) -> usize {
        self.steps_done
    }

    /// The coins drawn for the most recent step, indexed by car id.
    #[must_use]
    pub fn draws(&self) -> &[Draws] {
        &self.draws
    }

    /// Runs one full step on `road`.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvariantViolation` if a car cannot be found in its
    /// own lane list during the velocity phase, which only happens when the
    /// road was already inconsistent.
    pub fn step(&mut self, road: &mut Road, rng: &mut dyn RandomSource) -> Result<(), SimError> {
        self.draw(rng);
        self.take_snapshot(road);
        self.decide_lane_changes(road);
        self.apply_lane_changes(road);
        road.rebuild_lanes();
        self.update_velocities(road)?;
        road.advance();

        self.steps_done += 1;
        Ok(())
    }

    /// Phase 1. When both probabilities are 0 or 1 every coin is known in
    /// advance, so the stream is jumped forward by the same number of draws
    /// instead of stepped through them.
    fn draw(&mut self, rng: &mut dyn RandomSource) {
        if let (Some(start), Some(decelerate)) = (certain(self.p_start), certain(self.p_dec)) {
            self.draws.fill(Draws { start, decelerate });
            rng.discard(2 * self.draws.len() as u64);
            return;
        }

        for draws in &mut self.draws {
            draws.start = rng.flip_coin(self.p_start);
            draws.decelerate = rng.flip_coin(self.p_dec);
        }
    }

    /// Phase 2.
    fn take_snapshot(&mut self, road: &Road) {
        self.snapshot.resize(road.cars().len(), Car::new(0, Lane::Left, 0, 0));
        self.snapshot
            .par_iter_mut()
            .zip(road.cars().par_iter())
            .for_each(|(old, car)| *old = *car);
    }

    /// Phase 3. Each car writes only its own flag.
    fn decide_lane_changes(&self, road: &Road) {
        for lane in Lane::ALL {
            let own = road.lane(lane);
            let other = road.lane(lane.other());
            own.par_iter().enumerate().for_each(|(idx, &id)| {
                let change = decide_lane_change(road, own, other, idx);
                self.lane_change[id].store(change, Ordering::Relaxed);
            });
        }
    }

    /// Phase 4.
    fn apply_lane_changes(&self, road: &mut Road) {
        road.cars_mut()
            .par_iter_mut()
            .zip(self.lane_change.par_iter())
            .for_each(|(car, flag)| {
                if flag.swap(false, Ordering::Relaxed) {
                    car.lane = car.lane.other();
                }
            });
    }

    /// Phase 6. Lanes never share a car, so one pass over all cars is the
    /// same as a pass per lane.
    fn update_velocities(&self, road: &mut Road) -> Result<(), SimError> {
        let length = road.length();
        let vmax = self.vmax;
        let step = self.steps_done;
        let snapshot = &self.snapshot;
        let draws = &self.draws;
        let (cars, lanes) = road.split_mut();

        cars.par_iter_mut().try_for_each(|car| {
            let lane = &lanes[car.lane.index()];
            // Positions have not moved since the snapshot, so it orders the lane.
            let idx = lane
                .binary_search_by_key(&(car.position, car.id), |&id| {
                    (snapshot[id].position, id)
                })
                .map_err(|_| SimError::InvariantViolation {
                    step,
                    detail: format!("car {} is missing from lane {}", car.id, car.lane),
                })?;
            let headway = Headway::ahead_of(length, snapshot, lane, idx);
            update_velocity(car, headway, draws[car.id], vmax);
            Ok(())
        })
    }
}

fn certain(p: f64) -> Option<bool> {
    if p <= 0.0 {
        Some(false)
    } else if p >= 1.0 {
        Some(true)
    } else {
        None
    }
}
