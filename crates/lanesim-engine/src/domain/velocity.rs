//! Velocity update rules.
//!
//! Rules are evaluated in priority order:
//!
//! 1. A pending slow-to-start forces `v = 1` and is consumed.
//! 2. A stopped car with room ahead departs only if its start draw succeeds;
//!    otherwise it defers with a pending slow-to-start.
//! 3. A car moving into a short gap brakes, using the leader's velocity from
//!    the previous step to decide how hard.
//! 4. If neither rule 1 nor rule 3 fired, the car accelerates by one, provided
//!    that keeps it strictly behind the leader.
//! 5. A successful deceleration draw always takes one off at the end.

use lanesim_core::car::Car;

use super::road::circular_gap;

/// The coin flips drawn for one car in the sequential draw phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Draws {
    /// Whether a stopped car may depart this step.
    pub start: bool,
    /// Whether the car randomly decelerates this step.
    pub decelerate: bool,
}

/// What a car sees ahead of it in its own lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Headway {
    /// Cells to the next car ahead, in `(0, L]`.
    pub gap: u32,
    /// That car's velocity at the start of the step.
    pub leader_v: u32,
}

impl Headway {
    /// Reads the headway of the car at `lane[idx]` from the start-of-step
    /// snapshot. A car alone in its lane follows itself a full lap ahead.
    #[must_use]
    pub fn ahead_of(length: u32, snapshot: &[Car], lane: &[usize], idx: usize) -> Self {
        let id = lane[idx];
        let next = lane[(idx + 1) % lane.len()];
        Self {
            gap: circular_gap(length, snapshot[id].position, snapshot[next].position),
            leader_v: snapshot[next].v,
        }
    }
}

/// Which of the state-dependent rules fired during an update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppliedRules {
    /// A pending slow-to-start was consumed.
    pub slow_start: bool,
    /// The car braked for the car ahead.
    pub braked: bool,
}

/// Updates `car.v` (and its sticky slow-to-start flag) for one step.
pub fn update_velocity(car: &mut Car, headway: Headway, draws: Draws, vmax: u32) -> AppliedRules {
    let Headway { gap, leader_v } = headway;
    let mut applied = AppliedRules::default();

    if car.slow_start_pending {
        car.v = 1;
        car.slow_start_pending = false;
        applied.slow_start = true;
    }

    if car.v == 0 && gap > 1 {
        if draws.start {
            if car.v + 1 < gap {
                car.v = (car.v + 1).min(vmax);
            }
        } else {
            car.slow_start_pending = true;
        }
    } else {
        if gap <= car.v {
            car.v = if car.v < leader_v || car.v < 2 {
                gap - 1
            } else {
                (gap - 1).min(car.v - 2)
            };
            applied.braked = true;
        } else if gap - car.v <= car.v && car.v >= leader_v {
            car.v -= (car.v - leader_v) / 2;
            applied.braked = true;
        }

        if !applied.braked && !applied.slow_start && car.v + 1 < gap {
            car.v = (car.v + 1).min(vmax);
        }
    }

    if draws.decelerate {
        car.v = car.v.saturating_sub(1);
    }
    applied
}
