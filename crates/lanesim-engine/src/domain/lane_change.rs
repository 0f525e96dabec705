//! Lane-change decision.
//!
//! A car moves to the other lane when it is currently held back by the car
//! ahead, the other lane offers strictly more headroom, the car that would
//! end up behind it there cannot reach it this step, and the target cell is
//! free. The decision reads the road only; applying it is a separate phase.

use super::road::Road;

/// Decides whether the car at `own[idx]` should switch to the other lane.
///
/// `own` and `other` are the position-sorted id lists of the car's lane and
/// of the opposite lane. An empty `other` lane never accepts a car.
#[must_use]
pub fn decide_lane_change(road: &Road, own: &[usize], other: &[usize], idx: usize) -> bool {
    if other.is_empty() {
        return false;
    }

    let cars = road.cars();
    let id = own[idx];
    let car = &cars[id];

    // First car at or past our position, wrapping to the head of the list.
    let found = other.partition_point(|&cid| cars[cid].position < car.position);
    let front = other.get(found).copied().unwrap_or(other[0]);
    let back = if found == 0 {
        other[other.len() - 1]
    } else {
        other[found - 1]
    };
    let ahead = own[(idx + 1) % own.len()];

    let behind_gap = road.gap(back, id);
    let own_gap = road.gap(id, ahead);
    let other_gap = road.gap(id, front);

    behind_gap > 0
        && own_gap < other_gap
        && car.v >= own_gap
        && behind_gap > cars[back].v
        && cars[front].position != car.position
}
