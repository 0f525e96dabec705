//! Road model and per-car rules.

pub mod lane_change;
pub mod road;
pub mod velocity;
