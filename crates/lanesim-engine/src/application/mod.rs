//! Step orchestration and run driving.

pub mod simulation;
pub mod step;
