//! Lanesim Engine: the per-step state transition.
//!
//! The domain layer holds the road model and the per-car rules (lane change,
//! velocity update). The application layer sequences those rules into the
//! seven phases of a step and drives whole runs.

pub mod application;
pub mod domain;
