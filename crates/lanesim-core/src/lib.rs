//! Lanesim Core: shared domain types for the two-lane traffic automaton.
//!
//! This crate defines the parameter record, the car record, the error
//! taxonomy, the step observer seam and the seeded generator that every
//! other crate depends on. It contains no I/O and no scheduling code.

pub mod car;
pub mod error;
pub mod observer;
pub mod params;
pub mod rng;
