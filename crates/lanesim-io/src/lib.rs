//! Lanesim IO: the thin shells around the engine.
//!
//! The loader turns text or YAML scenario files into validated parameters and
//! cars, the reporter renders final and per-step state, and the generator
//! writes fresh scenarios in the text format.

pub mod generator;
pub mod loader;
pub mod reporter;
