//! Shared test doubles and fixtures for the lanesim workspace.

mod fixtures;
mod observer;
mod rng;

pub use fixtures::{car, params};
pub use observer::RecordingObserver;
pub use rng::{MockRng, SequenceRng};
