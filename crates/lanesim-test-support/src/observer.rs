//! Recording observer that captures every step for later assertions.

use lanesim_core::car::Car;
use lanesim_core::error::SimError;
use lanesim_core::observer::StepObserver;

/// A step observer that keeps a copy of the car state after every step.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    steps: Vec<(usize, Vec<Car>)>,
}

impl RecordingObserver {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every recorded `(step, cars)` pair in arrival order.
    #[must_use]
    pub fn steps(&self) -> &[(usize, Vec<Car>)] {
        &self.steps
    }
}

impl StepObserver for RecordingObserver {
    fn on_step(&mut self, step: usize, cars: &[Car]) -> Result<(), SimError> {
        self.steps.push((step, cars.to_vec()));
        Ok(())
    }
}
