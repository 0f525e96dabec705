//! Step observer abstraction.

use crate::car::Car;
use crate::error::SimError;

/// Receives the full car state after every completed step.
///
/// Observers run on the driving thread between steps, never inside a
/// parallel phase.
pub trait StepObserver {
    /// Called once per step with every car in id order.
    ///
    /// # Errors
    ///
    /// Returning an error aborts the run; the error is surfaced to the caller.
    fn on_step(&mut self, step: usize, cars: &[Car]) -> Result<(), SimError>;
}

/// An observer that ignores every step.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl StepObserver for NoopObserver {
    fn on_step(&mut self, _step: usize, _cars: &[Car]) -> Result<(), SimError> {
        Ok(())
    }
}

impl<A: StepObserver, B: StepObserver> StepObserver for (A, B) {
    fn on_step(&mut self, step: usize, cars: &[Car]) -> Result<(), SimError> {
        self.0.on_step(step, cars)?;
        self.1.on_step(step, cars)
    }
}

impl<T: StepObserver + ?Sized> StepObserver for &mut T {
    fn on_step(&mut self, step: usize, cars: &[Car]) -> Result<(), SimError> {
        (**self).on_step(step, cars)
    }
}

impl<T: StepObserver + ?Sized> StepObserver for Box<T> {
    fn on_step(&mut self, step: usize, cars: &[Car]) -> Result<(), SimError> {
        (**self).on_step(step, cars)
    }
}
