//! Scripted `RandomSource` implementations for tests.

use lanesim_core::rng::RandomSource;

/// An RNG that always draws `0.0` and returns `min` from `uniform_int`.
///
/// Every coin with a positive probability comes up true, every coin with
/// probability zero comes up false. `discard` is a no-op.
#[derive(Debug, Default)]
pub struct MockRng;

impl RandomSource for MockRng {
    fn uniform_real(&mut self) -> f32 {
        0.0
    }

    fn uniform_int(&mut self, min: i32, _max: i32) -> i32 {
        min
    }

    fn discard(&mut self, _z: u64) {}
}

/// An RNG that returns real draws from a predetermined sequence and counts
/// how many draws were consumed, including discarded ones. Panics if the
/// sequence is exhausted.
#[derive(Debug)]
pub struct SequenceRng {
    values: Vec<f32>,
    index: usize,
    consumed: u64,
}

impl SequenceRng {
    /// Create a new `SequenceRng` with the given real draws.
    #[must_use]
    pub fn new(values: Vec<f32>) -> Self {
        Self {
            values,
            index: 0,
            consumed: 0,
        }
    }

    /// Total number of draws taken, including discarded ones.
    #[must_use]
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    fn next(&mut self) -> f32 {
        let val = self.values[self.index];
        self.index += 1;
        self.consumed += 1;
        val
    }
}

impl RandomSource for SequenceRng {
    fn uniform_real(&mut self) -> f32 {
        self.next()
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn uniform_int(&mut self, min: i32, max: i32) -> i32 {
        let span = f64::from(max) - f64::from(min) + 1.0;
        let offset = (f64::from(self.next()) * span).floor();
        min + offset as i32
    }

    #[allow(clippy::cast_possible_truncation)]
    fn discard(&mut self, z: u64) {
        self.index += z as usize;
        self.consumed += z;
    }
}
