//! Domain error types.

use thiserror::Error;

/// Top-level error type for loading, validating and running a simulation.
///
/// Every variant is fatal: the simulation is a pure function of its inputs,
/// so nothing downstream retries or resumes after one of these.
#[derive(Debug, Error)]
pub enum SimError {
    /// A parameter is outside its allowed range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A car record in the initial state is unusable.
    #[error("invalid car {id}: {reason}")]
    InvalidCar {
        /// The 0-based id of the offending car.
        id: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// The scenario input could not be parsed.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line of the offending token (0 when unknown).
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// An internal-consistency check failed after a step.
    #[error("invariant violated after step {step}: {detail}")]
    InvariantViolation {
        /// The step after which the violation was observed.
        step: usize,
        /// Description of the violation.
        detail: String,
    },

    /// Reading input or writing a report failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
