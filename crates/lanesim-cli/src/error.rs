//! Application error types.

use lanesim_core::error::SimError;
use thiserror::Error;

/// Every way the `lanesim` binary can fail.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable holds an unusable value.
    #[error("configuration error: {0}")]
    Config(String),

    /// Loading, validating or running the simulation failed.
    #[error("{0}")]
    Simulation(#[from] SimError),

    /// Writing the report or a generated scenario failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_message() {
        let err = AppError::Config("LANESIM_THREADS must be a number".to_owned());
        assert_eq!(
            err.to_string(),
            "configuration error: LANESIM_THREADS must be a number"
        );
    }

    #[test]
    fn test_simulation_error_keeps_its_message() {
        let err = AppError::from(SimError::Parse {
            line: 4,
            message: "invalid vmax \"x\"".to_owned(),
        });
        assert_eq!(err.to_string(), "parse error at line 4: invalid vmax \"x\"");
    }

    #[test]
    fn test_io_error_converts() {
        let err: AppError = std::io::Error::other("disk full").into();
        assert!(matches!(err, AppError::Io(_)));
        assert_eq!(err.to_string(), "i/o error: disk full");
    }
}
