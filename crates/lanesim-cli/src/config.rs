//! Run configuration from flags and environment.
//!
//! `LANESIM_THREADS` supplies the default worker count and
//! `LANESIM_CHECK_INVARIANTS=1` turns on the per-step invariant check.
//! Command line flags win over the environment.

use std::path::PathBuf;

use lanesim_io::loader::InputFormat;

use crate::cli::{OutputFormat, RunArgs};
use crate::error::AppError;

/// Worker count variable.
pub const THREADS_VAR: &str = "LANESIM_THREADS";
/// Invariant check variable.
pub const CHECK_INVARIANTS_VAR: &str = "LANESIM_CHECK_INVARIANTS";

/// Settings read from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// Default worker count.
    pub threads: Option<usize>,
    /// Whether to check invariants after every step.
    pub check_invariants: bool,
}

impl EnvConfig {
    /// Reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its
    /// value if set.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an unusable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let threads = lookup(THREADS_VAR)
            .map(|raw| {
                raw.trim().parse::<usize>().map_err(|e| {
                    AppError::Config(format!("{THREADS_VAR} must be a thread count, got {raw:?}: {e}"))
                })
            })
            .transpose()?;

        let check_invariants = match lookup(CHECK_INVARIANTS_VAR).as_deref().map(str::trim) {
            None | Some("" | "0" | "false") => false,
            Some("1" | "true") => true,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "{CHECK_INVARIANTS_VAR} must be 0 or 1, got {other:?}"
                )));
            }
        };

        Ok(Self {
            threads,
            check_invariants,
        })
    }
}

/// Fully resolved settings of one `run` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Scenario file, or stdin when `None`.
    pub input: Option<PathBuf>,
    /// Explicit input format.
    pub format: Option<InputFormat>,
    /// Worker count; 0 keeps the global rayon pool.
    pub threads: usize,
    /// Report format.
    pub output: OutputFormat,
    /// Whether to append the state digest.
    pub digest: bool,
    /// Whether to check invariants after every step.
    pub check_invariants: bool,
    /// Whether to dump every step to stderr.
    pub dump_steps: bool,
}

impl RunConfig {
    /// Merges command line flags over environment settings.
    #[must_use]
    pub fn resolve(args: RunArgs, env: &EnvConfig) -> Self {
        Self {
            input: args.input,
            format: args.format.map(InputFormat::from),
            threads: args.threads.or(env.threads).unwrap_or(0),
            output: args.output,
            digest: args.digest,
            check_invariants: args.check_invariants || env.check_invariants,
            dump_steps: args.dump_steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::FormatArg;

    fn env_of(pairs: &[(&str, &str)]) -> Result<EnvConfig, AppError> {
        EnvConfig::from_lookup(|key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_owned())
        })
    }

    // --- environment ---

    #[test]
    fn test_empty_environment_gives_defaults() {
        assert_eq!(env_of(&[]).unwrap(), EnvConfig::default());
    }

    #[test]
    fn test_environment_values_are_read() {
        let env = env_of(&[(THREADS_VAR, "6"), (CHECK_INVARIANTS_VAR, "1")]).unwrap();

        assert_eq!(env.threads, Some(6));
        assert!(env.check_invariants);
    }

    #[test]
    fn test_bad_thread_count_is_a_config_error() {
        assert!(matches!(
            env_of(&[(THREADS_VAR, "many")]),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_bad_check_flag_is_a_config_error() {
        assert!(matches!(
            env_of(&[(CHECK_INVARIANTS_VAR, "maybe")]),
            Err(AppError::Config(_))
        ));
    }

    // --- resolution ---

    #[test]
    fn test_flags_override_environment() {
        let env = EnvConfig {
            threads: Some(8),
            check_invariants: false,
        };
        let args = RunArgs {
            threads: Some(2),
            check_invariants: true,
            format: Some(FormatArg::Yaml),
            ..RunArgs::default()
        };

        let config = RunConfig::resolve(args, &env);

        assert_eq!(config.threads, 2);
        assert!(config.check_invariants);
        assert_eq!(config.format, Some(InputFormat::Yaml));
    }

    #[test]
    fn test_environment_fills_missing_flags() {
        let env = EnvConfig {
            threads: Some(8),
            check_invariants: true,
        };

        let config = RunConfig::resolve(RunArgs::default(), &env);

        assert_eq!(config.threads, 8);
        assert!(config.check_invariants);
    }

    #[test]
    fn test_threads_default_to_global_pool() {
        let config = RunConfig::resolve(RunArgs::default(), &EnvConfig::default());

        assert_eq!(config.threads, 0);
    }
}
