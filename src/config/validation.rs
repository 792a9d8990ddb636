//! Configuration validation.
//!
//! # Responsibilities
//! - Reject an empty run environment selector
//! - Reject duplicate logger names (two unnamed loggers included)
//! - Reject empty environment keys and empty hook names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MateConfig → Result<(), Vec<ValidationError>>
//! - Runs before any logger is built
//! - Levels and plugin names are checked when a logger is built, not here

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::MateConfig;

/// A single structural problem in a [`MateConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("run environment must not be empty")]
    EmptyRunEnv,

    #[error("logger {name:?} is declared more than once")]
    DuplicateLogger { name: String },

    #[error("logger {logger:?} has a configuration with an empty environment name")]
    EmptyEnvironmentKey { logger: String },

    #[error("logger {logger:?} declares a hook with an empty name in environment {environment:?}")]
    EmptyHookName { logger: String, environment: String },
}

/// Check a configuration before it is used to build loggers.
pub fn validate_config(config: &MateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.run_env().trim().is_empty() {
        errors.push(ValidationError::EmptyRunEnv);
    }

    let mut seen = HashSet::new();
    for item in &config.loggers {
        if !seen.insert(item.name.as_str()) {
            errors.push(ValidationError::DuplicateLogger {
                name: item.name.clone(),
            });
        }

        // Sorted so the error list is stable across runs.
        let mut envs: Vec<_> = item.config.iter().collect();
        envs.sort_by(|a, b| a.0.cmp(b.0));

        for (env, logger_config) in envs {
            if env.trim().is_empty() {
                errors.push(ValidationError::EmptyEnvironmentKey {
                    logger: item.name.clone(),
                });
            }
            if logger_config.hooks.keys().any(|hook| hook.is_empty()) {
                errors.push(ValidationError::EmptyHookName {
                    logger: item.name.clone(),
                    environment: env.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
