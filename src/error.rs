//! Error types for logger construction.
//!
//! # Design Decisions
//! - Every construction failure is returned to the caller, never logged
//! - `MateError` is `Clone` so a registry can hand the result of its first
//!   initialization attempt to every later caller

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::config::validation::ValidationError;
use crate::logger::ParseLevelError;

/// Which plugin registry a name was resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginKind {
    Formatter,
    Hook,
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginKind::Formatter => write!(f, "formatter"),
            PluginKind::Hook => write!(f, "hook"),
        }
    }
}

/// Error raised by a plugin constructor when it rejects its options.
#[derive(Debug, Clone, Error)]
pub enum PluginError {
    #[error("option `{key}` is invalid: {reason}")]
    InvalidOption { key: String, reason: String },

    #[error("required option `{key}` is missing")]
    MissingOption { key: String },

    #[error("I/O error: {0}")]
    Io(Arc<std::io::Error>),

    #[error(transparent)]
    Custom(Arc<dyn std::error::Error + Send + Sync>),
}

impl PluginError {
    pub fn invalid_option(key: impl Into<String>, reason: impl Into<String>) -> Self {
        PluginError::InvalidOption {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Wrap an arbitrary error raised by a third-party constructor.
    pub fn custom<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        PluginError::Custom(Arc::new(err))
    }
}

impl From<std::io::Error> for PluginError {
    fn from(err: std::io::Error) -> Self {
        PluginError::Io(Arc::new(err))
    }
}

/// Error type for registry initialization and logger construction.
#[derive(Debug, Clone, Error)]
pub enum MateError {
    #[error("invalid configuration: {}", join_errors(.0))]
    ConfigValidation(Vec<ValidationError>),

    #[error("{kind} plugin not found: {name:?}")]
    PluginNotFound { kind: PluginKind, name: String },

    #[error("failed to construct {kind} plugin {name:?}: {source}")]
    PluginConstruction {
        kind: PluginKind,
        name: String,
        #[source]
        source: PluginError,
    },

    #[error(transparent)]
    LevelParse(#[from] ParseLevelError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
