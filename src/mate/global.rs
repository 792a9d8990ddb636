//! Process-wide default registry.
//!
//! Built from [`default_mate_config`] on first access, by exactly one
//! caller; concurrent first callers wait for it. Lives for the rest of
//! the process.

use std::sync::{Arc, OnceLock};

use crate::config::{default_mate_config, LoggerConfig};
use crate::error::MateError;
use crate::logger::Logger;
use crate::mate::registry::LogMate;

static DEFAULT_MATE: OnceLock<LogMate> = OnceLock::new();

/// The process-wide registry, created on first call.
///
/// # Panics
/// If the built-in default configuration fails to build. That is a defect
/// in the defaults (or a broken `text` formatter registration), not a
/// runtime condition.
pub fn default_mate() -> &'static LogMate {
    DEFAULT_MATE.get_or_init(|| match LogMate::from_config(&default_mate_config()) {
        Ok(mate) => mate,
        Err(e) => panic!("failed to build the default logger registry: {e}"),
    })
}

/// A logger from the process-wide registry; `None` or `""` for the
/// unnamed logger.
pub fn logger<'a>(name: impl Into<Option<&'a str>>) -> Option<Arc<Logger>> {
    default_mate().logger(name)
}

/// Build a logger and register it in the process-wide registry.
pub fn new_logger(name: impl Into<String>, config: &LoggerConfig) -> Result<Arc<Logger>, MateError> {
    default_mate().new_logger(name, config)
}
