//! Logging primitive configured by the registry.
//!
//! # Responsibilities
//! - Severity levels and parsing from names
//! - Log records (entries) with structured fields
//! - Loggers with a threshold, a formatter, hooks and an output sink
//!
//! # Design Decisions
//! - A logger is fully configured before it is shared, then only its output
//!   sink can change
//! - Hook and formatter failures while emitting never reach the caller;
//!   they are reported through `tracing`

pub mod entry;
pub mod level;
#[allow(clippy::module_inception)]
pub mod logger;

pub use entry::Entry;
pub use level::{Level, ParseLevelError};
pub use logger::{EntryBuilder, LogError, Logger};
