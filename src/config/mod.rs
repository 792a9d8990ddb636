//! Configuration model.
//!
//! # Data Flow
//! ```text
//! MateConfig (deserialized or built in code)
//!     → validation.rs (structural checks)
//!     → per logger: select the entry for the active run environment
//!       (fallback: LoggerConfig::default())
//!     → LogMate builds one Logger per declared item
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation is separate from deserialization and always runs first
//! - The active environment is a plain field, never read from the OS

pub mod schema;
pub mod validation;

pub use schema::{
    default_mate_config, Environments, FormatterConfig, LoggerConfig, LoggerItem, MateConfig,
    Options,
};
pub use validation::{validate_config, ValidationError};
