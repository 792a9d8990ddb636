//! Named logger factory and registry.
//!
//! A [`MateConfig`] declares loggers, each with per-environment settings
//! (level, formatter, hooks). A [`LogMate`] builds one [`Logger`] per
//! declared name for the active environment and serves them by name.
//! Formatters and hooks are resolved by name from [`Plugins`].
//!
//! ```text
//! MateConfig → validate → LogMate::initialize
//!     → per logger: LoggerConfig for run_env (or the default)
//!     → Plugins resolve formatter + hooks, parse level
//!     → Arc<Logger> cached by name → LogMate::logger(name)
//! ```

pub mod config;
pub mod error;
pub mod logger;
pub mod mate;
pub mod plugins;

pub use config::{FormatterConfig, LoggerConfig, LoggerItem, MateConfig, Options};
pub use error::{MateError, PluginError, PluginKind};
pub use logger::{Entry, Level, Logger};
pub use mate::{default_mate, logger, new_logger, LogMate};
pub use plugins::{register_formatter, register_hook, Formatter, Hook, Plugins};
