//! Pluggable formatters and hooks.
//!
//! # Data Flow
//! ```text
//! LoggerConfig.formatter {name, options}
//!     → Plugins.formatters().resolve(name, options) → Box<dyn Formatter>
//! LoggerConfig.hooks {name → options}
//!     → Plugins.hooks().resolve(name, options)      → Box<dyn Hook>
//! ```
//!
//! # Design Decisions
//! - Plugins are looked up by name in an explicit table of constructors,
//!   populated at process start
//! - An unknown name or a rejected option is always an error; nothing
//!   falls back to a different plugin
//! - The process-wide table starts with the built-ins and can be extended
//!   with `register_formatter` / `register_hook`

pub mod formatter;
pub mod hook;
pub mod options;
pub mod registry;

pub use formatter::{Formatter, JsonFormatter, NullFormatter, TextFormatter, TimestampOptions};
pub use hook::{FileHook, Hook, TracingHook};
pub use registry::{register_formatter, register_hook, Constructor, PluginRegistry, Plugins};
