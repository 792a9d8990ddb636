//! Logger registries.
//!
//! # Data Flow
//! ```text
//! MateConfig
//!     → LogMate::initialize (validate, pick run env, build each logger)
//!     → name → Arc<Logger> cache
//!     → LogMate::logger(name) / log_mate::logger(name)
//! ```
//!
//! # Design Decisions
//! - Each registry guards its map with a mutex and its population with a
//!   one-time barrier
//! - The process-wide registry is a single well-known global created on
//!   first use and never torn down

pub mod global;
pub mod registry;

pub use global::{default_mate, logger, new_logger};
pub use registry::LogMate;
