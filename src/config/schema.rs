//! Configuration schema definitions.
//!
//! All types derive Serde traits so a configuration can be deserialized
//! from any self-describing format.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Opaque options handed to a plugin constructor.
pub type Options = serde_json::Map<String, serde_json::Value>;

/// Root configuration: the active environment plus every declared logger.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct MateConfig {
    /// Selects which per-environment variant is active.
    pub environments: Environments,

    /// Declared loggers, built in this order.
    pub loggers: Vec<LoggerItem>,
}

impl MateConfig {
    /// The active environment key.
    pub fn run_env(&self) -> &str {
        &self.environments.run_env
    }
}

/// Environment selector.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Environments {
    /// Active environment name (e.g., "development", "production").
    pub run_env: String,
}

impl Default for Environments {
    fn default() -> Self {
        Self {
            run_env: "development".to_string(),
        }
    }
}

/// One logical logger across all deployment environments.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct LoggerItem {
    /// Logger name. The empty string is the unnamed (default) logger.
    pub name: String,

    /// Environment name -> settings for that environment.
    pub config: HashMap<String, LoggerConfig>,
}

impl LoggerItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: HashMap::new(),
        }
    }

    /// Add (or replace) the settings used in `env`.
    pub fn with_env(mut self, env: impl Into<String>, config: LoggerConfig) -> Self {
        self.config.insert(env.into(), config);
        self
    }

    /// Settings for `env`, falling back to [`LoggerConfig::default`].
    pub fn config_for(&self, env: &str) -> LoggerConfig {
        self.config.get(env).cloned().unwrap_or_default()
    }
}

/// Resolved settings for exactly one logger in one environment.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggerConfig {
    /// Minimum severity (panic, fatal, error, warn, info, debug, trace).
    /// Left empty when omitted, which fails to parse at build time.
    #[serde(default)]
    pub level: String,

    /// Output formatter. An unnamed formatter is resolved as plain text.
    #[serde(default)]
    pub formatter: FormatterConfig,

    /// Hook name -> hook options. Unordered.
    pub hooks: HashMap<String, Options>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
            formatter: FormatterConfig::new("text"),
            hooks: HashMap::new(),
        }
    }
}

impl LoggerConfig {
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_formatter(mut self, formatter: FormatterConfig) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_hook(mut self, name: impl Into<String>, options: Options) -> Self {
        self.hooks.insert(name.into(), options);
        self
    }

    /// Formatter to resolve: an unnamed formatter becomes the default text
    /// formatter with no options.
    pub fn effective_formatter(&self) -> FormatterConfig {
        if self.formatter.name.is_empty() {
            FormatterConfig::new("text")
        } else {
            self.formatter.clone()
        }
    }
}

/// Formatter selection.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct FormatterConfig {
    /// Registered formatter name; empty means unset.
    pub name: String,

    /// Options passed to the formatter constructor.
    pub options: Option<Options>,
}

impl FormatterConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: None,
        }
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }
}

/// Configuration backing the process-wide default registry: one unnamed
/// logger, development environment, debug level, text formatter, no hooks.
pub fn default_mate_config() -> MateConfig {
    MateConfig {
        environments: Environments::default(),
        loggers: vec![LoggerItem::new("").with_env("development", LoggerConfig::default())],
    }
}
