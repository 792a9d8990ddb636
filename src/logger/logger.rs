//! Logger instances.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::logger::entry::Entry;
use crate::logger::level::Level;
use crate::plugins::formatter::{Formatter, TextFormatter};
use crate::plugins::hook::Hook;

/// Failure while emitting a single record.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to serialize entry: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("{0}")]
    Other(String),
}

/// A configured sink: threshold, formatter, hooks and an output writer.
pub struct Logger {
    level: Level,
    formatter_name: String,
    formatter: Box<dyn Formatter>,
    hooks: Vec<Box<dyn Hook>>,
    out: Mutex<Box<dyn Write + Send>>,
}

impl Logger {
    /// A logger at info level writing text to stderr, with no hooks.
    pub fn new() -> Self {
        Self {
            level: Level::Info,
            formatter_name: "text".to_string(),
            formatter: Box::new(TextFormatter::default()),
            hooks: Vec::new(),
            out: Mutex::new(Box::new(io::stderr())),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn set_level(&mut self, level: Level) {
        self.level = level;
    }

    /// Name the formatter was registered under.
    pub fn formatter_name(&self) -> &str {
        &self.formatter_name
    }

    pub fn set_formatter(&mut self, name: impl Into<String>, formatter: Box<dyn Formatter>) {
        self.formatter_name = name.into();
        self.formatter = formatter;
    }

    pub fn add_hook(&mut self, hook: Box<dyn Hook>) {
        self.hooks.push(hook);
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Redirect output. Safe to call while other threads are logging.
    pub fn set_output<W: Write + Send + 'static>(&self, out: W) {
        *self.out.lock().unwrap_or_else(PoisonError::into_inner) = Box::new(out);
    }

    pub fn is_enabled(&self, level: Level) -> bool {
        level <= self.level
    }

    pub fn log(&self, level: Level, message: impl Into<String>) {
        if self.is_enabled(level) {
            self.emit(Entry::new(level, message));
        }
    }

    pub fn trace(&self, message: impl Into<String>) {
        self.log(Level::Trace, message);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::Debug, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::Info, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log(Level::Warn, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::Error, message);
    }

    /// Start a record carrying one structured field.
    pub fn with_field(&self, key: impl Into<String>, value: impl Serialize) -> EntryBuilder<'_> {
        EntryBuilder {
            logger: self,
            fields: BTreeMap::new(),
        }
        .with_field(key, value)
    }

    /// Start a record carrying several structured fields.
    pub fn with_fields<I>(&self, fields: I) -> EntryBuilder<'_>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        EntryBuilder {
            logger: self,
            fields: fields.into_iter().collect(),
        }
    }

    /// Fire matching hooks, then format and write the record.
    pub fn emit(&self, entry: Entry) {
        if !self.is_enabled(entry.level) {
            return;
        }

        for hook in &self.hooks {
            if !hook.levels().contains(&entry.level) {
                continue;
            }
            if let Err(e) = hook.fire(&entry) {
                tracing::warn!(error = %e, level = %entry.level, "Failed to fire hook");
            }
        }

        if let Err(e) = self.write(&entry) {
            tracing::warn!(error = %e, formatter = %self.formatter_name, "Failed to write log entry");
        }
    }

    fn write(&self, entry: &Entry) -> Result<(), LogError> {
        let bytes = self.formatter.format(entry)?;
        if bytes.is_empty() {
            return Ok(());
        }
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        out.write_all(&bytes)?;
        out.flush()?;
        Ok(())
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level)
            .field("formatter", &self.formatter_name)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

/// A record under construction; emitted by one of the level methods.
#[derive(Debug)]
pub struct EntryBuilder<'a> {
    logger: &'a Logger,
    fields: BTreeMap<String, Value>,
}

impl EntryBuilder<'_> {
    pub fn with_field(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or_else(|e| Value::String(e.to_string()));
        self.fields.insert(key.into(), value);
        self
    }

    pub fn log(self, level: Level, message: impl Into<String>) {
        if !self.logger.is_enabled(level) {
            return;
        }
        let mut entry = Entry::new(level, message);
        entry.fields = self.fields;
        self.logger.emit(entry);
    }

    pub fn trace(self, message: impl Into<String>) {
        self.log(Level::Trace, message);
    }

    pub fn debug(self, message: impl Into<String>) {
        self.log(Level::Debug, message);
    }

    pub fn info(self, message: impl Into<String>) {
        self.log(Level::Info, message);
    }

    pub fn warn(self, message: impl Into<String>) {
        self.log(Level::Warn, message);
    }

    pub fn error(self, message: impl Into<String>) {
        self.log(Level::Error, message);
    }
}
