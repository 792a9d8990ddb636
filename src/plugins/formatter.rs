//! Formatters: render an entry into the bytes written by a logger.
//!
//! Built-ins: `text` (logfmt-style), `json` (one object per line) and
//! `null` (discards everything).

use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use serde_json::{Map, Value};

use crate::config::Options;
use crate::error::PluginError;
use crate::logger::{Entry, LogError};
use crate::plugins::options::{bool_option, str_option};

/// Renders entries for a logger's output.
pub trait Formatter: Send + Sync {
    fn format(&self, entry: &Entry) -> Result<Vec<u8>, LogError>;
}

/// Timestamp handling shared by the text and json formatters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimestampOptions {
    pub disable_timestamp: bool,
    /// chrono strftime pattern; RFC 3339 when unset.
    pub timestamp_format: Option<String>,
}

impl TimestampOptions {
    pub fn from_options(options: Option<&Options>) -> Result<Self, PluginError> {
        let disable_timestamp = bool_option(options, "disable_timestamp")?.unwrap_or(false);
        let timestamp_format = str_option(options, "timestamp_format")?.map(str::to_string);

        if let Some(pattern) = &timestamp_format {
            if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
                return Err(PluginError::invalid_option(
                    "timestamp_format",
                    format!("{pattern:?} is not a valid strftime pattern"),
                ));
            }
        }

        Ok(Self {
            disable_timestamp,
            timestamp_format,
        })
    }

    fn render(&self, entry: &Entry) -> Result<Option<String>, LogError> {
        if self.disable_timestamp {
            return Ok(None);
        }
        match &self.timestamp_format {
            None => Ok(Some(entry.time.to_rfc3339())),
            Some(pattern) => {
                let mut out = String::new();
                write!(out, "{}", entry.time.format(pattern))
                    .map_err(|_| LogError::Other(format!("cannot format timestamp with {pattern:?}")))?;
                Ok(Some(out))
            }
        }
    }
}

/// `time="..." level=info msg="..." key=value`, fields sorted by key.
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    timestamp: TimestampOptions,
}

impl TextFormatter {
    pub fn new(timestamp: TimestampOptions) -> Self {
        Self { timestamp }
    }

    pub fn from_options(options: Option<&Options>) -> Result<Self, PluginError> {
        Ok(Self::new(TimestampOptions::from_options(options)?))
    }
}

fn needs_quoting(text: &str) -> bool {
    text.is_empty()
        || !text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '/' | '@' | '^' | '+'))
}

fn append_value(line: &mut String, text: &str) {
    if needs_quoting(text) {
        // serde_json's string encoding gives us escaped, double-quoted output.
        line.push_str(&Value::String(text.to_string()).to_string());
    } else {
        line.push_str(text);
    }
}

fn append_pair(line: &mut String, key: &str, text: &str) {
    if !line.is_empty() {
        line.push(' ');
    }
    append_value(line, key);
    line.push('=');
    append_value(line, text);
}

impl Formatter for TextFormatter {
    fn format(&self, entry: &Entry) -> Result<Vec<u8>, LogError> {
        let mut line = String::new();

        if let Some(time) = self.timestamp.render(entry)? {
            append_pair(&mut line, "time", &time);
        }
        append_pair(&mut line, "level", entry.level.as_str());
        append_pair(&mut line, "msg", &entry.message);

        for (key, value) in &entry.fields {
            match value {
                Value::String(s) => append_pair(&mut line, key, s),
                other => append_pair(&mut line, key, &other.to_string()),
            }
        }

        line.push('\n');
        Ok(line.into_bytes())
    }
}

/// One JSON object per record.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    timestamp: TimestampOptions,
    pretty_print: bool,
}

impl JsonFormatter {
    pub fn new(timestamp: TimestampOptions, pretty_print: bool) -> Self {
        Self {
            timestamp,
            pretty_print,
        }
    }

    pub fn from_options(options: Option<&Options>) -> Result<Self, PluginError> {
        Ok(Self::new(
            TimestampOptions::from_options(options)?,
            bool_option(options, "pretty_print")?.unwrap_or(false),
        ))
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, entry: &Entry) -> Result<Vec<u8>, LogError> {
        let mut object = Map::new();

        for (key, value) in &entry.fields {
            // Reserved keys are moved aside instead of being overwritten.
            let key = match key.as_str() {
                "time" | "level" | "msg" => format!("fields.{key}"),
                _ => key.clone(),
            };
            object.insert(key, value.clone());
        }
        if let Some(time) = self.timestamp.render(entry)? {
            object.insert("time".into(), Value::String(time));
        }
        object.insert("level".into(), Value::String(entry.level.as_str().into()));
        object.insert("msg".into(), Value::String(entry.message.clone()));

        let object = Value::Object(object);
        let mut bytes = if self.pretty_print {
            serde_json::to_vec_pretty(&object)?
        } else {
            serde_json::to_vec(&object)?
        };
        bytes.push(b'\n');
        Ok(bytes)
    }
}

/// Discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFormatter;

impl Formatter for NullFormatter {
    fn format(&self, _entry: &Entry) -> Result<Vec<u8>, LogError> {
        Ok(Vec::new())
    }
}
