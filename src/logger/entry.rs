//! Log records.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::logger::level::Level;

/// A single log record as seen by formatters and hooks.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// When the record was created.
    pub time: DateTime<Utc>,
    pub level: Level,
    pub message: String,
    /// Structured fields, kept sorted by key.
    pub fields: BTreeMap<String, Value>,
}

impl Entry {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            time: Utc::now(),
            level,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Attach a field. Values that fail to serialize are stored as their
    /// error message so the record is never lost.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or_else(|e| Value::String(e.to_string()));
        self.fields.insert(key.into(), value);
        self
    }
}
