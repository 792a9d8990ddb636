//! Hooks: side effects attached to a logger, fired for every emitted
//! record whose level they subscribe to.
//!
//! Built-ins: `file` (append JSON lines to a file) and `tracing`
//! (re-emit records as `tracing` events).

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::config::Options;
use crate::error::PluginError;
use crate::logger::{Entry, Level, LogError};
use crate::plugins::formatter::{Formatter, JsonFormatter};
use crate::plugins::options::{levels_option, required_str_option};

/// Observes records emitted by a logger.
pub trait Hook: Send + Sync {
    /// Levels this hook fires on.
    fn levels(&self) -> &[Level] {
        &Level::ALL
    }

    fn fire(&self, entry: &Entry) -> Result<(), LogError>;
}

/// Appends every record as a JSON line to a file.
#[derive(Debug)]
pub struct FileHook {
    path: PathBuf,
    levels: Vec<Level>,
    formatter: JsonFormatter,
    file: Mutex<File>,
}

impl FileHook {
    pub fn open(path: impl AsRef<Path>, levels: Vec<Level>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            levels,
            formatter: JsonFormatter::default(),
            file: Mutex::new(file),
        })
    }

    /// Options: `path` (required), `levels` (defaults to every level).
    pub fn from_options(options: Option<&Options>) -> Result<Self, PluginError> {
        let path = required_str_option(options, "path")?;
        let levels = levels_option(options, "levels")?.unwrap_or_else(|| Level::ALL.to_vec());
        Ok(Self::open(path, levels)?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Hook for FileHook {
    fn levels(&self) -> &[Level] {
        &self.levels
    }

    fn fire(&self, entry: &Entry) -> Result<(), LogError> {
        let line = self.formatter.format(entry)?;
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        file.write_all(&line)?;
        Ok(())
    }
}

/// Forwards records into the `tracing` ecosystem.
#[derive(Debug, Clone)]
pub struct TracingHook {
    levels: Vec<Level>,
}

impl TracingHook {
    pub fn new(levels: Vec<Level>) -> Self {
        Self { levels }
    }

    /// Options: `levels` (defaults to every level).
    pub fn from_options(options: Option<&Options>) -> Result<Self, PluginError> {
        let levels = levels_option(options, "levels")?.unwrap_or_else(|| Level::ALL.to_vec());
        Ok(Self::new(levels))
    }
}

impl Hook for TracingHook {
    fn levels(&self) -> &[Level] {
        &self.levels
    }

    fn fire(&self, entry: &Entry) -> Result<(), LogError> {
        let fields = serde_json::to_string(&entry.fields)?;
        let message = entry.message.as_str();
        match entry.level {
            Level::Panic | Level::Fatal | Level::Error => {
                tracing::error!(fields = %fields, "{}", message)
            }
            Level::Warn => tracing::warn!(fields = %fields, "{}", message),
            Level::Info => tracing::info!(fields = %fields, "{}", message),
            Level::Debug => tracing::debug!(fields = %fields, "{}", message),
            Level::Trace => tracing::trace!(fields = %fields, "{}", message),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::io;
    use std::sync::Arc;

    fn options(value: Value) -> Options {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_file_hook_appends_json_lines() {
        let path = std::env::temp_dir().join(format!("log_mate_file_hook_{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let opts = options(json!({ "path": path.to_str().unwrap(), "levels": ["error"] }));
        let hook = FileHook::from_options(Some(&opts)).unwrap();
        assert_eq!(hook.levels(), &[Level::Error]);
        assert_eq!(hook.path(), path.as_path());

        hook.fire(&Entry::new(Level::Error, "disk full").with_field("free", 0)).unwrap();
        hook.fire(&Entry::new(Level::Error, "still full")).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<Value> = contents
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["msg"], "disk full");
        assert_eq!(lines[0]["free"], 0);
        assert_eq!(lines[1]["level"], "error");

        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_file_hook_requires_path() {
        assert!(matches!(
            FileHook::from_options(None),
            Err(PluginError::MissingOption { key }) if key == "path"
        ));
    }

    #[test]
    fn test_file_hook_unopenable_path() {
        let opts = options(json!({ "path": "/nonexistent-dir/for/log_mate/x.log" }));
        assert!(matches!(
            FileHook::from_options(Some(&opts)),
            Err(PluginError::Io(_))
        ));
    }

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_tracing_hook_forwards_events() {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let hook = TracingHook::from_options(None).unwrap();
        assert_eq!(hook.levels().len(), Level::ALL.len());

        tracing::subscriber::with_default(subscriber, || {
            hook.fire(&Entry::new(Level::Warn, "cache miss").with_field("key", "user:1"))
                .unwrap();
        });

        let out = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert!(out.contains("WARN"));
        assert!(out.contains("cache miss"));
        assert!(out.contains("user:1"));
    }
}
