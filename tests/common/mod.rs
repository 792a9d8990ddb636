//! Shared helpers for integration tests.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use log_mate::Options;

/// An output sink whose contents can be read back after logging.
#[derive(Clone, Default)]
pub struct CapturedOutput(Arc<Mutex<Vec<u8>>>);

impl CapturedOutput {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Plugin options from a `serde_json::json!` object literal.
#[allow(dead_code)]
pub fn options(value: serde_json::Value) -> Options {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("options must be an object, got {other}"),
    }
}
