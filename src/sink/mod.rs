//! Destinations for finished log lines.

use crate::domain::LogRecord;
use parking_lot::Mutex;
use std::io::Write;

/// Accepts one rendered line plus its structured record per log call.
///
/// Called synchronously from the logging thread; implementations must not
/// panic and should swallow their own I/O failures.
pub trait Sink: Send + Sync {
    fn write(&self, line: &str, record: &LogRecord);
}

/// Writes each line to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl Sink for ConsoleSink {
    fn write(&self, line: &str, _record: &LogRecord) {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        let _ = writeln!(handle, "{line}");
    }
}

/// Keeps every line and record in memory, in write order.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<(String, LogRecord)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.entries.lock().iter().map(|(line, _)| line.clone()).collect()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.entries.lock().iter().map(|(_, record)| record.clone()).collect()
    }

    /// All lines joined with newlines.
    pub fn output(&self) -> String {
        self.lines().join("\n")
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries.lock().iter().any(|(line, _)| line.contains(needle))
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Sink for MemorySink {
    fn write(&self, line: &str, record: &LogRecord) {
        self.entries.lock().push((line.to_string(), record.clone()));
    }
}
