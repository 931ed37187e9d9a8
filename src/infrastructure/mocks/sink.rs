//! Mock sinks for testing.

use crate::application::ports::Sink;
use crate::domain::severity::Severity;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};

/// Sink that keeps every line in memory.
///
/// Clones share the same buffer, so a test can hand one clone to a logger
/// and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<(Severity, String)>>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines written so far, in order.
    pub fn lines(&self) -> Vec<String> {
        self.entries().into_iter().map(|(_, line)| line).collect()
    }

    /// Lines written so far with the severity they were written at.
    pub fn entries(&self) -> Vec<(Severity, String)> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every captured line.
    pub fn clear(&self) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Sink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn write_line(&self, severity: Severity, line: &str) -> io::Result<()> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((severity, line.to_string()));
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureMode {
    Error,
    Panic,
}

/// Sink that fails every write.
#[derive(Debug, Clone)]
pub struct FailingSink {
    name: String,
    mode: FailureMode,
}

impl FailingSink {
    /// Sink whose writes and flushes return an I/O error.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: FailureMode::Error,
        }
    }

    /// Sink whose writes panic.
    pub fn panicking(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: FailureMode::Panic,
        }
    }
}

impl Sink for FailingSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn write_line(&self, _severity: Severity, _line: &str) -> io::Result<()> {
        match self.mode {
            FailureMode::Error => Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "simulated write failure",
            )),
            FailureMode::Panic => panic!("simulated sink panic"),
        }
    }

    fn flush(&self) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::BrokenPipe,
            "simulated flush failure",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_shares_buffer() {
        let sink = MemorySink::new();
        let clone = sink.clone();
        clone.write_line(Severity::Info, "hello").unwrap();

        assert_eq!(sink.lines(), vec!["hello".to_string()]);
        assert_eq!(sink.entries()[0].0, Severity::Info);

        sink.clear();
        assert!(clone.is_empty());
    }

    #[test]
    fn test_failing_sink() {
        let sink = FailingSink::new("broken");
        assert!(sink.write_line(Severity::Error, "x").is_err());
        assert!(sink.flush().is_err());
        assert_eq!(sink.name(), "broken");
    }
}
