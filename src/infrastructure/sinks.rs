//! Sink adapters.
//!
//! Concrete write targets for rendered lines: the standard streams, files,
//! any `io::Write` stream, and the `tracing` ecosystem.

use crate::application::ports::Sink;
use crate::domain::severity::Severity;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Writes lines to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn name(&self) -> &str {
        "stdout"
    }

    fn write_line(&self, _severity: Severity, line: &str) -> io::Result<()> {
        writeln!(io::stdout().lock(), "{}", line)
    }

    fn flush(&self) -> io::Result<()> {
        io::stdout().flush()
    }
}

/// Writes lines to standard error.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl Sink for StderrSink {
    fn name(&self) -> &str {
        "stderr"
    }

    fn write_line(&self, _severity: Severity, line: &str) -> io::Result<()> {
        writeln!(io::stderr().lock(), "{}", line)
    }
}

/// Writes lines to a file, flushing after every line.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    name: String,
    writer: Mutex<LineWriter<File>>,
}

impl FileSink {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path.as_ref())?;
        Ok(Self::from_file(path.as_ref(), file))
    }

    /// Open the file at `path` for appending, creating it if needed.
    pub fn append(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self::from_file(path.as_ref(), file))
    }

    fn from_file(path: &Path, file: File) -> Self {
        Self {
            path: path.to_path_buf(),
            name: format!("file:{}", path.display()),
            writer: Mutex::new(LineWriter::new(file)),
        }
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn write_line(&self, _severity: Severity, line: &str) -> io::Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{}", line)
    }

    fn flush(&self) -> io::Result<()> {
        self.writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush()
    }
}

/// Writes lines to any `io::Write` stream.
///
/// # Example
/// ```
/// use logaroo::{Severity, Sink, StreamSink};
///
/// let sink = StreamSink::new("buffer", Vec::new());
/// sink.write_line(Severity::Info, "INFO: hello (MSG-001)").unwrap();
/// assert_eq!(sink.into_inner(), b"INFO: hello (MSG-001)\n");
/// ```
pub struct StreamSink<W> {
    name: String,
    writer: Mutex<W>,
}

impl<W> StreamSink<W>
where
    W: Write + Send,
{
    /// Wrap a stream under a display name.
    pub fn new(name: impl Into<String>, writer: W) -> Self {
        Self {
            name: name.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Take the stream back.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W> fmt::Debug for StreamSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamSink")
            .field("name", &self.name)
            .field("writer", &"<stream>")
            .finish()
    }
}

impl<W> Sink for StreamSink<W>
where
    W: Write + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn write_line(&self, _severity: Severity, line: &str) -> io::Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{}", line)
    }

    fn flush(&self) -> io::Result<()> {
        self.writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush()
    }
}

/// Forwards lines to `tracing` as events.
///
/// Each line becomes an event on target `logaroo` at the level matching the
/// code's severity, so catalog messages can share a `tracing` subscriber with
/// the rest of an application.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn name(&self) -> &str {
        "tracing"
    }

    fn write_line(&self, severity: Severity, line: &str) -> io::Result<()> {
        match severity {
            Severity::Debug => tracing::debug!(target: "logaroo", "{}", line),
            Severity::Info => tracing::info!(target: "logaroo", "{}", line),
            Severity::Warning => tracing::warn!(target: "logaroo", "{}", line),
            Severity::Error | Severity::Critical => {
                tracing::error!(target: "logaroo", "{}", line)
            }
        }
        Ok(())
    }
}
