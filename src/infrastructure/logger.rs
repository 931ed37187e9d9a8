//! Logger assembly.
//!
//! `Logger` is the dispatcher wired to the sharded counter storage. Build one
//! with [`LoggerBuilder`] or from a deserialized [`LoggerConfig`].

use crate::application::counter::{EmissionCounter, EmissionState, MaxMessages};
use crate::application::dispatcher::{DispatchSettings, Dispatcher};
use crate::application::ports::{Clock, Sink};
use crate::domain::severity::Severity;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::sinks::{FileSink, StderrSink, StdoutSink};
use crate::infrastructure::storage::ShardedStorage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

/// The dispatcher used by applications.
pub type Logger = Dispatcher<Arc<ShardedStorage<Arc<str>, EmissionState>>>;

/// Error returned when building a logger.
#[derive(Debug)]
pub enum BuildError {
    /// Every output was disabled
    NoSinks,
    /// The log file could not be created
    OpenFile { path: PathBuf, source: io::Error },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::NoSinks => write!(f, "logger needs at least one sink"),
            BuildError::OpenFile { path, source } => {
                write!(f, "cannot open log file '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::OpenFile { source, .. } => Some(source),
            BuildError::NoSinks => None,
        }
    }
}

/// Serializable logger settings.
///
/// Every field has a default, so a partial document is enough:
///
/// ```
/// use logaroo::{LoggerConfig, MaxMessages, Severity};
///
/// let config: LoggerConfig =
///     serde_json::from_str(r#"{ "level": "warning", "max_messages": -1 }"#).unwrap();
/// assert_eq!(config.level, Severity::Warning);
/// assert_eq!(config.max_messages, MaxMessages::Unlimited);
/// assert!(config.stdout);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    pub name: String,
    pub level: Severity,
    pub verbosity: u32,
    /// Log file, truncated when the logger is built
    pub filename: Option<PathBuf>,
    pub stdout: bool,
    pub stderr: bool,
    /// Negative values mean unlimited
    pub max_messages: MaxMessages,
    pub with_timestamp: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        let settings = DispatchSettings::default();
        Self {
            name: settings.name,
            level: settings.min_level,
            verbosity: settings.verbosity,
            filename: None,
            stdout: true,
            stderr: false,
            max_messages: MaxMessages::default(),
            with_timestamp: settings.with_timestamp,
        }
    }
}

/// Builder for constructing a [`Logger`].
#[derive(Debug)]
pub struct LoggerBuilder {
    settings: DispatchSettings,
    max_messages: MaxMessages,
    stdout: bool,
    stderr: bool,
    files: Vec<PathBuf>,
    sinks: Vec<Arc<dyn Sink>>,
    clock: Option<Arc<dyn Clock>>,
}

impl LoggerBuilder {
    fn new() -> Self {
        Self {
            settings: DispatchSettings::default(),
            max_messages: MaxMessages::default(),
            stdout: true,
            stderr: false,
            files: Vec::new(),
            sinks: Vec::new(),
            clock: None,
        }
    }

    /// Set the logger name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.settings.name = name.into();
        self
    }

    /// Set the minimum severity (default INFO).
    pub fn with_level(mut self, level: Severity) -> Self {
        self.settings.min_level = level;
        self
    }

    /// Set the verbosity (default 0). Codes registered with a higher
    /// verbosity are filtered.
    pub fn with_verbosity(mut self, verbosity: u32) -> Self {
        self.settings.verbosity = verbosity;
        self
    }

    /// Set the per-code ceiling (default 100).
    pub fn with_max_messages(mut self, max_messages: MaxMessages) -> Self {
        self.max_messages = max_messages;
        self
    }

    /// Remove the per-code ceiling.
    pub fn with_unlimited_messages(mut self) -> Self {
        self.max_messages = MaxMessages::Unlimited;
        self
    }

    /// Prepend a timestamp to every line.
    pub fn with_timestamp(mut self, enabled: bool) -> Self {
        self.settings.with_timestamp = enabled;
        self
    }

    /// Write to standard output (default on).
    pub fn with_stdout(mut self, enabled: bool) -> Self {
        self.stdout = enabled;
        self
    }

    /// Write to standard error (default off).
    pub fn with_stderr(mut self, enabled: bool) -> Self {
        self.stderr = enabled;
        self
    }

    /// Also write to a file. The file is truncated by `build()`.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    /// Add a custom sink.
    pub fn with_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Set a custom clock for timestamps (default: local system time).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the logger.
    ///
    /// Sinks are written in this order: stdout, stderr, files, custom sinks.
    ///
    /// # Errors
    /// Returns `BuildError::NoSinks` if every output is disabled, or
    /// `BuildError::OpenFile` if a log file cannot be created.
    pub fn build(self) -> Result<Logger, BuildError> {
        let mut sinks: Vec<Arc<dyn Sink>> = Vec::new();
        if self.stdout {
            sinks.push(Arc::new(StdoutSink));
        }
        if self.stderr {
            sinks.push(Arc::new(StderrSink));
        }
        for path in self.files {
            let sink = FileSink::create(&path)
                .map_err(|source| BuildError::OpenFile { path, source })?;
            sinks.push(Arc::new(sink));
        }
        sinks.extend(self.sinks);

        if sinks.is_empty() {
            return Err(BuildError::NoSinks);
        }

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock::new()));
        let counter = EmissionCounter::new(Arc::new(ShardedStorage::new()), self.max_messages);

        tracing::debug!(
            name = %self.settings.name,
            level = %self.settings.min_level,
            max_messages = %self.max_messages,
            sinks = sinks.len(),
            "logger built"
        );

        Ok(Dispatcher::new(self.settings, counter, sinks, clock))
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for configuring a logger.
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Build a logger from configuration.
    ///
    /// # Errors
    /// Same as [`LoggerBuilder::build`].
    pub fn from_config(config: &LoggerConfig) -> Result<Self, BuildError> {
        let mut builder = Self::builder()
            .with_name(config.name.clone())
            .with_level(config.level)
            .with_verbosity(config.verbosity)
            .with_max_messages(config.max_messages)
            .with_timestamp(config.with_timestamp)
            .with_stdout(config.stdout)
            .with_stderr(config.stderr);
        if let Some(path) = &config.filename {
            builder = builder.with_file(path.clone());
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::infrastructure::mocks::{MemorySink, MockClock};
    use std::fs;

    #[test]
    fn test_builder_defaults() {
        let logger = Logger::builder().build().unwrap();

        assert_eq!(logger.name(), "logaroo");
        assert_eq!(logger.min_level(), Severity::Info);
        assert_eq!(logger.verbosity(), 0);
        assert_eq!(logger.max_messages(), MaxMessages::Limited(100));
        assert!(!logger.with_timestamp());
        assert_eq!(logger.sinks().len(), 1);
        assert_eq!(logger.sinks()[0].name(), "stdout");
    }

    #[test]
    fn test_no_sinks() {
        let result = Logger::builder().with_stdout(false).build();
        assert!(matches!(result, Err(BuildError::NoSinks)));
    }

    #[test]
    fn test_open_file_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing/test.log");

        let err = Logger::builder()
            .with_stdout(false)
            .with_file(&path)
            .build()
            .unwrap_err();

        match &err {
            BuildError::OpenFile { path: failed, .. } => assert_eq!(failed, &path),
            other => panic!("unexpected error: {}", other),
        }
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_file_only_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.log");

        let logger = Logger::builder()
            .with_stdout(false)
            .with_file(&path)
            .build()
            .unwrap();
        logger
            .add_message("ERR-001", Severity::Error, "basic error", None)
            .unwrap();
        logger.log("ERR-001", args!()).unwrap();
        assert!(logger.close().is_empty());

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "ERROR: basic error (ERR-001)\n"
        );
    }

    #[test]
    fn test_custom_sink_and_clock() {
        let sink = MemorySink::new();
        let logger = Logger::builder()
            .with_stdout(false)
            .with_sink(Arc::new(sink.clone()))
            .with_clock(Arc::new(MockClock::epoch()))
            .with_timestamp(true)
            .with_level(Severity::Debug)
            .build()
            .unwrap();
        logger
            .add_message("DBG-001", Severity::Debug, "trace", Some("step {}"))
            .unwrap();

        logger.log("DBG-001", args!(3)).unwrap();

        assert_eq!(
            sink.lines(),
            vec!["1970-01-01T00:00:00+0000 - DEBUG: step 3 (DBG-001)".to_string()]
        );
    }

    #[test]
    fn test_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggerConfig {
            name: "app".to_string(),
            level: Severity::Warning,
            verbosity: 2,
            filename: Some(dir.path().join("app.log")),
            stdout: false,
            stderr: true,
            max_messages: MaxMessages::Unlimited,
            with_timestamp: true,
        };

        let logger = Logger::from_config(&config).unwrap();

        assert_eq!(logger.name(), "app");
        assert_eq!(logger.min_level(), Severity::Warning);
        assert_eq!(logger.verbosity(), 2);
        assert_eq!(logger.max_messages(), MaxMessages::Unlimited);
        assert!(logger.with_timestamp());
        let names: Vec<&str> = logger.sinks().iter().map(|sink| sink.name()).collect();
        assert_eq!(names[0], "stderr");
        assert!(names[1].starts_with("file:"));
    }

    #[test]
    fn test_config_defaults_from_empty_document() {
        let config: LoggerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LoggerConfig::default());
        assert_eq!(config.max_messages, MaxMessages::Limited(100));
    }

    #[test]
    fn test_config_rejects_unknown_fields_and_levels() {
        assert!(serde_json::from_str::<LoggerConfig>(r#"{ "colour": true }"#).is_err());
        assert!(serde_json::from_str::<LoggerConfig>(r#"{ "level": "LOUD" }"#).is_err());
    }
}
