//! Message dispatch.
//!
//! The dispatcher is the façade applications log through. A call goes through
//! a fixed sequence, each step a possible early exit:
//!
//! 1. look the code up in the registry
//! 2. filter on minimum severity and verbosity
//! 3. render the body from the call-site arguments
//! 4. count the emission against the per-code ceiling
//! 5. decorate the line (severity, code, optional timestamp)
//! 6. write it to every sink

use crate::application::counter::{EmissionCounter, EmissionState, MaxMessages};
use crate::application::metrics::Metrics;
use crate::application::ports::{Clock, Sink, Storage};
use crate::application::registry::{MessageRegistry, RegistryError};
use crate::application::reporter::SummaryReporter;
use crate::domain::message::MessageDefinition;
use crate::domain::severity::Severity;
use crate::domain::summary::SummaryReport;
use crate::domain::template::{Args, FormatError};
use serde::Serialize;
use std::fmt;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Timestamp layout prepended to lines when timestamps are enabled.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Error returned by a log call that the caller must fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    /// The code was never registered
    UnknownCode(String),
    /// The arguments do not fit the code's format
    Format { code: String, source: FormatError },
    /// The logger was closed
    Closed,
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogError::UnknownCode(code) => write!(f, "logging code '{}' is missing", code),
            LogError::Format { code, source } => {
                write!(f, "cannot format logging code '{}': {}", code, source)
            }
            LogError::Closed => write!(f, "logger is closed"),
        }
    }
}

impl std::error::Error for LogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LogError::Format { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A failed write (or flush) on one sink.
#[derive(Debug)]
pub struct SinkFailure {
    sink: String,
    error: io::Error,
}

impl SinkFailure {
    /// Name of the sink that failed.
    pub fn sink(&self) -> &str {
        &self.sink
    }

    /// The underlying I/O error.
    pub fn error(&self) -> &io::Error {
        &self.error
    }
}

impl fmt::Display for SinkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sink '{}' failed: {}", self.sink, self.error)
    }
}

impl std::error::Error for SinkFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// A line that was emitted, with any sinks that failed to take it.
#[derive(Debug)]
pub struct Delivery {
    line: String,
    failures: Vec<SinkFailure>,
}

impl Delivery {
    /// The line as written to the sinks.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Sinks that failed. Empty when every sink succeeded.
    pub fn failures(&self) -> &[SinkFailure] {
        &self.failures
    }
}

/// What happened to a log call that did not fail.
#[derive(Debug)]
pub enum LogOutcome {
    /// The line was rendered, counted and handed to the sinks
    Emitted(Delivery),
    /// Below the minimum severity or above the verbosity; nothing counted
    Filtered,
    /// The code already reached its ceiling; nothing written
    Dropped,
}

impl LogOutcome {
    /// Check if a line was emitted.
    pub fn is_emitted(&self) -> bool {
        matches!(self, LogOutcome::Emitted(_))
    }

    /// The emitted line, if any.
    pub fn line(&self) -> Option<&str> {
        match self {
            LogOutcome::Emitted(delivery) => Some(delivery.line()),
            _ => None,
        }
    }

    /// Sink failures of an emitted line.
    pub fn failures(&self) -> &[SinkFailure] {
        match self {
            LogOutcome::Emitted(delivery) => delivery.failures(),
            _ => &[],
        }
    }
}

/// Immutable settings of a dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSettings {
    /// Logger name, used in the catalog export
    pub name: String,
    /// Codes below this severity are filtered
    pub min_level: Severity,
    /// Codes with a higher verbosity are filtered
    pub verbosity: u32,
    /// Prepend a timestamp to every line
    pub with_timestamp: bool,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            name: String::from("logaroo"),
            min_level: Severity::Info,
            verbosity: 0,
            with_timestamp: false,
        }
    }
}

#[derive(Serialize)]
struct CatalogDocument<'a> {
    name: &'a str,
    messages: &'a [Arc<MessageDefinition>],
}

/// Validates, filters, formats and writes log calls.
///
/// This type is generic over the counter storage. Applications normally use
/// the [`Logger`](crate::Logger) alias built by
/// [`LoggerBuilder`](crate::LoggerBuilder).
#[derive(Debug)]
pub struct Dispatcher<S>
where
    S: Storage<Arc<str>, EmissionState>,
{
    settings: DispatchSettings,
    registry: MessageRegistry,
    counter: EmissionCounter<S>,
    sinks: Vec<Arc<dyn Sink>>,
    clock: Arc<dyn Clock>,
    metrics: Metrics,
    closed: AtomicBool,
}

impl<S> Dispatcher<S>
where
    S: Storage<Arc<str>, EmissionState>,
{
    /// Create a dispatcher.
    ///
    /// # Arguments
    /// * `settings` - Name, filters and timestamp switch
    /// * `counter` - Emission counter holding the ceiling
    /// * `sinks` - Write targets; may be empty, in which case lines are only counted
    /// * `clock` - Time source for timestamps
    pub fn new(
        settings: DispatchSettings,
        counter: EmissionCounter<S>,
        sinks: Vec<Arc<dyn Sink>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            settings,
            registry: MessageRegistry::new(),
            counter,
            sinks,
            clock,
            metrics: Metrics::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// Register a message code.
    ///
    /// # Errors
    /// Returns `RegistryError::DuplicateCode` if the code exists, or
    /// `RegistryError::InvalidTemplate` if `format` is malformed.
    pub fn add_message(
        &self,
        code: &str,
        severity: Severity,
        description: &str,
        format: Option<&str>,
    ) -> Result<(), RegistryError> {
        let definition = MessageDefinition::new(code, severity, description, format)
            .map_err(|source| RegistryError::InvalidTemplate {
                code: code.to_string(),
                source,
            })?;
        self.add_definition(definition)
    }

    /// Register a prepared definition.
    ///
    /// # Errors
    /// Returns `RegistryError::DuplicateCode` if the code exists.
    pub fn add_definition(&self, definition: MessageDefinition) -> Result<(), RegistryError> {
        let definition = self.registry.register(definition)?;
        self.counter.track(definition.code_key());
        tracing::debug!(
            code = definition.code(),
            severity = %definition.severity(),
            "registered message code"
        );
        Ok(())
    }

    /// Register several definitions, stopping at the first error.
    ///
    /// Definitions before the failing one stay registered.
    pub fn add_messages<I>(&self, definitions: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = MessageDefinition>,
    {
        definitions
            .into_iter()
            .try_for_each(|definition| self.add_definition(definition))
    }

    /// Log a registered code.
    ///
    /// Filtered and dropped calls are not errors; see [`LogOutcome`]. Sink
    /// failures are reported inside the returned [`Delivery`] and never stop
    /// the remaining sinks.
    ///
    /// # Errors
    /// Returns `LogError::UnknownCode` for unregistered codes,
    /// `LogError::Format` when the arguments do not fit the format, and
    /// `LogError::Closed` after [`close`](Self::close).
    pub fn log(&self, code: &str, args: Args) -> Result<LogOutcome, LogError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(LogError::Closed);
        }

        let definition = self
            .registry
            .lookup(code)
            .map_err(|_| LogError::UnknownCode(code.to_string()))?;

        if definition.severity() < self.settings.min_level
            || definition.verbosity() > self.settings.verbosity
        {
            tracing::debug!(code, severity = %definition.severity(), "log call filtered");
            self.metrics.record_filtered();
            return Ok(LogOutcome::Filtered);
        }

        // Rendering before counting keeps a misused call from spending budget
        let body = definition
            .render(&args)
            .map_err(|source| LogError::Format {
                code: code.to_string(),
                source,
            })?;

        if !self.counter.try_increment(&definition.code_key()) {
            tracing::debug!(code, "log call dropped at ceiling");
            self.metrics.record_dropped();
            return Ok(LogOutcome::Dropped);
        }

        let line = self.compose_line(&definition, &body);
        let failures = self.deliver(definition.severity(), &line);
        self.metrics.record_emitted();

        Ok(LogOutcome::Emitted(Delivery { line, failures }))
    }

    fn compose_line(&self, definition: &MessageDefinition, body: &str) -> String {
        let line = format!("{}: {} ({})", definition.severity(), body, definition.code());
        if self.settings.with_timestamp {
            format!("{} - {}", self.clock.now().format(TIMESTAMP_FORMAT), line)
        } else {
            line
        }
    }

    fn deliver(&self, severity: Severity, line: &str) -> Vec<SinkFailure> {
        let mut failures = Vec::new();

        for sink in &self.sinks {
            let result = panic::catch_unwind(AssertUnwindSafe(|| sink.write_line(severity, line)));
            let error = match result {
                Ok(Ok(())) => continue,
                Ok(Err(error)) => error,
                Err(payload) => io::Error::new(
                    io::ErrorKind::Other,
                    format!("sink panicked: {}", panic_message(payload.as_ref())),
                ),
            };

            tracing::warn!(sink = sink.name(), error = %error, "failed to write log line");
            self.metrics.record_sink_failure();
            failures.push(SinkFailure {
                sink: sink.name().to_string(),
                error,
            });
        }

        failures
    }

    /// Aggregated emission counts.
    pub fn summary(&self) -> SummaryReport {
        SummaryReporter::report(&self.registry.list_all(), &self.counter.snapshot())
    }

    /// Aggregated emission counts as text.
    pub fn get_summary(&self) -> String {
        self.summary().to_string()
    }

    /// Every registered definition, in registration order.
    pub fn catalog(&self) -> Vec<Arc<MessageDefinition>> {
        self.registry.list_all()
    }

    /// Pretty-printed JSON document listing the logger name and every
    /// registered definition.
    pub fn catalog_json(&self) -> Result<String, serde_json::Error> {
        let messages = self.registry.list_all();
        serde_json::to_string_pretty(&CatalogDocument {
            name: &self.settings.name,
            messages: &messages,
        })
    }

    /// Emissions counted so far for a code.
    pub fn count(&self, code: &str) -> u64 {
        self.counter.count(code)
    }

    /// Flush every sink and refuse further log calls.
    ///
    /// Returns the sinks that failed to flush. Closing twice is a no-op.
    pub fn close(&self) -> Vec<SinkFailure> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Vec::new();
        }

        self.sinks
            .iter()
            .filter_map(|sink| {
                sink.flush().err().map(|error| SinkFailure {
                    sink: sink.name().to_string(),
                    error,
                })
            })
            .collect()
    }

    /// Check if [`close`](Self::close) was called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn name(&self) -> &str {
        &self.settings.name
    }

    pub fn min_level(&self) -> Severity {
        self.settings.min_level
    }

    pub fn verbosity(&self) -> u32 {
        self.settings.verbosity
    }

    pub fn max_messages(&self) -> MaxMessages {
        self.counter.max_messages()
    }

    pub fn with_timestamp(&self) -> bool {
        self.settings.with_timestamp
    }

    /// Get a reference to the registry.
    pub fn registry(&self) -> &MessageRegistry {
        &self.registry
    }

    /// Get a reference to the metrics.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Get the configured sinks.
    pub fn sinks(&self) -> &[Arc<dyn Sink>] {
        &self.sinks
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}
