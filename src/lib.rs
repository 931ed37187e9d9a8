//! # logaroo
//!
//! Code-keyed message logging with per-code emission ceilings and summaries.
//!
//! Applications register every message they can emit up front, as a catalog
//! of codes. Each code carries a severity, a format template and a
//! description. Log calls name a code plus arguments; the logger validates the
//! code, filters on severity and verbosity, renders the template, enforces a
//! per-code ceiling and writes the decorated line to every configured sink.
//!
//! ## Quick Start
//!
//! ```rust
//! use logaroo::{args, Logger, Severity};
//!
//! let logger = Logger::builder().build().unwrap();
//!
//! logger.add_message("ERR-001", Severity::Error, "basic error", None).unwrap();
//! logger
//!     .add_message(
//!         "VAL-001",
//!         Severity::Warning,
//!         "Value comparison",
//!         Some("Value {value1} is larger than {value2}"),
//!     )
//!     .unwrap();
//!
//! // Prints: ERROR: Something went wrong (ERR-001)
//! logger.log("ERR-001", args!("Something went wrong")).unwrap();
//! // Prints: WARNING: Value 10 is larger than 9 (VAL-001)
//! logger.log("VAL-001", args!(value1 = 10, value2 = 9)).unwrap();
//!
//! println!("{}", logger.get_summary());
//! ```
//!
//! ## Line Format
//!
//! Every emitted line reads `<SEVERITY>: <body> (<code>)`. With timestamps
//! enabled it is prefixed by `<timestamp> - `, where the timestamp follows
//! [`TIMESTAMP_FORMAT`] (`2024-05-01T12:30:00+0200`).
//!
//! ## Templates
//!
//! Formats use brace placeholders:
//! - `{name}` is filled from named arguments, `args!(name = value)`
//! - `{}` is filled from positional arguments in order, `args!(a, b)`
//! - `{{` and `}}` write literal braces
//!
//! Templates are parsed when a code is registered, so a malformed format is a
//! registration error rather than a surprise at log time. A code with an empty
//! format logs the first positional argument, or its description when called
//! without arguments.
//!
//! ## Emission Ceiling
//!
//! `max_messages` caps how many lines each code may emit over the logger's
//! lifetime (default 100, negative configuration values mean unlimited). Calls
//! past the ceiling return [`LogOutcome::Dropped`] and write nothing. The
//! check and the increment are atomic per code: with one slot left and many
//! threads racing, exactly one line is written.
//!
//! ## Summary
//!
//! [`Dispatcher::get_summary`] reports emission totals per severity and per
//! code:
//!
//! ```text
//! Message summary:
//!   DEBUG = 0
//!   INFO = 0
//!   WARNING = 1
//!   ERROR = 1
//!   CRITICAL = 0
//!
//! Message codes:
//!   ERR-001: basic error = 1
//!   VAL-001: Value {value1} is larger than {value2} = 1
//! ```
//!
//! ## Sinks
//!
//! Lines go to standard output by default. The builder adds standard error,
//! files ([`FileSink`]), any [`Sink`] implementation, or the `tracing`
//! ecosystem through [`TracingSink`]. A failing or panicking sink never stops
//! delivery to the others; failures are reported in the returned
//! [`Delivery`].
//!
//! ## Configuration
//!
//! [`LoggerConfig`] deserializes with serde, every field optional:
//!
//! ```rust
//! use logaroo::{Logger, LoggerConfig};
//!
//! let config: LoggerConfig = serde_json::from_str(
//!     r#"{ "name": "app", "level": "DEBUG", "max_messages": -1, "with_timestamp": true }"#,
//! )
//! .unwrap();
//! let logger = Logger::from_config(&config).unwrap();
//! assert_eq!(logger.name(), "app");
//! ```
//!
//! ## Observability
//!
//! The crate reports its own diagnostics through `tracing`: registrations and
//! filtered calls at DEBUG, the first refusal of each code at its ceiling and
//! every sink failure at WARN. Call counters are available via
//! [`Dispatcher::metrics`].

// Domain layer - pure business logic
pub mod domain;

// Application layer - orchestration
pub mod application;

// Infrastructure layer - external adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    message::MessageDefinition,
    severity::{ParseSeverityError, Severity},
    summary::{CodeSummary, SummaryReport},
    template::{Args, FormatError, Template, TemplateError},
};

pub use application::{
    counter::{EmissionCounter, EmissionState, MaxMessages},
    dispatcher::{
        Delivery, DispatchSettings, Dispatcher, LogError, LogOutcome, SinkFailure,
        TIMESTAMP_FORMAT,
    },
    metrics::{Metrics, MetricsSnapshot},
    ports::{Clock, Sink, Storage},
    registry::{MessageRegistry, RegistryError},
    reporter::SummaryReporter,
};

pub use infrastructure::{
    clock::SystemClock,
    global,
    logger::{BuildError, Logger, LoggerBuilder, LoggerConfig},
    sinks::{FileSink, StderrSink, StdoutSink, StreamSink, TracingSink},
    storage::ShardedStorage,
};
