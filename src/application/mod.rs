//! Application layer - orchestration of domain logic.
//!
//! This layer coordinates the domain types and owns the runtime state:
//! - Message registry (documented codes)
//! - Emission counter (per-code ceiling)
//! - Dispatcher (the log call pipeline)
//! - Summary reporter and metrics
//!
//! ## Ports
//!
//! The application layer defines ports (traits) that infrastructure
//! adapters must implement. This keeps the application layer independent
//! from sinks, clocks and storage details.

pub mod counter;
pub mod dispatcher;
pub mod metrics;
pub mod ports;
pub mod registry;
pub mod reporter;
