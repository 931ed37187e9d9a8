//! Mock implementations for testing.
//!
//! This module provides test doubles for infrastructure adapters,
//! enabling controlled testing of dispatch logic.

pub mod clock;
pub mod layer;
pub mod sink;

pub use clock::MockClock;
pub use layer::{CapturedEvent, MockCaptureLayer};
pub use sink::{FailingSink, MemorySink};
