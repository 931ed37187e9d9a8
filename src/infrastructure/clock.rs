//! Clock adapters for timestamps.
//!
//! Provides SystemClock implementation for production use.
//!
//! # Testing
//!
//! See `MockClock` (in `crate::infrastructure::mocks`) for a fixed, controllable
//! clock. Available with the `test-helpers` feature or in test builds.

use crate::application::ports::Clock;
use chrono::{DateTime, FixedOffset, Local};

/// System clock reading local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().into()
    }
}
