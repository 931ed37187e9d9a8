//! Mock clock for testing.

use crate::application::ports::Clock;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use std::sync::{Arc, Mutex, PoisonError};

/// Mock clock for testing.
///
/// Allows tests to pin the time used for line timestamps.
///
/// # Examples
///
/// ```
/// use logaroo::infrastructure::mocks::MockClock;
/// use logaroo::Clock;
/// use chrono::Duration;
///
/// let clock = MockClock::epoch();
/// assert_eq!(clock.now().to_rfc3339(), "1970-01-01T00:00:00+00:00");
///
/// clock.advance(Duration::seconds(90));
/// assert_eq!(clock.now().to_rfc3339(), "1970-01-01T00:01:30+00:00");
/// ```
///
/// # Thread Safety
///
/// All clones share the same underlying time value, so advancing time in
/// one clone affects all clones.
#[derive(Debug, Clone)]
pub struct MockClock {
    current_time: Arc<Mutex<DateTime<FixedOffset>>>,
}

impl MockClock {
    /// Create a mock clock starting at a specific time.
    pub fn new(start: DateTime<FixedOffset>) -> Self {
        Self {
            current_time: Arc::new(Mutex::new(start)),
        }
    }

    /// Create a mock clock pinned to the Unix epoch in UTC.
    pub fn epoch() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH.fixed_offset())
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, duration: Duration) {
        let mut time = self
            .current_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *time += duration;
    }

    /// Set the clock to a specific time.
    pub fn set(&self, time: DateTime<FixedOffset>) {
        *self
            .current_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = time;
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self
            .current_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_mock_clock() {
        let clock = MockClock::epoch();
        let start = clock.now();

        clock.advance(Duration::seconds(10));
        assert_eq!(clock.now(), start + Duration::seconds(10));

        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let new_time = offset.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        clock.set(new_time);
        assert_eq!(clock.now(), new_time);
        assert_eq!(
            clock.now().format("%Y-%m-%dT%H:%M:%S%z").to_string(),
            "2024-05-01T12:30:00+0200"
        );
    }

    #[test]
    fn test_clones_share_time() {
        let clock = MockClock::epoch();
        let clone = clock.clone();

        std::thread::spawn(move || clone.advance(Duration::seconds(5)))
            .join()
            .unwrap();

        assert_eq!(clock.now().timestamp(), 5);
    }
}
