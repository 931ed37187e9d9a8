//! Per-code emission counting with a uniform ceiling.
//!
//! Every registered code gets a counter. A log call is admitted only while the
//! counter is below the configured `max_messages`; once the ceiling is reached
//! further calls for that code are dropped without error.

use crate::application::ports::Storage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Ceiling applied to the number of emissions of each code.
///
/// Deserializes from an integer: a negative value means unlimited.
///
/// # Example
/// ```
/// use logaroo::MaxMessages;
///
/// assert_eq!(MaxMessages::from_raw(-1), MaxMessages::Unlimited);
/// assert!(MaxMessages::Limited(2).allows(1));
/// assert!(!MaxMessages::Limited(2).allows(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum MaxMessages {
    /// At most this many emissions per code
    Limited(u64),
    /// No ceiling
    Unlimited,
}

impl MaxMessages {
    /// Convert the raw configuration value; negative values mean unlimited.
    pub fn from_raw(raw: i64) -> Self {
        u64::try_from(raw).map_or(MaxMessages::Unlimited, MaxMessages::Limited)
    }

    /// Check if one more emission is allowed after `count` emissions.
    pub fn allows(&self, count: u64) -> bool {
        match self {
            MaxMessages::Limited(max) => count < *max,
            MaxMessages::Unlimited => true,
        }
    }
}

impl Default for MaxMessages {
    fn default() -> Self {
        MaxMessages::Limited(100)
    }
}

impl From<i64> for MaxMessages {
    fn from(raw: i64) -> Self {
        MaxMessages::from_raw(raw)
    }
}

impl From<MaxMessages> for i64 {
    fn from(max: MaxMessages) -> Self {
        match max {
            MaxMessages::Limited(n) => i64::try_from(n).unwrap_or(i64::MAX),
            MaxMessages::Unlimited => -1,
        }
    }
}

impl fmt::Display for MaxMessages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxMessages::Limited(n) => write!(f, "{}", n),
            MaxMessages::Unlimited => f.write_str("unlimited"),
        }
    }
}

/// Counter state kept for each code.
#[derive(Debug, Default)]
pub struct EmissionState {
    count: u64,
    ceiling_reported: bool,
}

impl EmissionState {
    pub fn count(&self) -> u64 {
        self.count
    }
}

/// Tracks emissions per code and enforces the ceiling.
///
/// This type is generic over the storage implementation. In production, use
/// `Arc<ShardedStorage>`.
#[derive(Debug, Clone)]
pub struct EmissionCounter<S>
where
    S: Storage<Arc<str>, EmissionState>,
{
    storage: S,
    max_messages: MaxMessages,
}

impl<S> EmissionCounter<S>
where
    S: Storage<Arc<str>, EmissionState>,
{
    /// Create a counter with storage and a ceiling.
    pub fn new(storage: S, max_messages: MaxMessages) -> Self {
        Self {
            storage,
            max_messages,
        }
    }

    /// The configured ceiling.
    pub fn max_messages(&self) -> MaxMessages {
        self.max_messages
    }

    /// Make sure a code has a counter, starting at zero.
    pub fn track(&self, code: Arc<str>) {
        self.storage
            .with_entry_mut(code, EmissionState::default, |_state| {});
    }

    /// Count one emission if the ceiling allows it.
    ///
    /// The check and the increment happen under the same entry lock: when one
    /// slot remains and several callers race for it, exactly one wins.
    ///
    /// # Returns
    /// `true` if the emission was counted, `false` if the ceiling was reached.
    pub fn try_increment(&self, code: &Arc<str>) -> bool {
        let max_messages = self.max_messages;
        let (admitted, first_refusal) =
            self.storage
                .with_entry_mut(Arc::clone(code), EmissionState::default, |state| {
                    if max_messages.allows(state.count) {
                        state.count += 1;
                        (true, false)
                    } else {
                        let first = !state.ceiling_reported;
                        state.ceiling_reported = true;
                        (false, first)
                    }
                });

        if first_refusal {
            tracing::warn!(
                code = %code,
                max_messages = %max_messages,
                "maximum number of messages reached, further messages for this code are dropped"
            );
        }

        admitted
    }

    /// Current count for a code; zero for codes never seen.
    pub fn count(&self, code: &str) -> u64 {
        self.storage
            .with_entry(&Arc::from(code), EmissionState::count)
            .unwrap_or(0)
    }

    /// Point-in-time copy of every counter.
    ///
    /// Each value is read under its entry lock, so an increment is either
    /// fully visible or not visible at all.
    pub fn snapshot(&self) -> HashMap<Arc<str>, u64> {
        let mut counts = HashMap::with_capacity(self.storage.len());
        self.storage.for_each(|code, state| {
            counts.insert(Arc::clone(code), state.count);
        });
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::ShardedStorage;
    use std::thread;

    fn counter(max: MaxMessages) -> EmissionCounter<Arc<ShardedStorage<Arc<str>, EmissionState>>> {
        EmissionCounter::new(Arc::new(ShardedStorage::new()), max)
    }

    #[test]
    fn test_ceiling_enforced() {
        let counter = counter(MaxMessages::Limited(2));
        let code: Arc<str> = Arc::from("TEST-001");

        assert!(counter.try_increment(&code));
        assert!(counter.try_increment(&code));
        assert!(!counter.try_increment(&code));
        assert!(!counter.try_increment(&code));

        assert_eq!(counter.count("TEST-001"), 2);
    }

    #[test]
    fn test_zero_ceiling_drops_everything() {
        let counter = counter(MaxMessages::Limited(0));
        let code: Arc<str> = Arc::from("TEST-001");

        assert!(!counter.try_increment(&code));
        assert_eq!(counter.count("TEST-001"), 0);
    }

    #[test]
    fn test_unlimited() {
        let counter = counter(MaxMessages::Unlimited);
        let code: Arc<str> = Arc::from("TEST-001");

        for _ in 0..1_000 {
            assert!(counter.try_increment(&code));
        }
        assert_eq!(counter.count("TEST-001"), 1_000);
    }

    #[test]
    fn test_codes_are_independent() {
        let counter = counter(MaxMessages::Limited(1));
        let a: Arc<str> = Arc::from("A");
        let b: Arc<str> = Arc::from("B");

        assert!(counter.try_increment(&a));
        assert!(counter.try_increment(&b));
        assert!(!counter.try_increment(&a));
        assert!(!counter.try_increment(&b));
    }

    #[test]
    fn test_track_and_snapshot() {
        let counter = counter(MaxMessages::default());
        counter.track(Arc::from("A"));
        counter.track(Arc::from("B"));
        counter.try_increment(&Arc::from("B"));

        let snapshot = counter.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("A"), Some(&0));
        assert_eq!(snapshot.get("B"), Some(&1));
        assert_eq!(counter.count("unknown"), 0);
    }

    #[test]
    fn test_concurrent_ceiling_race_has_one_winner() {
        let counter = Arc::new(counter(MaxMessages::Limited(1)));
        let code: Arc<str> = Arc::from("RACE");
        let mut handles = vec![];

        for _ in 0..16 {
            let counter_clone = Arc::clone(&counter);
            let code_clone = Arc::clone(&code);
            handles.push(thread::spawn(move || {
                counter_clone.try_increment(&code_clone)
            }));
        }

        let winners = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|admitted| *admitted)
            .count();

        assert_eq!(winners, 1);
        assert_eq!(counter.count("RACE"), 1);
    }

    #[test]
    fn test_max_messages_conversions() {
        assert_eq!(MaxMessages::default(), MaxMessages::Limited(100));
        assert_eq!(MaxMessages::from_raw(5), MaxMessages::Limited(5));
        assert_eq!(MaxMessages::from_raw(-1), MaxMessages::Unlimited);
        assert_eq!(i64::from(MaxMessages::Unlimited), -1);
        assert_eq!(MaxMessages::Unlimited.to_string(), "unlimited");

        let parsed: MaxMessages = serde_json::from_str("-1").unwrap();
        assert_eq!(parsed, MaxMessages::Unlimited);
        let parsed: MaxMessages = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, MaxMessages::Limited(7));
    }
}
