//! Observability metrics for message dispatch.
//!
//! Counts what happened to log calls across all codes: emitted, filtered by
//! severity or verbosity, dropped at the ceiling, and failed sink writes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics tracking dispatch statistics.
///
/// All metrics use atomic operations for thread-safe updates and reads.
/// Clones share the same counters.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    /// Calls that produced a line
    messages_emitted: AtomicU64,
    /// Calls below the minimum severity or above the verbosity
    messages_filtered: AtomicU64,
    /// Calls refused by the per-code ceiling
    messages_dropped: AtomicU64,
    /// Individual sink writes that failed
    sink_failures: AtomicU64,
}

impl Metrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner::default()),
        }
    }

    pub(crate) fn record_emitted(&self) {
        self.inner.messages_emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_filtered(&self) {
        self.inner.messages_filtered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dropped(&self) {
        self.inner.messages_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_sink_failure(&self) {
        self.inner.sink_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the number of emitted messages.
    pub fn messages_emitted(&self) -> u64 {
        self.inner.messages_emitted.load(Ordering::Relaxed)
    }

    /// Get the number of filtered messages.
    pub fn messages_filtered(&self) -> u64 {
        self.inner.messages_filtered.load(Ordering::Relaxed)
    }

    /// Get the number of messages dropped at the ceiling.
    pub fn messages_dropped(&self) -> u64 {
        self.inner.messages_dropped.load(Ordering::Relaxed)
    }

    /// Get the number of failed sink writes.
    pub fn sink_failures(&self) -> u64 {
        self.inner.sink_failures.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            messages_emitted: self.messages_emitted(),
            messages_filtered: self.messages_filtered(),
            messages_dropped: self.messages_dropped(),
            sink_failures: self.sink_failures(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub messages_emitted: u64,
    pub messages_filtered: u64,
    pub messages_dropped: u64,
    pub sink_failures: u64,
}

impl MetricsSnapshot {
    /// Fraction of admitted-or-dropped calls that hit the ceiling (0.0 to 1.0).
    ///
    /// Filtered calls are not counted. Returns 0.0 if nothing was processed.
    pub fn drop_rate(&self) -> f64 {
        let total = self.messages_emitted.saturating_add(self.messages_dropped);
        if total == 0 {
            0.0
        } else {
            self.messages_dropped as f64 / total as f64
        }
    }

    /// Total log calls that passed lookup and rendering.
    pub fn total_calls(&self) -> u64 {
        self.messages_emitted
            .saturating_add(self.messages_filtered)
            .saturating_add(self.messages_dropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_initial_state() {
        let metrics = Metrics::new();
        assert_eq!(metrics.snapshot().total_calls(), 0);
        assert_eq!(metrics.sink_failures(), 0);
    }

    #[test]
    fn test_snapshot() {
        let metrics = Metrics::new();
        metrics.record_emitted();
        metrics.record_emitted();
        metrics.record_filtered();
        metrics.record_dropped();
        metrics.record_sink_failure();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.messages_emitted, 2);
        assert_eq!(snapshot.messages_filtered, 1);
        assert_eq!(snapshot.messages_dropped, 1);
        assert_eq!(snapshot.sink_failures, 1);
        assert_eq!(snapshot.total_calls(), 4);
    }

    #[test]
    fn test_snapshot_drop_rate() {
        let metrics = Metrics::new();
        assert_eq!(metrics.snapshot().drop_rate(), 0.0);

        metrics.record_emitted();
        metrics.record_filtered();
        assert_eq!(metrics.snapshot().drop_rate(), 0.0);

        metrics.record_dropped();
        assert!((metrics.snapshot().drop_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_metrics_clone_shares_counters() {
        let metrics1 = Metrics::new();
        metrics1.record_emitted();

        let metrics2 = metrics1.clone();
        metrics2.record_emitted();

        assert_eq!(metrics1.messages_emitted(), 2);
        assert_eq!(metrics2.messages_emitted(), 2);
    }

    #[test]
    fn test_concurrent_updates() {
        use std::thread;

        let metrics = Metrics::new();
        let mut handles = vec![];

        for _ in 0..10 {
            let m = metrics.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    m.record_emitted();
                    m.record_dropped();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(metrics.messages_emitted(), 1000);
        assert_eq!(metrics.messages_dropped(), 1000);
    }
}
