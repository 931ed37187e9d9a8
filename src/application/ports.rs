//! Ports (interfaces) for the application layer.
//!
//! In hexagonal architecture, ports define the interfaces that the application
//! layer needs. Infrastructure adapters implement these ports.

use crate::domain::severity::Severity;
use chrono::{DateTime, FixedOffset};
use std::fmt::Debug;
use std::hash::Hash;
use std::io;

/// Port for obtaining the wall-clock time used in timestamps.
///
/// Infrastructure provides concrete implementations (SystemClock, MockClock).
pub trait Clock: Send + Sync + Debug {
    /// Get the current local time with its UTC offset.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Port for a write target of rendered log lines.
///
/// A sink receives fully rendered lines and knows nothing about codes,
/// templates or counters. Each sink may fail independently; the dispatcher
/// keeps writing to the remaining sinks.
///
/// Implementations must serialize their own writes, since `write_line` may be
/// called from several threads at once.
pub trait Sink: Send + Sync + Debug {
    /// Short name used when reporting failures (e.g. `"stdout"`).
    fn name(&self) -> &str;

    /// Write one rendered line. The line carries no trailing newline.
    ///
    /// # Arguments
    /// * `severity` - Severity of the code that produced the line
    /// * `line` - The rendered line
    fn write_line(&self, severity: Severity, line: &str) -> io::Result<()>;

    /// Flush buffered output.
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Port for concurrent key-value storage.
///
/// This abstraction allows the application layer to keep per-code state
/// without depending on a specific concurrent map.
/// Infrastructure provides concrete implementations (ShardedStorage).
pub trait Storage<K, V>: Send + Sync + Debug
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Send + Sync,
{
    /// Access an entry with mutable access, creating it if necessary.
    ///
    /// The accessor runs while the entry is locked, so a read-modify-write
    /// inside it is atomic with respect to other callers for the same key.
    ///
    /// # Arguments
    /// * `key` - The key to look up
    /// * `factory` - Function to create a new value if the key doesn't exist
    /// * `accessor` - Function that gets mutable access to the value
    ///
    /// # Returns
    /// The result from the accessor function
    fn with_entry_mut<F, R>(&self, key: K, factory: impl FnOnce() -> V, accessor: F) -> R
    where
        F: FnOnce(&mut V) -> R;

    /// Read an existing entry without creating it.
    fn with_entry<F, R>(&self, key: &K, accessor: F) -> Option<R>
    where
        F: FnOnce(&V) -> R;

    /// Get the number of entries in the storage.
    fn len(&self) -> usize;

    /// Check if the storage is empty.
    fn is_empty(&self) -> bool;

    /// Iterate over all entries, providing access to both key and value.
    ///
    /// Each entry is read under its own lock.
    fn for_each<F>(&self, f: F)
    where
        F: FnMut(&K, &V);
}
