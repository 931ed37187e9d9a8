//! Storage implementations for per-code state.
//!
//! Provides concurrent, sharded storage for emission counters.

use crate::application::ports::Storage;
use ahash::RandomState;
use dashmap::DashMap;
use std::hash::Hash;
use std::sync::Arc;

/// Thread-safe sharded storage backed by DashMap.
///
/// DashMap provides lock-free reads and fine-grained locking for writes,
/// so log calls for different codes rarely contend.
#[derive(Debug)]
pub struct ShardedStorage<K, V>
where
    K: Eq + Hash + Clone,
{
    map: DashMap<K, V, RandomState>,
}

impl<K, V> ShardedStorage<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a new sharded storage instance.
    pub fn new() -> Self {
        Self {
            map: DashMap::with_hasher(RandomState::new()),
        }
    }
}

impl<K, V> Default for ShardedStorage<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Storage<K, V> for ShardedStorage<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + std::fmt::Debug,
    V: Send + Sync + std::fmt::Debug,
{
    fn with_entry_mut<F, R>(&self, key: K, factory: impl FnOnce() -> V, accessor: F) -> R
    where
        F: FnOnce(&mut V) -> R,
    {
        let entry = self.map.entry(key);
        let mut value_ref = entry.or_insert_with(factory);
        accessor(&mut value_ref)
    }

    fn with_entry<F, R>(&self, key: &K, accessor: F) -> Option<R>
    where
        F: FnOnce(&V) -> R,
    {
        self.map.get(key).map(|value_ref| accessor(value_ref.value()))
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        for entry in self.map.iter() {
            f(entry.key(), entry.value());
        }
    }
}

// Implement Storage for Arc<ShardedStorage> to allow it to be shared directly
impl<K, V> Storage<K, V> for Arc<ShardedStorage<K, V>>
where
    K: Hash + Eq + Clone + Send + Sync + std::fmt::Debug,
    V: Send + Sync + std::fmt::Debug,
{
    fn with_entry_mut<F, R>(&self, key: K, factory: impl FnOnce() -> V, accessor: F) -> R
    where
        F: FnOnce(&mut V) -> R,
    {
        (**self).with_entry_mut(key, factory, accessor)
    }

    fn with_entry<F, R>(&self, key: &K, accessor: F) -> Option<R>
    where
        F: FnOnce(&V) -> R,
    {
        (**self).with_entry(key, accessor)
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    fn for_each<F>(&self, f: F)
    where
        F: FnMut(&K, &V),
    {
        (**self).for_each(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_with_entry_mut_creates_once() {
        let storage: ShardedStorage<String, u64> = ShardedStorage::new();

        storage.with_entry_mut("a".to_string(), || 10, |v| *v += 1);
        storage.with_entry_mut("a".to_string(), || 10, |v| *v += 1);

        assert_eq!(storage.with_entry(&"a".to_string(), |v| *v), Some(12));
        assert_eq!(storage.len(), 1);
        assert!(!storage.is_empty());
    }

    #[test]
    fn test_with_entry_missing_key() {
        let storage: ShardedStorage<String, u64> = ShardedStorage::new();
        assert_eq!(storage.with_entry(&"missing".to_string(), |v| *v), None);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_for_each_visits_every_entry() {
        let storage: ShardedStorage<u64, u64> = ShardedStorage::new();
        for i in 0..5u64 {
            storage.with_entry_mut(i, || i * 2, |_| {});
        }

        let mut sum = 0;
        storage.for_each(|_, v| sum += *v);
        assert_eq!(sum, 20);
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let storage: Arc<ShardedStorage<&'static str, u64>> = Arc::new(ShardedStorage::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let storage_clone = Arc::clone(&storage);
            let handle = thread::spawn(move || {
                for _ in 0..100 {
                    storage_clone.with_entry_mut("shared", || 0, |v| *v += 1);
                }
            });
            handles.push(handle);
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(storage.with_entry(&"shared", |v| *v), Some(1000));
    }
}
