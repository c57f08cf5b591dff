//! Thread-Safe Sharded Storage Engine
//!
//! This module implements the key space shared by every client connection.
//! It maps keys to tagged [`Value`]s and offers the atomic read-modify-write
//! primitive the increment commands are built on.
//!
//! ## Design Decisions
//!
//! 1. **Sharded Locks**: Instead of one big lock, keys are spread over
//!    independent shards so unrelated keys never contend.
//! 2. **RwLock**: Plain reads share a shard, writes take it exclusively.
//! 3. **Compute-then-commit**: [`StorageEngine::atomic_update`] runs the
//!    caller's closure under the shard write lock and only stores its
//!    result if it succeeds. A failed update leaves the entry untouched.
//!
//! ## Concurrency Model
//!
//! ```text
//!   key ──hash──> shard i ──write()──┐
//!                                    ▼
//!                 update(current) ─ Err ─> guard dropped, entry untouched
//!                        │
//!                        Ok(next)
//!                        ▼
//!                 insert(key, next) ─> guard dropped
//! ```
//!
//! A key always hashes to the same shard, so holding a shard's write lock
//! excludes every other writer of that key.

use crate::storage::value::Value;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

/// Default number of shards.
pub const DEFAULT_SHARDS: usize = 64;

/// A single shard containing a portion of the key space.
#[derive(Debug, Default)]
struct Shard {
    data: RwLock<HashMap<Bytes, Value>>,
}

/// The shared key space.
///
/// Wrap it in an `Arc` to share it between connection tasks. None of the
/// operations fail: an absent key is reported as `None`, not as an error.
///
/// # Example
///
/// ```
/// use sparkkv::storage::{StorageEngine, Value};
/// use bytes::Bytes;
///
/// let engine = StorageEngine::new();
///
/// engine.set(Bytes::from("counter"), Value::Integer(1));
///
/// let updated: Result<Value, ()> = engine.atomic_update(&Bytes::from("counter"), |current| {
///     let n = current.and_then(|v| v.as_integer().ok()).unwrap_or(0);
///     Ok(Value::Integer(n + 1))
/// });
/// assert_eq!(updated, Ok(Value::Integer(2)));
/// assert_eq!(engine.get(b"counter"), Some(Value::Integer(2)));
/// ```
pub struct StorageEngine {
    shards: Vec<Shard>,

    /// Statistics: total number of keys
    key_count: AtomicU64,

    /// Statistics: total GET operations
    get_count: AtomicU64,

    /// Statistics: total SET operations
    set_count: AtomicU64,

    /// Statistics: total DEL operations
    del_count: AtomicU64,

    /// Statistics: committed atomic updates
    update_count: AtomicU64,

    /// Statistics: atomic updates whose closure failed
    rejected_count: AtomicU64,
}

impl std::fmt::Debug for StorageEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageEngine")
            .field("shards", &self.shards.len())
            .field("key_count", &self.key_count.load(Ordering::Relaxed))
            .field("get_count", &self.get_count.load(Ordering::Relaxed))
            .field("set_count", &self.set_count.load(Ordering::Relaxed))
            .field("update_count", &self.update_count.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for StorageEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageEngine {
    /// Creates a storage engine with [`DEFAULT_SHARDS`] shards.
    pub fn new() -> Self {
        Self::with_shards(DEFAULT_SHARDS)
    }

    /// Creates a storage engine with the given number of shards.
    ///
    /// A count of zero is treated as one; a single shard behaves like a
    /// store-wide lock.
    pub fn with_shards(count: usize) -> Self {
        let shards = (0..count.max(1)).map(|_| Shard::default()).collect();

        Self {
            shards,
            key_count: AtomicU64::new(0),
            get_count: AtomicU64::new(0),
            set_count: AtomicU64::new(0),
            del_count: AtomicU64::new(0),
            update_count: AtomicU64::new(0),
            rejected_count: AtomicU64::new(0),
        }
    }

    /// Number of shards the key space is split into.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    #[inline]
    fn shard_index(&self, key: &[u8]) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.shards.len()
    }

    #[inline]
    fn get_shard(&self, key: &[u8]) -> &Shard {
        &self.shards[self.shard_index(key)]
    }

    /// Stores a value, replacing any existing one.
    ///
    /// # Returns
    ///
    /// Returns `true` if a new key was created, `false` if an existing key was updated.
    pub fn set(&self, key: Bytes, value: Value) -> bool {
        self.set_count.fetch_add(1, Ordering::Relaxed);

        let mut data = self.get_shard(&key).data.write();
        let is_new = data.insert(key, value).is_none();

        if is_new {
            self.key_count.fetch_add(1, Ordering::Relaxed);
        }

        is_new
    }

    /// Returns a copy of the value stored at `key`, or `None` if absent.
    pub fn get(&self, key: &[u8]) -> Option<Value> {
        self.get_count.fetch_add(1, Ordering::Relaxed);

        self.get_shard(key).data.read().get(key).cloned()
    }

    /// Deletes a key.
    ///
    /// # Returns
    ///
    /// Returns `true` if the key was deleted, `false` if it didn't exist.
    pub fn delete(&self, key: &[u8]) -> bool {
        self.del_count.fetch_add(1, Ordering::Relaxed);

        let mut data = self.get_shard(key).data.write();
        if data.remove(key).is_some() {
            self.key_count.fetch_sub(1, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Deletes multiple keys.
    ///
    /// # Returns
    ///
    /// Returns the number of keys that were actually removed. A key listed
    /// twice is only counted once.
    pub fn delete_many(&self, keys: &[Bytes]) -> u64 {
        keys.iter().filter(|key| self.delete(key)).count() as u64
    }

    /// Checks if a key exists.
    pub fn exists(&self, key: &[u8]) -> bool {
        self.get_shard(key).data.read().contains_key(key)
    }

    /// Counts how many of the given keys exist. Repeated keys count each time.
    pub fn exists_many(&self, keys: &[Bytes]) -> u64 {
        keys.iter().filter(|key| self.exists(key)).count() as u64
    }

    /// Atomically replaces the value at `key` with one computed from it.
    ///
    /// `update` receives the current value (`None` if the key is absent)
    /// while the key's shard is write-locked. If it returns `Ok`, the new
    /// value is stored and a copy is returned. If it returns `Err`, the
    /// entry is left exactly as it was and the error is passed through.
    ///
    /// `update` runs with the shard lock held: it must not touch the engine.
    pub fn atomic_update<F, E>(&self, key: &Bytes, update: F) -> Result<Value, E>
    where
        F: FnOnce(Option<&Value>) -> Result<Value, E>,
    {
        let mut data = self.get_shard(key).data.write();

        let next = match update(data.get(key)) {
            Ok(next) => next,
            Err(e) => {
                self.rejected_count.fetch_add(1, Ordering::Relaxed);
                return Err(e);
            }
        };

        self.update_count.fetch_add(1, Ordering::Relaxed);
        if data.insert(key.clone(), next.clone()).is_none() {
            self.key_count.fetch_add(1, Ordering::Relaxed);
        }

        Ok(next)
    }

    /// Removes every key.
    pub fn flush(&self) {
        for shard in &self.shards {
            let mut data = shard.data.write();
            let removed = data.len() as u64;
            data.clear();
            self.key_count.fetch_sub(removed, Ordering::Relaxed);
        }
    }

    /// Returns the number of keys.
    pub fn len(&self) -> u64 {
        self.key_count.load(Ordering::Relaxed)
    }

    /// Returns true if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a snapshot of the operation counters.
    pub fn stats(&self) -> StorageStats {
        StorageStats {
            keys: self.key_count.load(Ordering::Relaxed),
            get_ops: self.get_count.load(Ordering::Relaxed),
            set_ops: self.set_count.load(Ordering::Relaxed),
            del_ops: self.del_count.load(Ordering::Relaxed),
            update_ops: self.update_count.load(Ordering::Relaxed),
            rejected_updates: self.rejected_count.load(Ordering::Relaxed),
        }
    }
}

/// Storage statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageStats {
    pub keys: u64,
    pub get_ops: u64,
    pub set_ops: u64,
    pub del_ops: u64,
    pub update_ops: u64,
    pub rejected_updates: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn key(s: &str) -> Bytes {
        Bytes::from(s.to_string())
    }

    #[test]
    fn test_set_and_get() {
        let engine = StorageEngine::new();

        assert!(engine.set(key("key"), Value::string("value")));
        assert_eq!(engine.get(b"key"), Some(Value::string("value")));

        assert!(!engine.set(key("key"), Value::Integer(7)));
        assert_eq!(engine.get(b"key"), Some(Value::Integer(7)));
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn test_get_nonexistent() {
        let engine = StorageEngine::new();
        assert_eq!(engine.get(b"nonexistent"), None);
    }

    #[test]
    fn test_delete() {
        let engine = StorageEngine::new();

        engine.set(key("key"), Value::string("value"));
        assert!(engine.delete(b"key"));
        assert_eq!(engine.get(b"key"), None);
        assert!(!engine.delete(b"key")); // Already deleted
        assert!(engine.is_empty());
    }

    #[test]
    fn test_delete_many_counts_removed_only() {
        let engine = StorageEngine::new();

        engine.set(key("a"), Value::Integer(1));
        engine.set(key("b"), Value::Integer(2));

        let removed = engine.delete_many(&[key("a"), key("b"), key("c"), key("a")]);
        assert_eq!(removed, 2);
        assert!(engine.is_empty());
    }

    #[test]
    fn test_exists() {
        let engine = StorageEngine::new();

        assert!(!engine.exists(b"key"));
        engine.set(key("key"), Value::string("value"));
        assert!(engine.exists(b"key"));
        assert_eq!(engine.exists_many(&[key("key"), key("key"), key("nope")]), 2);
    }

    #[test]
    fn test_atomic_update_on_absent_key() {
        let engine = StorageEngine::new();

        let result: Result<Value, ()> = engine.atomic_update(&key("n"), |current| {
            assert!(current.is_none());
            Ok(Value::Integer(5))
        });

        assert_eq!(result, Ok(Value::Integer(5)));
        assert_eq!(engine.get(b"n"), Some(Value::Integer(5)));
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn test_atomic_update_failure_leaves_entry() {
        let engine = StorageEngine::new();
        engine.set(key("n"), Value::string("bar"));

        let result: Result<Value, &str> = engine.atomic_update(&key("n"), |_| Err("nope"));
        assert_eq!(result, Err("nope"));
        assert_eq!(engine.get(b"n"), Some(Value::string("bar")));

        let result: Result<Value, &str> = engine.atomic_update(&key("absent"), |_| Err("nope"));
        assert_eq!(result, Err("nope"));
        assert!(!engine.exists(b"absent"));
        assert_eq!(engine.len(), 1);

        let stats = engine.stats();
        assert_eq!(stats.update_ops, 0);
        assert_eq!(stats.rejected_updates, 2);
    }

    #[test]
    fn test_flush() {
        let engine = StorageEngine::new();

        for i in 0..100 {
            engine.set(key(&format!("key{}", i)), Value::Integer(i));
        }
        assert_eq!(engine.len(), 100);

        engine.flush();
        assert!(engine.is_empty());
        assert_eq!(engine.get(b"key1"), None);
    }

    #[test]
    fn test_single_shard() {
        let engine = StorageEngine::with_shards(0);
        assert_eq!(engine.shard_count(), 1);

        engine.set(key("a"), Value::Integer(1));
        engine.set(key("b"), Value::Integer(2));
        assert_eq!(engine.get(b"b"), Some(Value::Integer(2)));
    }

    #[test]
    fn test_stats() {
        let engine = StorageEngine::new();

        engine.set(key("a"), Value::Integer(1));
        engine.get(b"a");
        engine.get(b"missing");
        engine.delete(b"a");

        let stats = engine.stats();
        assert_eq!(stats.keys, 0);
        assert_eq!(stats.set_ops, 1);
        assert_eq!(stats.get_ops, 2);
        assert_eq!(stats.del_ops, 1);
    }

    #[test]
    fn test_concurrent_access() {
        let engine = Arc::new(StorageEngine::new());
        let mut handles = vec![];

        // Spawn multiple writers
        for i in 0..10 {
            let engine = Arc::clone(&engine);
            handles.push(thread::spawn(move || {
                for j in 0..100 {
                    let k = format!("key-{}-{}", i, j);
                    engine.set(Bytes::from(k.clone()), Value::string("value"));
                    engine.get(k.as_bytes());
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(engine.len(), 1000);
    }

    #[test]
    fn test_concurrent_atomic_updates_do_not_lose_writes() {
        let engine = Arc::new(StorageEngine::with_shards(4));
        let mut handles = vec![];

        for _ in 0..8 {
            let engine = Arc::clone(&engine);
            handles.push(thread::spawn(move || {
                for _ in 0..500 {
                    let _: Result<Value, ()> = engine.atomic_update(&key("hot"), |current| {
                        let n = current.map(|v| v.as_integer().unwrap()).unwrap_or(0);
                        Ok(Value::Integer(n + 1))
                    });
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(engine.get(b"hot"), Some(Value::Integer(4000)));
        assert_eq!(engine.stats().update_ops, 4000);
    }
}
