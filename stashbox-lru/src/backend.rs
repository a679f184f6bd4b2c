//! LRU backend implementation.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use linked_hash_map::LinkedHashMap;
use parking_lot::Mutex;
use smol_str::SmolStr;
use stashbox_backend::{Backend, BackendResult, CacheKey, DeleteStatus};
use tracing::trace;

/// In-memory store with least-recently-used eviction.
///
/// Entries live in a [`LinkedHashMap`], a doubly-linked access-order list
/// threaded through a key index, so lookup, promotion, insertion and eviction
/// are all O(1). A single mutex guards the map.
///
/// `LruBackend` is cheap to clone. Clones share the same entries.
///
/// # Caveats
///
/// - Data is **not persisted**: the store is lost on process restart.
/// - Capacity counts entries, not bytes.
/// - A capacity of `0` disables eviction entirely.
#[derive(Clone)]
pub struct LruBackend {
    inner: Arc<Mutex<LinkedHashMap<CacheKey, Bytes>>>,
    capacity: usize,
    label: SmolStr,
}

impl LruBackend {
    /// Creates a store holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self::builder().max_entries(capacity).build()
    }

    /// Creates a new builder for `LruBackend`.
    pub fn builder() -> crate::builder::LruBackendBuilder<crate::builder::NoCapacity> {
        crate::builder::LruBackendBuilder::new()
    }

    pub(crate) fn from_parts(capacity: usize, label: SmolStr) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LinkedHashMap::new())),
            capacity,
            label,
        }
    }

    /// Maximum number of entries, `0` meaning unbounded.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Returns `true` if `key` is stored, without promoting it.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.inner.lock().contains_key(key)
    }
}

impl fmt::Debug for LruBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruBackend")
            .field("label", &self.label)
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}

impl Backend for LruBackend {
    fn get(&self, key: &CacheKey) -> BackendResult<Option<Bytes>> {
        let mut map = self.inner.lock();
        Ok(map.get_refresh(key).cloned())
    }

    fn set(&self, key: &CacheKey, value: Bytes) -> BackendResult<()> {
        let mut map = self.inner.lock();
        map.insert(key.clone(), value);
        if self.capacity > 0 {
            while map.len() > self.capacity {
                match map.pop_front() {
                    Some((evicted, _)) => trace!(backend = %self.label, key = %evicted, "evicted"),
                    None => break,
                }
            }
        }
        Ok(())
    }

    fn delete(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        let mut map = self.inner.lock();
        match map.remove(key) {
            Some(_) => Ok(DeleteStatus::Deleted),
            None => Ok(DeleteStatus::Missing),
        }
    }

    fn name(&self) -> &str {
        self.label.as_str()
    }
}
