use std::sync::Arc;

use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};

use crate::{BackendError, CacheKey, DeleteStatus, format::Format};

pub type BackendResult<T> = Result<T, BackendError>;

/// Byte-blob store used by the cache.
///
/// Implementations must be safe to call concurrently: the cache shares one
/// store between every in-flight request and never adds locking of its own.
/// A value written by [`set`](Backend::set) must be visible to every
/// [`get`](Backend::get) issued after `set` returns; no other ordering or
/// durability guarantee is required.
pub trait Backend: Send + Sync {
    /// Returns the blob stored under `key`, or `None` if there is none.
    fn get(&self, key: &CacheKey) -> BackendResult<Option<Bytes>>;

    /// Inserts or replaces the blob stored under `key`.
    fn set(&self, key: &CacheKey, value: Bytes) -> BackendResult<()>;

    /// Removes the blob stored under `key`. Missing keys are not an error.
    fn delete(&self, key: &CacheKey) -> BackendResult<DeleteStatus>;

    /// Returns the name of this store for logs.
    fn name(&self) -> &str {
        "backend"
    }
}

impl<T> Backend for &T
where
    T: Backend + ?Sized,
{
    fn get(&self, key: &CacheKey) -> BackendResult<Option<Bytes>> {
        (**self).get(key)
    }

    fn set(&self, key: &CacheKey, value: Bytes) -> BackendResult<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        (**self).delete(key)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T> Backend for Box<T>
where
    T: Backend + ?Sized,
{
    fn get(&self, key: &CacheKey) -> BackendResult<Option<Bytes>> {
        (**self).get(key)
    }

    fn set(&self, key: &CacheKey, value: Bytes) -> BackendResult<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        (**self).delete(key)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T> Backend for Arc<T>
where
    T: Backend + ?Sized,
{
    fn get(&self, key: &CacheKey) -> BackendResult<Option<Bytes>> {
        (**self).get(key)
    }

    fn set(&self, key: &CacheKey, value: Bytes) -> BackendResult<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        (**self).delete(key)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Typed access to a [`Backend`].
///
/// Values are encoded with the given [`Format`] before they reach the store,
/// and decoded on the way back. A blob that fails to decode surfaces as
/// [`BackendError::FormatError`]; it is left in the store untouched.
pub trait CacheBackend: Backend {
    /// Reads and decodes the value stored under `key`.
    fn get_value<T, F>(&self, key: &CacheKey, format: &F) -> BackendResult<Option<T>>
    where
        T: DeserializeOwned,
        F: Format,
    {
        match self.get(key)? {
            Some(raw) => Ok(Some(format.deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    /// Encodes `value` and stores it under `key`, returning the encoded size.
    fn set_value<T, F>(&self, key: &CacheKey, value: &T, format: &F) -> BackendResult<usize>
    where
        T: Serialize,
        F: Format,
    {
        let raw = format.serialize(value)?;
        let size = raw.len();
        self.set(key, raw)?;
        Ok(size)
    }
}

impl<T> CacheBackend for T where T: Backend + ?Sized {}
