//! Bounded in-memory store for stashbox.
//!
//! [`LruBackend`] keeps at most a fixed number of serialized responses and
//! evicts the least recently used one when a write would exceed that number.
//! Both reads and writes count as a use.
//!
//! ```
//! use bytes::Bytes;
//! use stashbox_backend::{Backend, CacheKey};
//! use stashbox_lru::LruBackend;
//!
//! let backend = LruBackend::builder().max_entries(2).build();
//! backend.set(&CacheKey::new("a"), Bytes::from_static(b"1")).unwrap();
//! backend.set(&CacheKey::new("b"), Bytes::from_static(b"2")).unwrap();
//!
//! // "a" becomes the most recently used entry...
//! backend.get(&CacheKey::new("a")).unwrap();
//! // ...so "b" is the one that makes room for "c".
//! backend.set(&CacheKey::new("c"), Bytes::from_static(b"3")).unwrap();
//!
//! assert!(backend.get(&CacheKey::new("b")).unwrap().is_none());
//! assert!(backend.get(&CacheKey::new("a")).unwrap().is_some());
//! ```

mod backend;
mod builder;

pub use backend::LruBackend;
pub use builder::{EntryCapacity, LruBackendBuilder, NoCapacity};
