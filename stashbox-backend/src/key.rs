//! Cache key type.
//!
//! A [`CacheKey`] is an opaque string handed to the store. How it is derived
//! from a request is decided by the HTTP layer; the store only hashes and
//! compares it.
//!
//! ```
//! use stashbox_backend::CacheKey;
//!
//! let key = CacheKey::new("http://example.com/data");
//! assert_eq!(key.as_str(), "http://example.com/data");
//! assert_eq!(format!("{}", key), "http://example.com/data");
//! ```
//!
//! [`CacheKey`] wraps a [`SmolStr`], so cloning a key never copies a long URL.

use smol_str::SmolStr;
use std::borrow::Borrow;
use std::fmt;

/// Key under which a serialized response is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(SmolStr);

impl CacheKey {
    /// Creates a key from anything string-like.
    pub fn new(key: impl Into<SmolStr>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the length of the key in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the empty key.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Borrow<str> for CacheKey {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for CacheKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CacheKey {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(CacheKey::new("GET-less key"), 1);
        assert_eq!(map.get("GET-less key"), Some(&1));
    }

    #[test]
    fn test_display_is_raw_key() {
        let key = CacheKey::from(String::from("HEAD http://example.com/"));
        assert_eq!(key.to_string(), "HEAD http://example.com/");
        assert_eq!(key.len(), 24);
        assert!(!key.is_empty());
    }
}
