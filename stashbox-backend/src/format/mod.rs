//! Value formats used to turn cached entries into store blobs.
//!
//! A [`Format`] is a pair of pure functions, value to bytes and bytes to
//! value. The cache stays agnostic of the encoding, so a store shared with
//! other tools can pick whichever representation suits it.

use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

mod bincode;
mod json;

pub use self::bincode::BincodeFormat;
pub use self::json::JsonFormat;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error(transparent)]
    Serialize(Box<dyn std::error::Error + Send>),

    #[error(transparent)]
    Deserialize(Box<dyn std::error::Error + Send>),
}

/// Serialization strategy for stored values.
///
/// Formats are cheap to clone; the cache hands a copy to every deferred
/// write so the encoding can happen after the request future has finished.
pub trait Format: Clone + Send + Sync + std::fmt::Debug + 'static {
    /// Encodes `value` into a blob.
    fn serialize<T>(&self, value: &T) -> Result<Bytes, FormatError>
    where
        T: Serialize;

    /// Decodes a blob previously produced by [`serialize`](Format::serialize).
    fn deserialize<T>(&self, data: &[u8]) -> Result<T, FormatError>
    where
        T: DeserializeOwned;
}
