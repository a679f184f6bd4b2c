//! Traits and structs for stashbox store interaction.
//!
//! The HTTP cache only needs a tiny capability from its storage: look a byte
//! blob up by key, replace it wholesale, and delete it. [`Backend`] describes
//! exactly that, and [`CacheBackend`] layers typed access on top of it through
//! a pluggable value [`Format`].
//!
//! If you want to implement your own store, you are in the right place.
mod backend;
pub mod format;
mod key;

pub use backend::{Backend, BackendResult, CacheBackend};
pub use format::{BincodeFormat, Format, FormatError, JsonFormat};
pub use key::CacheKey;
use thiserror::Error;

/// Failure of a store operation.
///
/// The cache never fails a request because of it: read failures count as a
/// miss and write or delete failures are logged.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Internal store error, state or computation error.
    ///
    /// Any error not bounded with network interaction.
    #[error(transparent)]
    InternalError(Box<dyn std::error::Error + Send>),
    /// Network interaction error.
    #[error(transparent)]
    ConnectionError(Box<dyn std::error::Error + Send>),
    /// Serializing\Deserializing data error.
    #[error(transparent)]
    FormatError(#[from] FormatError),
}

/// Status of deleting result.
#[derive(Debug, PartialEq, Eq)]
pub enum DeleteStatus {
    /// Record successfully deleted.
    Deleted,
    /// Record already missing.
    Missing,
}
