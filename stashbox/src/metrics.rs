//! Metrics declaration and recording.

use crate::context::CacheStatus;

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
lazy_static! {
    /// Track number of requests answered from the store.
    pub static ref CACHE_HIT_COUNTER: &'static str = {
        metrics::describe_counter!(
            "stashbox_cache_hit_total",
            "Total number of requests answered from the store."
        );
        "stashbox_cache_hit_total"
    };
    /// Track number of requests the origin answered.
    pub static ref CACHE_MISS_COUNTER: &'static str = {
        metrics::describe_counter!(
            "stashbox_cache_miss_total",
            "Total number of cacheable requests answered by the origin."
        );
        "stashbox_cache_miss_total"
    };
    /// Track number of stored entries confirmed by `304 Not Modified`.
    pub static ref CACHE_REVALIDATED_COUNTER: &'static str = {
        metrics::describe_counter!(
            "stashbox_cache_revalidated_total",
            "Total number of stored entries confirmed by the origin."
        );
        "stashbox_cache_revalidated_total"
    };
    /// Track number of requests not eligible for caching.
    pub static ref CACHE_BYPASS_COUNTER: &'static str = {
        metrics::describe_counter!(
            "stashbox_cache_bypass_total",
            "Total number of requests not eligible for caching."
        );
        "stashbox_cache_bypass_total"
    };
    /// Track number of entries written to the store.
    pub static ref CACHE_STORE_COUNTER: &'static str = {
        metrics::describe_counter!(
            "stashbox_cache_store_total",
            "Total number of responses written to the store."
        );
        "stashbox_cache_store_total"
    };
    /// Track bytes written to the store.
    pub static ref CACHE_BYTES_WRITTEN: &'static str = {
        metrics::describe_counter!(
            "stashbox_cache_bytes_written_total",
            "Total bytes written to the store."
        );
        "stashbox_cache_bytes_written_total"
    };
    /// Track number of entries removed because a fresh response was not storable.
    pub static ref CACHE_INVALIDATION_COUNTER: &'static str = {
        metrics::describe_counter!(
            "stashbox_cache_invalidation_total",
            "Total number of stored entries invalidated by an unstorable response."
        );
        "stashbox_cache_invalidation_total"
    };
    /// Track store read, write and delete failures.
    pub static ref CACHE_BACKEND_ERRORS: &'static str = {
        metrics::describe_counter!(
            "stashbox_backend_errors_total",
            "Total number of failed store operations."
        );
        "stashbox_backend_errors_total"
    };
}

/// Records how a request was answered.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_status(status: CacheStatus, backend: &str) {
    let counter = match status {
        CacheStatus::Hit => *CACHE_HIT_COUNTER,
        CacheStatus::Miss => *CACHE_MISS_COUNTER,
        CacheStatus::Revalidated => *CACHE_REVALIDATED_COUNTER,
        CacheStatus::Bypass => *CACHE_BYPASS_COUNTER,
    };
    metrics::counter!(counter, "backend" => backend.to_string()).increment(1);
}

/// Records a successful write of `bytes` to the store.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_store(backend: &str, bytes: usize) {
    metrics::counter!(*CACHE_STORE_COUNTER, "backend" => backend.to_string()).increment(1);
    metrics::counter!(*CACHE_BYTES_WRITTEN, "backend" => backend.to_string())
        .increment(bytes as u64);
}

/// Records the removal of an entry.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_invalidation(backend: &str) {
    metrics::counter!(*CACHE_INVALIDATION_COUNTER, "backend" => backend.to_string()).increment(1);
}

/// Records a failed store operation.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_backend_error(backend: &str, operation: &'static str) {
    metrics::counter!(
        *CACHE_BACKEND_ERRORS,
        "backend" => backend.to_string(),
        "operation" => operation
    )
    .increment(1);
}

/// No-op version when metrics feature is disabled.
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_status(_status: CacheStatus, _backend: &str) {}

/// No-op version when metrics feature is disabled.
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_store(_backend: &str, _bytes: usize) {}

/// No-op version when metrics feature is disabled.
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_invalidation(_backend: &str) {}

/// No-op version when metrics feature is disabled.
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_backend_error(_backend: &str, _operation: &'static str) {}
