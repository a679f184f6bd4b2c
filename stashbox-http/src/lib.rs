//! HTTP caching rules used by stashbox.
//!
//! This crate holds the pure, protocol-level half of the cache:
//!
//! - [`cache_key`] derives the store key for a request.
//! - [`CacheControl`] parses `Cache-Control` directives.
//! - [`freshness()`] classifies a stored response as [`Freshness::Fresh`],
//!   [`Freshness::Stale`] or [`Freshness::Transparent`] against an injected
//!   [`Clock`].
//! - [`headers`] splits response headers into hop-by-hop and end-to-end sets
//!   and merges `304 Not Modified` updates into a stored response.
//! - [`SerializableHttpResponse`] is the stored form of a response.
//! - [`CacheBody`] and [`CaptureBody`] carry response bodies, capturing a
//!   streamed body for storage only once it has been read to the end.
//!
//! None of it touches the network or the store; the orchestration lives in
//! the `stashbox` crate.

pub mod body;
pub mod cache_control;
pub mod clock;
pub mod freshness;
pub mod headers;
mod key;
mod response;

pub use body::{CacheBody, CaptureBody, OnComplete};
pub use cache_control::CacheControl;
pub use clock::{Clock, ManualClock, SystemClock};
pub use freshness::{Freshness, format_http_date, freshness, parse_http_date};
pub use key::{cache_key, is_cacheable_request};
pub use response::{SerializableHttpResponse, gateway_timeout, is_cacheable_status};
