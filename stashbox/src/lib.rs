//! A private HTTP cache for outbound requests.
//!
//! [`CacheTransport`] sits between a client and its network transport, an
//! [`Upstream`]. It answers requests from a [`Backend`] store when the stored
//! response is still fresh, revalidates stale entries with conditional
//! requests, and stores new responses that may be cached.
//!
//! ```
//! use std::convert::Infallible;
//! use std::future::Ready;
//!
//! use bytes::Bytes;
//! use http_body_util::{BodyExt, Full};
//! use stashbox::{CacheTransport, Upstream};
//! use stashbox_lru::LruBackend;
//!
//! #[derive(Clone)]
//! struct Origin;
//!
//! impl Upstream<http::Request<()>> for Origin {
//!     type Response = Result<http::Response<Full<Bytes>>, Infallible>;
//!     type Future = Ready<Self::Response>;
//!
//!     fn call(&mut self, _req: http::Request<()>) -> Self::Future {
//!         let response = http::Response::builder()
//!             .header("cache-control", "max-age=3600")
//!             .header("date", stashbox_http::format_http_date(chrono::Utc::now()))
//!             .body(Full::new(Bytes::from_static(b"hello")))
//!             .unwrap();
//!         std::future::ready(Ok(response))
//!     }
//! }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let cache = CacheTransport::new(LruBackend::new(128));
//! let request = || http::Request::get("http://example.com/").body(()).unwrap();
//!
//! let first = cache.dispatch(request(), Origin).await.unwrap();
//! assert!(first.headers().get("x-from-cache").is_none());
//! // The body is stored once it has been read to the end.
//! first.into_body().collect().await.unwrap();
//!
//! let second = cache.dispatch(request(), Origin).await.unwrap();
//! assert_eq!(second.headers()["x-from-cache"], "1");
//! # });
//! ```
//!
//! The protocol-level rules live in [`stashbox_http`]; the store capability
//! in [`stashbox_backend`].

pub mod config;
pub mod context;
pub mod error;
pub mod metrics;
mod transport;
mod upstream;

pub use config::{Config, ConfigBuilder};
pub use context::CacheStatus;
pub use error::ConfigError;
pub use transport::{CacheTransport, CacheTransportBuilder, NotSet};
pub use upstream::Upstream;

pub use stashbox_backend::{Backend, BackendError, CacheKey, Format, JsonFormat};
pub use stashbox_http::{CacheBody, Clock, ManualClock, SystemClock};
