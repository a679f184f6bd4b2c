#![doc = include_str!("../README.md")]

mod middleware;
mod upstream;

pub use middleware::{CacheMiddleware, CacheMiddlewareBuilder, NotSet};
pub use upstream::{ReqwestUpstream, cache_body_to_reqwest};

/// Re-export reqwest body type for convenience in type annotations
pub use reqwest::Body as ReqwestBody;

// Re-export common types
pub use stashbox::{CacheStatus, CacheTransport, Config, ConfigBuilder};
pub use stashbox_backend::{Backend, BincodeFormat, Format, JsonFormat};
pub use stashbox_http::{Clock, ManualClock, SystemClock};
