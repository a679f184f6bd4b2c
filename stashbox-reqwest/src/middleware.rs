//! Cache middleware for reqwest-middleware.

use std::sync::Arc;

use async_trait::async_trait;
use http::Extensions;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next, Result};
use stashbox::{CacheTransport, CacheTransportBuilder, Clock, Config};
use stashbox_backend::{Backend, Format, JsonFormat};

use crate::upstream::{ReqwestUpstream, cache_body_to_reqwest};

pub use stashbox::NotSet;

/// Cache middleware for reqwest-middleware.
///
/// Every request passing through the client is dispatched through a
/// [`CacheTransport`]; the rest of the middleware chain acts as its network
/// leg.
///
/// # Type Parameters
///
/// * `B` - Store backend (e.g., `LruBackend`)
/// * `F` - Format stored responses are encoded with
pub struct CacheMiddleware<B, F = JsonFormat> {
    transport: CacheTransport<B, F>,
}

impl<B> CacheMiddleware<B, JsonFormat>
where
    B: Backend,
{
    /// Create a cache middleware with the default format, clock and config.
    pub fn new(backend: B) -> Self {
        Self {
            transport: CacheTransport::new(backend),
        }
    }
}

impl CacheMiddleware<NotSet, JsonFormat> {
    /// Creates a new [`CacheMiddlewareBuilder`].
    pub fn builder() -> CacheMiddlewareBuilder<NotSet, JsonFormat> {
        CacheMiddlewareBuilder::new()
    }
}

impl<B, F> CacheMiddleware<B, F> {
    /// The transport every request is dispatched through.
    pub fn transport(&self) -> &CacheTransport<B, F> {
        &self.transport
    }
}

impl<B, F> From<CacheTransport<B, F>> for CacheMiddleware<B, F> {
    fn from(transport: CacheTransport<B, F>) -> Self {
        Self { transport }
    }
}

impl<B, F> Clone for CacheMiddleware<B, F>
where
    F: Clone,
{
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
        }
    }
}

#[async_trait]
impl<B, F> Middleware for CacheMiddleware<B, F>
where
    B: Backend + 'static,
    F: Format,
{
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        // Convert reqwest::Request to http::Request<reqwest::Body>
        let http_request: http::Request<reqwest::Body> = req
            .try_into()
            .map_err(|e: reqwest::Error| reqwest_middleware::Error::Reqwest(e))?;

        let upstream = ReqwestUpstream::new(next, extensions);
        let http_response = self.transport.dispatch(http_request, upstream).await?;

        let (parts, body) = http_response.into_parts();
        let http_response = http::Response::from_parts(parts, cache_body_to_reqwest(body));

        Ok(http_response.into())
    }
}

/// Builder for [`CacheMiddleware`].
///
/// Accepts the same collaborators as [`CacheTransport::builder`]; `build` is
/// available once a backend is set.
pub struct CacheMiddlewareBuilder<B, F> {
    inner: CacheTransportBuilder<B, F>,
}

impl CacheMiddlewareBuilder<NotSet, JsonFormat> {
    pub fn new() -> Self {
        Self {
            inner: CacheTransport::builder(),
        }
    }
}

impl Default for CacheMiddlewareBuilder<NotSet, JsonFormat> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B, F> CacheMiddlewareBuilder<B, F> {
    /// Sets the store.
    pub fn backend<NB>(self, backend: NB) -> CacheMiddlewareBuilder<NB, F>
    where
        NB: Backend,
    {
        CacheMiddlewareBuilder {
            inner: self.inner.backend(backend),
        }
    }

    /// Sets the format stored responses are encoded with.
    pub fn format<NF>(self, format: NF) -> CacheMiddlewareBuilder<B, NF>
    where
        NF: Format,
    {
        CacheMiddlewareBuilder {
            inner: self.inner.format(format),
        }
    }

    /// Sets the time source used for freshness decisions.
    pub fn clock(self, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: self.inner.clock(clock),
        }
    }

    pub fn config(self, config: Config) -> Self {
        Self {
            inner: self.inner.config(config),
        }
    }
}

impl<B, F> CacheMiddlewareBuilder<B, F>
where
    B: Backend,
    F: Format,
{
    pub fn build(self) -> CacheMiddleware<B, F> {
        CacheMiddleware {
            transport: self.inner.build(),
        }
    }
}
