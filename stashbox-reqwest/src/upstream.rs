//! Upstream wrapper for reqwest-middleware's Next type.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use http::Extensions;
use reqwest_middleware::{Next, Result};
use stashbox::Upstream;
use stashbox_http::CacheBody;

/// Upstream wrapper that bridges reqwest-middleware's `Next<'a>` to stashbox's `Upstream` trait.
///
/// Requests are handed to the rest of the middleware chain together with the
/// caller's extensions, so extensions written further down the chain stay
/// visible to the caller.
pub struct ReqwestUpstream<'a> {
    next: Next<'a>,
    extensions: Option<&'a mut Extensions>,
}

impl<'a> ReqwestUpstream<'a> {
    /// Create a new upstream wrapper.
    pub fn new(next: Next<'a>, extensions: &'a mut Extensions) -> Self {
        Self {
            next,
            extensions: Some(extensions),
        }
    }
}

impl<'a> Upstream<http::Request<reqwest::Body>> for ReqwestUpstream<'a> {
    type Response = Result<http::Response<reqwest::Body>>;
    type Future = Pin<Box<dyn Future<Output = Self::Response> + Send + 'a>>;

    fn call(&mut self, req: http::Request<reqwest::Body>) -> Self::Future {
        let next = self.next.clone();
        let extensions = self.extensions.take();

        Box::pin(async move {
            let request: reqwest::Request = req
                .try_into()
                .map_err(|e: reqwest::Error| reqwest_middleware::Error::Reqwest(e))?;

            let mut detached = Extensions::new();
            let extensions = match extensions {
                Some(extensions) => extensions,
                None => &mut detached,
            };

            let response = next.run(request, extensions).await?;
            Ok(response.into())
        })
    }
}

/// Convert a cache body to `reqwest::Body`.
///
/// - Passthrough: unwraps the origin body
/// - Complete: creates a body from the stored bytes
/// - Capture: wraps the capturing stream, so the response is stored once the
///   caller has read it to the end
pub fn cache_body_to_reqwest(body: CacheBody<reqwest::Body>) -> reqwest::Body {
    match body {
        CacheBody::Passthrough(body) => body,
        CacheBody::Complete(Some(bytes)) => reqwest::Body::from(bytes),
        CacheBody::Complete(None) => reqwest::Body::from(Bytes::new()),
        capture @ CacheBody::Capture(_) => reqwest::Body::wrap(capture),
    }
}
