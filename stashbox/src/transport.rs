//! The caching mediator between a client and its network transport.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{self, HeaderMap, HeaderValue};
use http::{Method, Request, Response, StatusCode};
use stashbox_backend::{
    Backend, BackendError, CacheBackend, CacheKey, DeleteStatus, Format, JsonFormat,
};
use stashbox_http::cache_control::directive;
use stashbox_http::headers::merge_end_to_end;
use stashbox_http::{
    CacheBody, CacheControl, Clock, Freshness, OnComplete, SerializableHttpResponse, SystemClock,
    cache_key, freshness, gateway_timeout, is_cacheable_request, is_cacheable_status,
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::context::CacheStatus;
use crate::metrics;
use crate::upstream::Upstream;

/// Private HTTP cache wrapped around an [`Upstream`].
///
/// For every dispatched request the transport:
///
/// 1. answers fresh stored responses directly,
/// 2. revalidates stale ones with `If-None-Match` / `If-Modified-Since` and
///    folds a `304 Not Modified` into the stored response,
/// 3. stores storable origin responses, deferring `GET` bodies until the
///    caller has read them to the end,
/// 4. removes a stored entry when the origin's new answer may not be stored.
///
/// Only `GET` and `HEAD` requests without a `Range` header touch the store.
/// Store failures never fail a request.
///
/// `CacheTransport` is cheap to clone; clones share the store and clock.
pub struct CacheTransport<B, F = JsonFormat> {
    backend: Arc<B>,
    format: F,
    clock: Arc<dyn Clock>,
    config: Config,
}

impl<B, F> Clone for CacheTransport<B, F>
where
    F: Clone,
{
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            format: self.format.clone(),
            clock: Arc::clone(&self.clock),
            config: self.config.clone(),
        }
    }
}

impl<B, F> fmt::Debug for CacheTransport<B, F>
where
    B: Backend,
    F: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheTransport")
            .field("backend", &self.backend.name())
            .field("format", &self.format)
            .field("clock", &self.clock)
            .field("config", &self.config)
            .finish()
    }
}

impl<B> CacheTransport<B, JsonFormat>
where
    B: Backend,
{
    /// Creates a transport with the default format, clock and config.
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
            format: JsonFormat,
            clock: Arc::new(SystemClock),
            config: Config::default(),
        }
    }
}

impl CacheTransport<NotSet, JsonFormat> {
    /// Creates a new [`CacheTransportBuilder`].
    pub fn builder() -> CacheTransportBuilder<NotSet, JsonFormat> {
        CacheTransportBuilder::new()
    }
}

impl<B, F> CacheTransport<B, F> {
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}

impl<B, F> CacheTransport<B, F>
where
    B: Backend + 'static,
    F: Format,
{
    /// Answers `request` from the store, the upstream, or both.
    ///
    /// The upstream is called at most once. Its errors are returned
    /// unchanged and leave the store untouched.
    #[tracing::instrument(
        name = "stashbox.dispatch",
        skip_all,
        fields(method = %request.method(), uri = %request.uri())
    )]
    pub async fn dispatch<ReqB, ResB, U, E>(
        &self,
        mut request: Request<ReqB>,
        mut upstream: U,
    ) -> Result<Response<CacheBody<ResB>>, E>
    where
        U: Upstream<Request<ReqB>, Response = Result<Response<ResB>, E>>,
    {
        let key = cache_key(&request);
        let cacheable = is_cacheable_request(&request);
        let method = request.method().clone();
        let request_cc = CacheControl::from_headers(request.headers());
        let cached = if cacheable { self.lookup(&key) } else { None };
        let had_entry = cached.is_some();

        let response = match cached {
            Some(mut stored) => {
                match freshness(stored.headers(), request.headers(), self.clock.as_ref()) {
                    Freshness::Fresh => {
                        debug!(%key, "fresh entry served from store");
                        return Ok(self.finish(stored.into_response(), CacheStatus::Hit));
                    }
                    Freshness::Stale => {
                        debug!(%key, "stale entry, revalidating");
                        add_validators(request.headers_mut(), stored.headers());
                    }
                    Freshness::Transparent => {
                        debug!(%key, "stored entry skipped for this request");
                    }
                }

                let response = upstream.call(request).await?;
                if response.status() == StatusCode::NOT_MODIFIED {
                    debug!(%key, "entry confirmed by origin");
                    merge_end_to_end(stored.headers_mut(), response.headers());
                    self.store(&key, &stored);
                    return Ok(self.finish(stored.into_response(), CacheStatus::Revalidated));
                }
                response
            }
            None => {
                if request_cc.contains(directive::ONLY_IF_CACHED) {
                    debug!(%key, "only-if-cached request without usable entry");
                    metrics::record_status(CacheStatus::Miss, self.backend.name());
                    return Ok(gateway_timeout());
                }
                upstream.call(request).await?
            }
        };

        if !cacheable {
            return Ok(self.finish(response.map(CacheBody::Passthrough), CacheStatus::Bypass));
        }

        let status = response.status();
        let storable = is_cacheable_status(status)
            && !request_cc.contains(directive::NO_STORE)
            && !CacheControl::from_headers(response.headers()).contains(directive::NO_STORE);

        let response = if !storable {
            if had_entry {
                debug!(%key, %status, "unstorable response invalidates stored entry");
                self.invalidate(&key);
            }
            response.map(CacheBody::Passthrough)
        } else if method == Method::GET && status != StatusCode::NO_CONTENT {
            debug!(%key, %status, "storing once the body is read");
            let (parts, body) = response.into_parts();
            let on_complete = self.deferred_store(key, &parts);
            Response::from_parts(parts, CacheBody::capture(body, on_complete))
        } else {
            let (parts, body) = response.into_parts();
            self.store(&key, &SerializableHttpResponse::from_parts(&parts, Bytes::new()));
            Response::from_parts(parts, CacheBody::Passthrough(body))
        };

        Ok(self.finish(response, CacheStatus::Miss))
    }

    /// Returns the response stored for `request`, without contacting the
    /// origin and without checking freshness.
    ///
    /// Unreadable entries are reported as `None`. The response is not marked
    /// as served from the cache.
    pub fn cached_response<ReqB, ResB>(
        &self,
        request: &Request<ReqB>,
    ) -> Option<Response<CacheBody<ResB>>> {
        let key = cache_key(request);
        self.lookup(&key).map(SerializableHttpResponse::into_response)
    }

    fn lookup(&self, key: &CacheKey) -> Option<SerializableHttpResponse> {
        match self.backend.get_value(key, &self.format) {
            Ok(entry) => entry,
            Err(BackendError::FormatError(error)) => {
                warn!(%key, %error, "unreadable cache entry ignored");
                None
            }
            Err(error) => {
                warn!(%key, %error, "cache lookup failed");
                metrics::record_backend_error(self.backend.name(), "get");
                None
            }
        }
    }

    fn store(&self, key: &CacheKey, entry: &SerializableHttpResponse) {
        store_entry(self.backend.as_ref(), &self.format, key, entry);
    }

    /// Builds the callback persisting a `GET` response once its body is read.
    fn deferred_store(&self, key: CacheKey, parts: &http::response::Parts) -> OnComplete {
        let backend = Arc::clone(&self.backend);
        let format = self.format.clone();
        let status = parts.status;
        let version = parts.version;
        let headers = parts.headers.clone();
        Box::new(move |body: Bytes| {
            let entry = SerializableHttpResponse::new(status, version, headers, body);
            store_entry(backend.as_ref(), &format, &key, &entry);
        })
    }

    fn invalidate(&self, key: &CacheKey) {
        match self.backend.delete(key) {
            Ok(DeleteStatus::Deleted) => metrics::record_invalidation(self.backend.name()),
            Ok(DeleteStatus::Missing) => debug!(%key, "entry already gone"),
            Err(error) => {
                warn!(%key, %error, "failed to delete cache entry");
                metrics::record_backend_error(self.backend.name(), "delete");
            }
        }
    }

    fn finish<ResB>(
        &self,
        mut response: Response<CacheBody<ResB>>,
        status: CacheStatus,
    ) -> Response<CacheBody<ResB>> {
        if status.is_from_cache() && self.config.mark_cached_responses() {
            response.headers_mut().insert(
                self.config.cache_hit_header().clone(),
                HeaderValue::from_static("1"),
            );
        }
        metrics::record_status(status, self.backend.name());
        debug!(cache.status = %status, "dispatch finished");
        response
    }
}

/// Serializes and writes an entry. Failures are logged and dropped.
fn store_entry<B, F>(backend: &B, format: &F, key: &CacheKey, entry: &SerializableHttpResponse)
where
    B: Backend + ?Sized,
    F: Format,
{
    match backend.set_value(key, entry, format) {
        Ok(size) => {
            debug!(%key, size, "response stored");
            metrics::record_store(backend.name(), size);
        }
        Err(error) => {
            warn!(%key, %error, "failed to store response");
            metrics::record_backend_error(backend.name(), "set");
        }
    }
}

/// Adds the validators of a stored response to a request, keeping any the
/// caller already set.
fn add_validators(request: &mut HeaderMap, stored: &HeaderMap) {
    let pairs = [
        (header::ETAG, header::IF_NONE_MATCH),
        (header::LAST_MODIFIED, header::IF_MODIFIED_SINCE),
    ];
    for (validator, condition) in pairs {
        let value = match stored.get(&validator) {
            Some(value) if !value.is_empty() => value,
            _ => continue,
        };
        if !request.contains_key(&condition) {
            request.insert(condition, value.clone());
        }
    }
}

/// Marker type for unset builder fields.
///
/// When you see `NotSet` in a compiler error, it means you haven't called
/// the corresponding builder method yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotSet;

/// Builder for [`CacheTransport`].
///
/// ```
/// use std::sync::Arc;
/// use stashbox::{CacheTransport, Config};
/// use stashbox_http::ManualClock;
/// use stashbox_lru::LruBackend;
///
/// let transport = CacheTransport::builder()
///     .backend(LruBackend::new(1024))
///     .clock(Arc::new(ManualClock::starting_now()))
///     .config(Config::builder().mark_cached_responses(false).build())
///     .build();
/// assert!(!transport.config().mark_cached_responses());
/// ```
pub struct CacheTransportBuilder<B, F> {
    backend: B,
    format: F,
    clock: Arc<dyn Clock>,
    config: Config,
}

impl CacheTransportBuilder<NotSet, JsonFormat> {
    pub fn new() -> Self {
        Self {
            backend: NotSet,
            format: JsonFormat,
            clock: Arc::new(SystemClock),
            config: Config::default(),
        }
    }
}

impl Default for CacheTransportBuilder<NotSet, JsonFormat> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B, F> CacheTransportBuilder<B, F> {
    /// Sets the store.
    pub fn backend<NB>(self, backend: NB) -> CacheTransportBuilder<NB, F>
    where
        NB: Backend,
    {
        CacheTransportBuilder {
            backend,
            format: self.format,
            clock: self.clock,
            config: self.config,
        }
    }

    /// Sets the format stored responses are encoded with.
    pub fn format<NF>(self, format: NF) -> CacheTransportBuilder<B, NF>
    where
        NF: Format,
    {
        CacheTransportBuilder {
            backend: self.backend,
            format,
            clock: self.clock,
            config: self.config,
        }
    }

    /// Sets the time source used for freshness decisions.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }
}

impl<B, F> CacheTransportBuilder<B, F>
where
    B: Backend,
    F: Format,
{
    pub fn build(self) -> CacheTransport<B, F> {
        CacheTransport {
            backend: Arc::new(self.backend),
            format: self.format,
            clock: self.clock,
            config: self.config,
        }
    }
}
