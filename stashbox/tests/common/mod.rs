#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Ready;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use http::{HeaderMap, Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use parking_lot::Mutex;
use stashbox::{CacheBody, CacheTransport, Config, ManualClock, Upstream};
use stashbox_http::format_http_date;
use stashbox_lru::LruBackend;

pub const URL: &str = "http://origin.test/resource";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginError(pub &'static str);

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
}

#[derive(Default)]
struct OriginState {
    script: VecDeque<Result<Response<Full<Bytes>>, OriginError>>,
    seen: Vec<SeenRequest>,
}

/// An origin answering with scripted responses and recording what it saw.
#[derive(Clone, Default)]
pub struct Origin {
    state: Arc<Mutex<OriginState>>,
}

impl Origin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, response: Response<Full<Bytes>>) -> &Self {
        self.state.lock().script.push_back(Ok(response));
        self
    }

    pub fn fail(&self, error: OriginError) -> &Self {
        self.state.lock().script.push_back(Err(error));
        self
    }

    pub fn calls(&self) -> usize {
        self.state.lock().seen.len()
    }

    pub fn last_request(&self) -> SeenRequest {
        self.state
            .lock()
            .seen
            .last()
            .cloned()
            .expect("origin was never called")
    }
}

impl<B> Upstream<Request<B>> for Origin {
    type Response = Result<Response<Full<Bytes>>, OriginError>;
    type Future = Ready<Self::Response>;

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let mut state = self.state.lock();
        state.seen.push(SeenRequest {
            method: req.method().clone(),
            uri: req.uri().to_string(),
            headers: req.headers().clone(),
        });
        let next = state
            .script
            .pop_front()
            .expect("origin called more often than scripted");
        std::future::ready(next)
    }
}

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 9, 30, 0).unwrap()
}

pub struct Harness {
    pub clock: Arc<ManualClock>,
    pub backend: LruBackend,
    pub transport: CacheTransport<LruBackend>,
    pub origin: Origin,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let clock = Arc::new(ManualClock::new(start()));
        let backend = LruBackend::new(64);
        let transport = CacheTransport::builder()
            .backend(backend.clone())
            .clock(clock.clone())
            .config(config)
            .build();
        Self {
            clock,
            backend,
            transport,
            origin: Origin::new(),
        }
    }

    pub fn date(&self) -> String {
        format_http_date(stashbox::Clock::now(self.clock.as_ref()))
    }

    pub async fn send(&self, request: Request<()>) -> Response<CacheBody<Full<Bytes>>> {
        self.transport
            .dispatch(request, self.origin.clone())
            .await
            .expect("origin error")
    }

    /// Sends the request and reads the whole body.
    pub async fn fetch(&self, request: Request<()>) -> (Response<()>, Bytes) {
        let response = self.send(request).await;
        let (parts, body) = response.into_parts();
        let body = body.collect().await.unwrap().to_bytes();
        (Response::from_parts(parts, ()), body)
    }
}

pub fn get() -> Request<()> {
    request(Method::GET, &[])
}

pub fn request(method: Method, headers: &[(&str, &str)]) -> Request<()> {
    let mut builder = Request::builder().method(method).uri(URL);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(()).unwrap()
}

pub fn response(
    status: u16,
    headers: &[(&str, &str)],
    body: &'static str,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder().status(StatusCode::from_u16(status).unwrap());
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Full::new(Bytes::from_static(body.as_bytes()))).unwrap()
}

/// A response fresh for an hour from `date`.
pub fn cacheable_response(status: u16, date: &str, body: &'static str) -> Response<Full<Bytes>> {
    response(
        status,
        &[("cache-control", "max-age=3600"), ("date", date)],
        body,
    )
}

pub fn is_cached(response: &Response<impl Sized>) -> bool {
    response.headers().get("x-from-cache").is_some()
}
