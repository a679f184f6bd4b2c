use std::future::Future;

/// Network leg of the cache: sends a request and yields the origin's answer.
///
/// The cache calls it at most once per dispatched request. Errors are
/// carried inside [`Response`](Upstream::Response) and handed back to the
/// caller untouched.
///
/// # Examples
///
/// ```
/// use std::future::Ready;
/// use stashbox::Upstream;
///
/// struct Echo;
///
/// impl Upstream<http::Request<String>> for Echo {
///     type Response = Result<http::Response<String>, std::convert::Infallible>;
///     type Future = Ready<Self::Response>;
///
///     fn call(&mut self, req: http::Request<String>) -> Self::Future {
///         std::future::ready(Ok(http::Response::new(req.into_body())))
///     }
/// }
/// ```
pub trait Upstream<Req> {
    /// The response type returned by the upstream service
    type Response;

    /// The future that resolves to the response
    type Future: Future<Output = Self::Response> + Send;

    /// Call the upstream service with the given request
    fn call(&mut self, req: Req) -> Self::Future;
}
