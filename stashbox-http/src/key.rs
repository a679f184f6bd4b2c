use http::{Method, Request, header};
use stashbox_backend::CacheKey;

/// Derives the store key for a request.
///
/// `GET` requests are keyed by their full URL alone. Every other method is
/// keyed as `"<METHOD> <URL>"`, which keeps a stored `HEAD` response from
/// ever answering a `GET` for the same URL.
pub fn cache_key<B>(request: &Request<B>) -> CacheKey {
    if request.method() == Method::GET {
        CacheKey::new(request.uri().to_string())
    } else {
        CacheKey::new(format!("{} {}", request.method(), request.uri()))
    }
}

/// Returns `true` if the cache may answer this request at all.
///
/// Only `GET` and `HEAD` requests without a `Range` header are considered.
pub fn is_cacheable_request<B>(request: &Request<B>) -> bool {
    matches!(*request.method(), Method::GET | Method::HEAD)
        && !request.headers().contains_key(header::RANGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: Method, uri: &str) -> Request<()> {
        Request::builder().method(method).uri(uri).body(()).unwrap()
    }

    #[test]
    fn test_get_key_is_url() {
        let key = cache_key(&request(Method::GET, "http://example.com/path?q=1"));
        assert_eq!(key.as_str(), "http://example.com/path?q=1");
    }

    #[test]
    fn test_other_methods_prefix_method() {
        let key = cache_key(&request(Method::HEAD, "http://example.com/"));
        assert_eq!(key.as_str(), "HEAD http://example.com/");

        let key = cache_key(&request(Method::POST, "http://example.com/"));
        assert_eq!(key.as_str(), "POST http://example.com/");
    }

    #[test]
    fn test_cacheable_request() {
        assert!(is_cacheable_request(&request(Method::GET, "http://example.com/")));
        assert!(is_cacheable_request(&request(Method::HEAD, "http://example.com/")));
        assert!(!is_cacheable_request(&request(Method::POST, "http://example.com/")));
        assert!(!is_cacheable_request(&request(Method::PUT, "http://example.com/")));

        let ranged = Request::builder()
            .uri("http://example.com/")
            .header(header::RANGE, "bytes=0-9")
            .body(())
            .unwrap();
        assert!(!is_cacheable_request(&ranged));
    }
}
