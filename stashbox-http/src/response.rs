use bytes::Bytes;
use http::response::Parts;
use http::{HeaderMap, Response, StatusCode, Version};
use serde::{Deserialize, Serialize};

use crate::body::CacheBody;

/// Statuses whose responses may be stored.
const CACHEABLE_STATUSES: [StatusCode; 7] = [
    StatusCode::OK,
    StatusCode::NON_AUTHORITATIVE_INFORMATION,
    StatusCode::NO_CONTENT,
    StatusCode::MULTIPLE_CHOICES,
    StatusCode::MOVED_PERMANENTLY,
    StatusCode::NOT_FOUND,
    StatusCode::GONE,
];

/// Returns `true` if a response with this status may be stored.
pub fn is_cacheable_status(status: StatusCode) -> bool {
    CACHEABLE_STATUSES.contains(&status)
}

/// A stored HTTP response: status, version, headers and the complete body.
///
/// Bodies of `HEAD` responses and of responses persisted before their body
/// was read are stored empty.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SerializableHttpResponse {
    #[serde(with = "http_serde::status_code")]
    status: StatusCode,
    #[serde(with = "http_serde::version")]
    version: Version,
    #[serde(with = "http_serde::header_map")]
    headers: HeaderMap,
    body: Bytes,
}

impl SerializableHttpResponse {
    pub fn new(status: StatusCode, version: Version, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            version,
            headers,
            body,
        }
    }

    /// Captures the head of a live response together with a body.
    pub fn from_parts(parts: &Parts, body: Bytes) -> Self {
        Self::new(parts.status, parts.version, parts.headers.clone(), body)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Turns the stored response back into a live one.
    pub fn into_response<B>(self) -> Response<CacheBody<B>> {
        let mut response = Response::new(CacheBody::Complete(Some(self.body)));
        *response.status_mut() = self.status;
        *response.version_mut() = self.version;
        *response.headers_mut() = self.headers;
        response
    }
}

/// The `504 Gateway Timeout` answer to an `only-if-cached` miss.
pub fn gateway_timeout<B>() -> Response<CacheBody<B>> {
    let mut response = Response::new(CacheBody::Complete(None));
    *response.status_mut() = StatusCode::GATEWAY_TIMEOUT;
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use http_body_util::{BodyExt, Empty};

    #[test]
    fn test_cacheable_statuses() {
        for code in [200, 203, 204, 300, 301, 404, 410] {
            assert!(is_cacheable_status(StatusCode::from_u16(code).unwrap()), "{code}");
        }
        for code in [201, 206, 302, 304, 307, 400, 500, 502] {
            assert!(!is_cacheable_status(StatusCode::from_u16(code).unwrap()), "{code}");
        }
    }

    #[tokio::test]
    async fn test_into_response_restores_message() {
        let mut headers = HeaderMap::new();
        headers.insert("etag", HeaderValue::from_static("\"v1\""));
        let stored = SerializableHttpResponse::new(
            StatusCode::NOT_FOUND,
            Version::HTTP_11,
            headers,
            Bytes::from_static(b"missing"),
        );

        let response = stored.into_response::<Empty<Bytes>>();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers().get("etag").unwrap(), "\"v1\"");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from_static(b"missing"));
    }

    #[tokio::test]
    async fn test_gateway_timeout_is_empty() {
        let response = gateway_timeout::<Empty<Bytes>>();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }
}
