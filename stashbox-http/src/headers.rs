//! Hop-by-hop and end-to-end header handling.

use std::collections::HashSet;

use http::header::{self, HeaderMap, HeaderName};

/// Headers that only apply to a single transport-level connection.
pub const HOP_BY_HOP_HEADERS: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    HeaderName::from_static("trailers"),
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Returns the hop-by-hop header names for a message: the fixed set plus
/// every name listed in its `Connection` header.
pub fn hop_by_hop_headers(headers: &HeaderMap) -> HashSet<HeaderName> {
    let mut names: HashSet<HeaderName> = HOP_BY_HOP_HEADERS.iter().cloned().collect();
    let listed = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| HeaderName::from_bytes(token.as_bytes()).ok());
    names.extend(listed);
    names
}

/// Names of the headers present in `headers` that are not hop-by-hop.
pub fn end_to_end_headers(headers: &HeaderMap) -> Vec<HeaderName> {
    let hop_by_hop = hop_by_hop_headers(headers);
    headers
        .keys()
        .filter(|name| !hop_by_hop.contains(*name))
        .cloned()
        .collect()
}

/// Copies every end-to-end header of `update` into `stored`.
///
/// Each copied name fully replaces the stored values, keeping all values
/// `update` carries for it. Headers `update` does not mention are left as
/// they were.
pub fn merge_end_to_end(stored: &mut HeaderMap, update: &HeaderMap) {
    for name in end_to_end_headers(update) {
        stored.remove(&name);
        for value in update.get_all(&name) {
            stored.append(name.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_fixed_hop_by_hop_excluded() {
        let end_to_end = end_to_end_headers(&headers(&[
            ("content-type", "text/html"),
            ("te", "deflate"),
        ]));
        assert_eq!(end_to_end, vec![header::CONTENT_TYPE]);
    }

    #[test]
    fn test_connection_listed_headers_excluded() {
        let end_to_end = end_to_end_headers(&headers(&[
            ("connection", "content-type"),
            ("content-type", "text/csv"),
            ("te", "deflate"),
        ]));
        assert!(end_to_end.is_empty());
    }

    #[test]
    fn test_connection_tokens_are_normalized() {
        let end_to_end = end_to_end_headers(&headers(&[
            ("connection", " X-Internal , , close"),
            ("x-internal", "1"),
            ("etag", "\"v1\""),
        ]));
        assert_eq!(end_to_end, vec![header::ETAG]);
    }

    #[test]
    fn test_empty_headers() {
        assert!(end_to_end_headers(&HeaderMap::new()).is_empty());
        assert!(end_to_end_headers(&headers(&[("connection", "content-type")])).is_empty());
    }

    #[test]
    fn test_merge_replaces_and_keeps_others() {
        let mut stored = headers(&[
            ("content-type", "text/plain"),
            ("x-stored", "kept"),
            ("vary", "accept"),
            ("vary", "accept-encoding"),
        ]);
        let update = headers(&[
            ("vary", "origin"),
            ("x-validated", "a"),
            ("x-validated", "b"),
            ("transfer-encoding", "chunked"),
        ]);

        merge_end_to_end(&mut stored, &update);

        assert_eq!(stored.get("content-type").unwrap(), "text/plain");
        assert_eq!(stored.get("x-stored").unwrap(), "kept");
        let vary: Vec<_> = stored.get_all("vary").iter().collect();
        assert_eq!(vary, vec!["origin"]);
        let validated: Vec<_> = stored.get_all("x-validated").iter().collect();
        assert_eq!(validated, vec!["a", "b"]);
        assert!(!stored.contains_key("transfer-encoding"));
    }
}
