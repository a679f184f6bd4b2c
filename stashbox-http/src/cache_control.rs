//! `Cache-Control` directive parsing.

use std::collections::HashMap;

use chrono::TimeDelta;
use http::{HeaderMap, header};

/// Directive names understood by the cache.
pub mod directive {
    pub const NO_CACHE: &str = "no-cache";
    pub const NO_STORE: &str = "no-store";
    pub const ONLY_IF_CACHED: &str = "only-if-cached";
    pub const MAX_AGE: &str = "max-age";
    pub const MIN_FRESH: &str = "min-fresh";
    pub const MAX_STALE: &str = "max-stale";
}

/// Parsed `Cache-Control` directives.
///
/// Directive names are case-sensitive. Valueless directives such as
/// `no-cache` map to an empty string, and when a name repeats the last
/// occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheControl {
    directives: HashMap<String, String>,
}

impl CacheControl {
    /// Parses a single header value.
    ///
    /// The value is split on `,`, each token trimmed of surrounding
    /// whitespace and split on its first `=` into name and value. Empty
    /// tokens are skipped.
    pub fn parse(value: &str) -> Self {
        let directives = value
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| match token.split_once('=') {
                Some((name, value)) => (name.trim().to_owned(), value.trim().to_owned()),
                None => (token.to_owned(), String::new()),
            })
            .collect();
        Self { directives }
    }

    /// Parses every `Cache-Control` line in `headers`.
    ///
    /// Multiple lines are treated as one comma-joined list. Values that are
    /// not valid UTF-8 are ignored.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let joined = headers
            .get_all(header::CACHE_CONTROL)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect::<Vec<_>>()
            .join(",");
        Self::parse(&joined)
    }

    /// Returns `true` if the directive is present, with or without a value.
    pub fn contains(&self, name: &str) -> bool {
        self.directives.contains_key(name)
    }

    /// Returns the raw value of a directive, empty for valueless ones.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.directives.get(name).map(String::as_str)
    }

    /// Number of distinct directives.
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.directives
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// Parses a delta-seconds directive value.
///
/// Returns `None` when the value is not an integer or does not fit a
/// [`TimeDelta`].
pub(crate) fn parse_seconds(value: &str) -> Option<TimeDelta> {
    value.parse::<i64>().ok().and_then(TimeDelta::try_seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_directives() {
        let cc = CacheControl::parse("max-age=3600, no-cache ,  private");
        assert_eq!(cc.len(), 3);
        assert_eq!(cc.get("max-age"), Some("3600"));
        assert_eq!(cc.get("no-cache"), Some(""));
        assert!(cc.contains("private"));
        assert!(!cc.contains("public"));
    }

    #[test]
    fn test_parse_skips_empty_tokens() {
        let cc = CacheControl::parse(",, no-store ,,");
        assert_eq!(cc.len(), 1);
        assert!(cc.contains("no-store"));
        assert!(CacheControl::parse("").is_empty());
    }

    #[test]
    fn test_value_splits_on_first_equals() {
        let cc = CacheControl::parse("ext=a=b");
        assert_eq!(cc.get("ext"), Some("a=b"));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let cc = CacheControl::parse("No-Cache");
        assert!(!cc.contains("no-cache"));
        assert!(cc.contains("No-Cache"));
    }

    #[test]
    fn test_multiple_header_lines_are_joined() {
        let mut headers = HeaderMap::new();
        headers.append(header::CACHE_CONTROL, HeaderValue::from_static("max-age=60"));
        headers.append(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
        let cc = CacheControl::from_headers(&headers);
        assert_eq!(cc.get("max-age"), Some("60"));
        assert!(cc.contains("no-store"));
    }

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_seconds("90"), Some(TimeDelta::seconds(90)));
        assert_eq!(parse_seconds("-5"), Some(TimeDelta::seconds(-5)));
        assert_eq!(parse_seconds("soon"), None);
        assert_eq!(parse_seconds(""), None);
    }
}
