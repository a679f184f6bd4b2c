use http::HeaderName;
use pretty_assertions::assert_eq;
use stashbox::{CacheStatus, Config, ConfigError};

#[test]
fn test_defaults() {
    let config = Config::default();
    assert!(config.mark_cached_responses());
    assert_eq!(config.cache_hit_header().as_str(), "x-from-cache");
}

#[test]
fn test_yaml_with_defaults() {
    let config: Config = serde_saphyr::from_str("{}").expect("failed to deserialize");
    assert_eq!(config, Config::default());
}

#[test]
fn test_yaml_overrides() {
    let yaml = r#"
mark_cached_responses: false
cache_hit_header: X-Cache-Hit
"#;
    let config: Config = serde_saphyr::from_str(yaml).expect("failed to deserialize");
    assert!(!config.mark_cached_responses());
    assert_eq!(config.cache_hit_header(), &HeaderName::from_static("x-cache-hit"));
}

#[test]
fn test_yaml_roundtrip() {
    let config = Config::builder()
        .mark_cached_responses(false)
        .cache_hit_header(HeaderName::from_static("x-stash"))
        .build();

    let yaml = serde_saphyr::to_string(&config).expect("failed to serialize");
    let deserialized: Config = serde_saphyr::from_str(&yaml).expect("failed to deserialize");

    assert_eq!(deserialized, config);
}

#[test]
fn test_invalid_header_name_rejected() {
    let result: Result<Config, _> =
        serde_json::from_str(r#"{"cache_hit_header": "not a header"}"#);
    let error = result.unwrap_err().to_string();
    assert!(error.contains("not a header"), "{error}");
}

#[test]
fn test_unknown_fields_rejected() {
    let result: Result<Config, _> = serde_json::from_str(r#"{"ttl": 10}"#);
    assert!(result.is_err());
}

#[test]
fn test_config_error_display() {
    let source = HeaderName::from_bytes(b"bad header").unwrap_err();
    let error = ConfigError::InvalidHeaderName {
        name: "bad header".into(),
        source,
    };
    assert_eq!(error.to_string(), "invalid cache hit header name \"bad header\"");
}

#[test]
fn test_cache_status() {
    assert_eq!(CacheStatus::default(), CacheStatus::Miss);
    assert_eq!(CacheStatus::Revalidated.to_string(), "revalidated");
    assert!(CacheStatus::Hit.is_from_cache());
    assert!(CacheStatus::Revalidated.is_from_cache());
    assert!(!CacheStatus::Bypass.is_from_cache());
}
