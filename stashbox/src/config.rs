//! Cache configuration.
//!
//! [`Config`] holds the plain settings of a cache and can be deserialized
//! from any serde format:
//!
//! ```yaml
//! mark_cached_responses: true
//! cache_hit_header: x-from-cache
//! ```
//!
//! Collaborators that cannot be deserialized (the store, the clock, the value
//! format) are passed to [`CacheTransport::builder`](crate::CacheTransport::builder).

use http::HeaderName;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default name of the cache-hit marker header.
pub const DEFAULT_CACHE_HIT_HEADER: &str = "x-from-cache";

/// Settings of a cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ConfigRepr", into = "ConfigRepr")]
pub struct Config {
    mark_cached_responses: bool,
    cache_hit_header: HeaderName,
}

impl Config {
    /// Creates a new [`ConfigBuilder`].
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Whether responses answered from the store carry the marker header.
    pub fn mark_cached_responses(&self) -> bool {
        self.mark_cached_responses
    }

    /// Name of the marker header.
    pub fn cache_hit_header(&self) -> &HeaderName {
        &self.cache_hit_header
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mark_cached_responses: true,
            cache_hit_header: HeaderName::from_static(DEFAULT_CACHE_HIT_HEADER),
        }
    }
}

/// Builder for [`Config`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Turns the cache-hit marker on or off.
    pub fn mark_cached_responses(mut self, mark: bool) -> Self {
        self.config.mark_cached_responses = mark;
        self
    }

    /// Sets the name of the cache-hit marker header.
    pub fn cache_hit_header(mut self, name: HeaderName) -> Self {
        self.config.cache_hit_header = name;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigRepr {
    #[serde(default = "default_mark_cached_responses")]
    mark_cached_responses: bool,
    #[serde(default = "default_cache_hit_header")]
    cache_hit_header: String,
}

fn default_mark_cached_responses() -> bool {
    true
}

fn default_cache_hit_header() -> String {
    DEFAULT_CACHE_HIT_HEADER.to_owned()
}

impl TryFrom<ConfigRepr> for Config {
    type Error = ConfigError;

    fn try_from(repr: ConfigRepr) -> Result<Self, Self::Error> {
        let cache_hit_header = HeaderName::from_bytes(repr.cache_hit_header.as_bytes())
            .map_err(|source| ConfigError::InvalidHeaderName {
                name: repr.cache_hit_header.clone(),
                source,
            })?;
        Ok(Config {
            mark_cached_responses: repr.mark_cached_responses,
            cache_hit_header,
        })
    }
}

impl From<Config> for ConfigRepr {
    fn from(config: Config) -> Self {
        ConfigRepr {
            mark_cached_responses: config.mark_cached_responses,
            cache_hit_header: config.cache_hit_header.as_str().to_owned(),
        }
    }
}
