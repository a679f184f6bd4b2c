use thiserror::Error;

/// Invalid cache configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The cache-hit marker is not a valid header name.
    #[error("invalid cache hit header name {name:?}")]
    InvalidHeaderName {
        /// The rejected name.
        name: String,
        #[source]
        source: http::header::InvalidHeaderName,
    },
}
