//! OIDC client error types.

/// Errors from identity provider calls.
#[derive(Debug, thiserror::Error)]
pub enum OidcError {
    /// The credential was rejected or does not identify a race committee.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The provider returned a non-2xx status.
    #[error("identity provider {endpoint} returned {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}
