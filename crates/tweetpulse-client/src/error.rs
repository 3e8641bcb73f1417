use thiserror::Error;

/// Errors returned by the upstream API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The credential handshake was rejected. Fatal: nothing downstream runs.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Network or TLS failure from the underlying HTTP client.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service signalled a rate limit (HTTP 420 or 429).
    #[error("rate limited by the upstream API (status {status})")]
    RateLimited { status: u16 },

    /// The service returned a non-2xx status that is not a rate limit.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// True for the service's rate-limit markers, which end a stream session.
    #[must_use]
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, ClientError::RateLimited { .. })
    }
}
