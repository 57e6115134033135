//! Error types for repository tree sources.

/// Error from repository tree source operations.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// API rate limit exhausted.
    #[error("rate limit exceeded{}", .reset.map(|r| format!(" (resets at {r})")).unwrap_or_default())]
    RateLimited {
        /// Unix timestamp at which the limit resets, when reported.
        reset: Option<u64>,
    },

    /// JSON deserialization error.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
}

impl SourceError {
    /// Whether repeating the same request later may succeed.
    ///
    /// Transport failures, rate limiting, and server-side (5xx) errors are
    /// retryable. Client errors and undecodable responses are not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::HttpRequest(_) | Self::RateLimited { .. } => true,
            Self::HttpResponse { status, .. } => *status >= 500,
            Self::Json(_) => false,
        }
    }
}
