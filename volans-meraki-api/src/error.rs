use thiserror::Error;

/// Top-level error type for the `volans-meraki-api` crate.
///
/// Covers every failure mode of a dashboard call: transport, URL
/// handling, structured API errors, rate limiting, and response
/// decoding. The provider maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Invalid API key (not representable as a header value).
    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    // ── Dashboard ───────────────────────────────────────────────────
    /// Structured error from the dashboard (parsed from the
    /// `{"errors": [...]}` envelope when present).
    #[error("Dashboard API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the dashboard. Includes Retry-After in seconds.
    ///
    /// The client never retries; callers that want to wait can.
    #[error("Rate limited -- retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a "not found" error.
    ///
    /// The provider turns these into `State::not_found` (drift), not
    /// into diagnostics.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a transient error a caller could retry.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::RateLimited { .. } => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_404_is_not_found() {
        let err = Error::Api {
            status: 404,
            message: "Network not found".to_string(),
        };
        assert!(err.is_not_found());
    }

    #[test]
    fn api_400_is_not_not_found() {
        let err = Error::Api {
            status: 400,
            message: "Bad request".to_string(),
        };
        assert!(!err.is_not_found());
        assert!(!err.is_transient());
    }

    #[test]
    fn rate_limit_is_transient() {
        let err = Error::RateLimited {
            retry_after_secs: 2,
        };
        assert!(err.is_transient());
    }
}
