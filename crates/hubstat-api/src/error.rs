use thiserror::Error;

/// Top-level error type for the `hubstat-api` crate.
///
/// Covers every failure mode of a single upstream call: transport,
/// authentication, rate limiting, API-level rejections, and payload
/// decoding. `hubstat-core` wraps these with per-repository context.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Authentication / rate limiting ──────────────────────────────
    /// Token rejected by GitHub (401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Primary rate limit exhausted (403/429 with `x-ratelimit-remaining: 0`).
    #[error("Rate limited -- limit resets at unix time {reset}")]
    RateLimited { reset: u64 },

    // ── API ─────────────────────────────────────────────────────────
    /// Any other non-success status, with GitHub's error message when parseable.
    #[error("GitHub API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying on a
    /// later scrape.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::RateLimited { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}
