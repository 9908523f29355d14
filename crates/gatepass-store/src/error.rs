use thiserror::Error;

/// Top-level error type for the `gatepass-store` crate.
///
/// Covers every failure mode of the record-store REST surface.
/// `gatepass-core` maps these into domain-appropriate variants --
/// consumers never see raw HTTP or JSON failures.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Store API ───────────────────────────────────────────────────
    /// Structured error from the store API (non-2xx with an error body).
    #[error("Store API error (HTTP {status}): {message}")]
    Api {
        message: String,
        code: Option<String>,
        status: u16,
    },

    /// A filtered single-row query matched nothing.
    #[error("No row in '{table}' matching {filter}")]
    RowNotFound { table: String, filter: String },

    /// An insert with `return=representation` came back empty.
    #[error("Insert into '{table}' returned no representation")]
    EmptyInsert { table: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::RowNotFound { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a transient error worth a manual retry.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }
}
