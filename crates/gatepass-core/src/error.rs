// ── Core error types ──
//
// User-facing errors from gatepass-core. These are NOT wire-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<gatepass_store::Error>` impl translates transport-layer
// errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Store errors ─────────────────────────────────────────────────
    #[error("Record store unreachable: {reason}")]
    StoreUnavailable { reason: String },

    #[error("Record store timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Pass not found: {identifier}")]
    PassNotFound { identifier: String },

    #[error("Store API error: {message}")]
    Api {
        message: String,
        /// The store-specific error code (e.g., "23505" for unique violations).
        code: Option<String>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Encoding errors ──────────────────────────────────────────────
    #[error("QR encoding failed: {message}")]
    Encode { message: String },

    #[error("Font unavailable: {message}")]
    FontUnavailable { message: String },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    // ── Device errors ────────────────────────────────────────────────
    #[error("Camera unavailable: {message}")]
    Camera { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<gatepass_store::Error> for CoreError {
    fn from(err: gatepass_store::Error) -> Self {
        match err {
            gatepass_store::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else {
                    CoreError::StoreUnavailable {
                        reason: e.to_string(),
                    }
                }
            }
            gatepass_store::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid store URL: {e}"),
            },
            gatepass_store::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            gatepass_store::Error::RowNotFound { table, filter } => CoreError::PassNotFound {
                identifier: format!("{table}: {filter}"),
            },
            gatepass_store::Error::EmptyInsert { table } => {
                CoreError::Internal(format!("insert into '{table}' returned no row"))
            }
            gatepass_store::Error::Api {
                message,
                code,
                status,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            gatepass_store::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
