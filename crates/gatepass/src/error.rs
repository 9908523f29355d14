//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use gatepass_config::ConfigError;
use gatepass_core::CoreError;

/// Exit codes for process termination.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the record store")]
    #[diagnostic(
        code(gatepass::store_unreachable),
        help(
            "Check your network connection and the store_url in your profile.\n\
             Reason: {reason}"
        )
    )]
    StoreUnreachable { reason: String },

    #[error("Record store request timed out after {seconds}s")]
    #[diagnostic(
        code(gatepass::timeout),
        help("Increase the profile's timeout or check store responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Credentials ──────────────────────────────────────────────────
    #[error("No service key configured for profile '{profile}'")]
    #[diagnostic(
        code(gatepass::no_credentials),
        help(
            "Store the key with: gatepass config set-key --profile {profile}\n\
             Or set the env var named by service_key_env in the profile."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(gatepass::not_found),
        help("Run: gatepass {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Store API error ({code}): {message}")]
    #[diagnostic(code(gatepass::api_error))]
    ApiError { code: String, message: String },

    // ── Encoding / imaging ───────────────────────────────────────────
    #[error("QR encoding failed: {message}")]
    #[diagnostic(code(gatepass::encode))]
    Encode { message: String },

    #[error("No usable font for card composition")]
    #[diagnostic(
        code(gatepass::font_unavailable),
        help(
            "Set font_path in your profile to a TTF/OTF file.\n\
             Reason: {reason}"
        )
    )]
    FontUnavailable { reason: String },

    #[error("Image error: {0}")]
    #[diagnostic(code(gatepass::image))]
    Image(#[from] image::ImageError),

    #[error("No QR code found in {frames} frame(s)")]
    #[diagnostic(
        code(gatepass::no_code),
        help("Capture sharper frames or move the code closer to the camera.")
    )]
    NoCodeDetected { frames: usize },

    #[error("Camera unavailable: {message}")]
    #[diagnostic(code(gatepass::camera))]
    Camera { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(gatepass::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(gatepass::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: gatepass config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file problem")]
    #[diagnostic(code(gatepass::config), help("{message}"))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(gatepass::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::StoreUnreachable { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::NoCodeDetected { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::StoreUnavailable { reason } => CliError::StoreUnreachable { reason },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::PassNotFound { identifier } => CliError::NotFound {
                resource_type: "pass".into(),
                identifier,
                list_command: "passes list".into(),
            },

            CoreError::Api { message, code, .. } => CliError::ApiError {
                code: code.unwrap_or_default(),
                message,
            },

            CoreError::Encode { message } => CliError::Encode { message },

            CoreError::FontUnavailable { message } => CliError::FontUnavailable {
                reason: message,
            },

            CoreError::Image(e) => CliError::Image(e),

            CoreError::Camera { message } => CliError::Camera { message },

            CoreError::Config { message } => CliError::Config { message },

            CoreError::Internal(message) => CliError::ApiError {
                code: "internal".into(),
                message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },

            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },

            ConfigError::UnknownProfile { profile } => CliError::ProfileNotFound {
                name: profile,
                available: String::new(),
            },

            ConfigError::Serialization(e) => CliError::Config {
                message: e.to_string(),
            },

            ConfigError::Figment(e) => CliError::Config {
                message: e.to_string(),
            },

            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
