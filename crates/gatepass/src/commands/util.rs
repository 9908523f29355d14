//! Shared helpers for command handlers.

use chrono::NaiveDate;

use gatepass_core::{PassToken, extract_token};

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Refuses to proceed when stdin is not a terminal; scripts must pass
/// `--yes` explicitly.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.to_owned(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Parse a `--date` flag as YYYY-MM-DD.
pub fn parse_date(raw: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| CliError::Validation {
        field: "date".into(),
        reason: format!("expected YYYY-MM-DD, got '{raw}'"),
    })
}

/// Parse token-bearing input (URL, legacy label, or bare token) into a
/// token, with a usage error when nothing token-shaped is present.
pub fn parse_token(input: &str) -> Result<PassToken, CliError> {
    extract_token(input).ok_or_else(|| CliError::Validation {
        field: "token".into(),
        reason: format!("'{input}' is not a pass token or verification URL"),
    })
}

/// Parse a `--vehicle` flag against the known vehicle types.
pub fn parse_vehicle(raw: &str) -> Result<gatepass_core::VehicleType, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: "vehicle".into(),
        reason: format!(
            "expected one of {}, got '{raw}'",
            <gatepass_core::VehicleType as strum::VariantNames>::VARIANTS.join(", ")
        ),
    })
}
