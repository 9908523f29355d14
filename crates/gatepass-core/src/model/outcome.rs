// ── Verification outcome types ──

use serde::Serialize;

use super::pass::PassRecord;

/// Lifecycle classification of a scanned pass, relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
pub enum PassStatus {
    /// Scheduled for today -- access granted.
    Valid,
    /// Scheduled for a day that has not arrived yet.
    FutureDated,
    /// Scheduled day has passed.
    Expired,
    /// Unparseable input, unknown token, or store failure.
    Invalid,
}

/// Result of one verification attempt. Ephemeral -- computed fresh on
/// every resolution, never persisted or cached.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationOutcome {
    pub status: PassStatus,
    /// The resolved record. Present for every status except
    /// `Invalid`-not-found.
    pub record: Option<PassRecord>,
    /// Host address joined from the profile table (best-effort).
    pub host_address: Option<String>,
    /// Human-readable explanation for non-Valid states.
    pub message: Option<String>,
}

impl VerificationOutcome {
    pub fn valid(record: PassRecord, host_address: Option<String>) -> Self {
        Self {
            status: PassStatus::Valid,
            record: Some(record),
            host_address,
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            status: PassStatus::Invalid,
            record: None,
            host_address: None,
            message: Some(message.into()),
        }
    }
}
