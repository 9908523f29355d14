// ── Pass identity and record types ──
//
// PassToken is the externally-shared identifier embedded in the QR code
// and verification URL. It is generated separately from the store's
// primary key: knowledge of the token is what grants verification
// access, so the row id never leaves the backend.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── PassToken ───────────────────────────────────────────────────────

/// Unguessable pass identifier (128-bit random, canonical string form).
///
/// One token per issued pass, never reused -- even after the pass record
/// is deleted. Uniqueness is probabilistic; no store lookup is performed
/// before insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassToken(Uuid);

impl PassToken {
    /// Generate a fresh random token.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PassToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PassToken {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for PassToken {
    fn from(u: Uuid) -> Self {
        Self(u)
    }
}

// ── VehicleType ─────────────────────────────────────────────────────

/// Vehicle category declared at issuance.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VehicleType {
    Car,
    Motorcycle,
    Van,
    Truck,
    Other,
}

// ── PassRecord ──────────────────────────────────────────────────────

/// One issued invitation, as stored in the `visitor_passes` table.
///
/// Created once by the host, read-only thereafter; revocation is a hard
/// delete. There is no "used" flag -- a pass stays scannable for the
/// whole of its scheduled day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassRecord {
    /// Store-assigned primary id. Never embedded in QR codes.
    pub id: Uuid,
    /// The scannable identifier shared with the visitor.
    pub pass_token: PassToken,
    pub host_id: Uuid,
    pub host_name: String,
    pub visitor_name: String,
    pub visitor_phone: String,
    pub vehicle_plate: String,
    pub vehicle_type: VehicleType,
    /// Calendar day the visit is authorized for. Day granularity only.
    pub scheduled_date: NaiveDate,
    pub reason: String,
    /// Store-assigned creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload for a new pass: everything except the store-assigned
/// columns. The token is always present -- a record is never persisted
/// without one.
#[derive(Debug, Clone, Serialize)]
pub struct NewPassRecord {
    pub pass_token: PassToken,
    pub host_id: Uuid,
    pub host_name: String,
    pub visitor_name: String,
    pub visitor_phone: String,
    pub vehicle_plate: String,
    pub vehicle_type: VehicleType,
    pub scheduled_date: NaiveDate,
    pub reason: String,
}

/// Visitor-entered fields of a new pass, before host identity and token
/// are attached by the issuance flow.
#[derive(Debug, Clone)]
pub struct PassDraft {
    pub visitor_name: String,
    pub visitor_phone: String,
    pub vehicle_plate: String,
    pub vehicle_type: VehicleType,
    pub scheduled_date: NaiveDate,
    pub reason: String,
}

// ── Host types ──────────────────────────────────────────────────────

/// Resident profile row from the `profiles` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostProfile {
    pub id: Uuid,
    pub full_name: String,
    pub address: Option<String>,
}

/// The currently signed-in resident, as exposed by the session provider.
#[derive(Debug, Clone)]
pub struct HostIdentity {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
}

impl From<HostProfile> for HostIdentity {
    fn from(p: HostProfile) -> Self {
        Self {
            id: p.id,
            name: p.full_name,
            address: p.address,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn token_display_round_trips() {
        let token = PassToken::generate();
        let parsed: PassToken = token.to_string().parse().unwrap();
        assert_eq!(parsed, token);
    }

    #[test]
    fn token_rejects_garbage() {
        assert!("not-a-token".parse::<PassToken>().is_err());
    }

    #[test]
    fn token_serde_is_transparent() {
        let token = PassToken::generate();
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, format!("\"{token}\""));
    }

    #[test]
    fn generated_tokens_are_distinct() {
        // 128-bit random space: any collision here is a generator bug.
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(PassToken::generate()));
        }
    }

    #[test]
    fn vehicle_type_round_trips_lowercase() {
        let t: VehicleType = "motorcycle".parse().unwrap();
        assert_eq!(t, VehicleType::Motorcycle);
        assert_eq!(t.to_string(), "motorcycle");
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"motorcycle\"");
    }
}
