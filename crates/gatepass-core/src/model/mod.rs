// ── Unified domain model ──
//
// Canonical representation of every visitor-pass entity. Serde field
// names match the record-store columns, so these types serialize
// directly onto the wire.

pub mod outcome;
pub mod pass;

// ── Re-exports ──────────────────────────────────────────────────────
// Flat access: `use gatepass_core::model::*` gives you everything.

pub use outcome::{PassStatus, VerificationOutcome};
pub use pass::{
    HostIdentity, HostProfile, NewPassRecord, PassDraft, PassRecord, PassToken, VehicleType,
};
