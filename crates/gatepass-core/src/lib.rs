// gatepass-core: visitor-pass domain logic between gatepass-store and consumers.
//
// Everything a front end needs to issue, encode, scan, and verify passes
// lives here. The record store is consumed through the `PassStore` trait;
// presentation layers only ever see `VerificationOutcome`, never raw store
// or decode failures.

pub mod card;
pub mod directory;
pub mod encode;
pub mod error;
pub mod link;
pub mod model;
pub mod scan;
pub mod store;
pub mod verify;

// ── Primary re-exports ──────────────────────────────────────────────
pub use directory::PassDirectory;
pub use error::CoreError;
pub use link::{LinkConfig, extract_token, verification_url};
pub use scan::{Frame, FrameSource, ScanOutcome, ScanSession, ScanState};
pub use store::{MemoryStore, PassStore, RemoteSession, RemoteStore, SessionProvider};
pub use verify::{KnowledgeOfToken, TokenAuthorizer, Verifier, classify};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    HostIdentity, HostProfile, NewPassRecord, PassDraft, PassRecord, PassStatus, PassToken,
    VehicleType, VerificationOutcome,
};
