// ── Record store collaborator contract ──
//
// The core consumes durable storage through `PassStore`; it never
// implements storage itself. `RemoteStore` adapts the HTTP client from
// gatepass-store, `MemoryStore` backs tests and offline tooling.

mod memory;
mod remote;

pub use memory::MemoryStore;
pub use remote::{RemoteSession, RemoteStore};

use uuid::Uuid;

use crate::model::{HostProfile, HostIdentity, NewPassRecord, PassRecord, PassToken};

/// Table-oriented storage for pass records and host profiles.
///
/// `pass_by_token` distinguishes "no such row" (`Ok(None)`) from a store
/// failure (`Err`) so the resolver can word its outcome accordingly.
pub trait PassStore: Send + Sync {
    /// Insert a new pass and return the stored record (with id and
    /// created_at assigned by the store).
    fn insert_pass(
        &self,
        row: &NewPassRecord,
    ) -> impl Future<Output = Result<PassRecord, gatepass_store::Error>> + Send;

    /// Look up a pass by its shared token.
    fn pass_by_token(
        &self,
        token: &PassToken,
    ) -> impl Future<Output = Result<Option<PassRecord>, gatepass_store::Error>> + Send;

    /// All passes issued by a host, newest scheduled date first.
    fn passes_for_host(
        &self,
        host_id: Uuid,
    ) -> impl Future<Output = Result<Vec<PassRecord>, gatepass_store::Error>> + Send;

    /// Hard-delete a pass by primary id (revocation).
    fn delete_pass(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<(), gatepass_store::Error>> + Send;

    /// Look up a host profile for the verification-time address join.
    fn host_profile(
        &self,
        host_id: Uuid,
    ) -> impl Future<Output = Result<Option<HostProfile>, gatepass_store::Error>> + Send;
}

// Directory and verifier can share one store through an Arc.
impl<S: PassStore> PassStore for std::sync::Arc<S> {
    async fn insert_pass(&self, row: &NewPassRecord) -> Result<PassRecord, gatepass_store::Error> {
        (**self).insert_pass(row).await
    }

    async fn pass_by_token(
        &self,
        token: &PassToken,
    ) -> Result<Option<PassRecord>, gatepass_store::Error> {
        (**self).pass_by_token(token).await
    }

    async fn passes_for_host(
        &self,
        host_id: Uuid,
    ) -> Result<Vec<PassRecord>, gatepass_store::Error> {
        (**self).passes_for_host(host_id).await
    }

    async fn delete_pass(&self, id: Uuid) -> Result<(), gatepass_store::Error> {
        (**self).delete_pass(id).await
    }

    async fn host_profile(
        &self,
        host_id: Uuid,
    ) -> Result<Option<HostProfile>, gatepass_store::Error> {
        (**self).host_profile(host_id).await
    }
}

/// Current-user identity, as needed by issuance and card composition.
pub trait SessionProvider: Send + Sync {
    fn current_host(
        &self,
    ) -> impl Future<Output = Result<HostIdentity, gatepass_store::Error>> + Send;
}
