// ── Pass issuance and listing ──
//
// The host-facing operations: issue a pass, list a host's passes,
// revoke one. Issuance generates the token and persists the record in a
// single insert; there is never a stored pass without a token.

use uuid::Uuid;

use crate::error::CoreError;
use crate::model::{HostIdentity, NewPassRecord, PassDraft, PassRecord, PassToken};
use crate::store::PassStore;

/// Host-side directory of issued passes over any [`PassStore`].
pub struct PassDirectory<S> {
    store: S,
}

impl<S: PassStore> PassDirectory<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Issue a new pass for a visitor of `host`.
    ///
    /// The token is generated here and travels with the insert payload,
    /// so a failed insert leaves nothing behind.
    pub async fn issue(
        &self,
        host: &HostIdentity,
        draft: PassDraft,
    ) -> Result<PassRecord, CoreError> {
        let token = PassToken::generate();
        let row = NewPassRecord {
            pass_token: token,
            host_id: host.id,
            host_name: host.name.clone(),
            visitor_name: draft.visitor_name,
            visitor_phone: draft.visitor_phone,
            vehicle_plate: draft.vehicle_plate,
            vehicle_type: draft.vehicle_type,
            scheduled_date: draft.scheduled_date,
            reason: draft.reason,
        };

        let record = self.store.insert_pass(&row).await?;
        tracing::info!(
            pass_id = %record.id,
            host_id = %host.id,
            scheduled = %record.scheduled_date,
            "issued visitor pass"
        );
        Ok(record)
    }

    /// All passes issued by a host, newest scheduled date first.
    pub async fn list_for_host(&self, host_id: Uuid) -> Result<Vec<PassRecord>, CoreError> {
        Ok(self.store.passes_for_host(host_id).await?)
    }

    /// Hard-delete a pass. Its token is gone for good; verification of
    /// that token reports not-found from then on.
    pub async fn revoke(&self, id: Uuid) -> Result<(), CoreError> {
        self.store.delete_pass(id).await?;
        tracing::info!(pass_id = %id, "revoked visitor pass");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use crate::model::VehicleType;
    use crate::store::MemoryStore;

    use super::*;

    fn host() -> HostIdentity {
        HostIdentity {
            id: Uuid::new_v4(),
            name: "Siti Rahman".into(),
            address: Some("12 Jalan Mawar".into()),
        }
    }

    fn draft(date: NaiveDate) -> PassDraft {
        PassDraft {
            visitor_name: "Alice Tan".into(),
            visitor_phone: "0123456789".into(),
            vehicle_plate: "WXY 1234".into(),
            vehicle_type: VehicleType::Car,
            scheduled_date: date,
            reason: "Family visit".into(),
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[tokio::test]
    async fn issued_pass_carries_host_identity_and_a_token() {
        let directory = PassDirectory::new(MemoryStore::new());
        let host = host();

        let record = directory.issue(&host, draft(date(14))).await.unwrap();
        assert_eq!(record.host_id, host.id);
        assert_eq!(record.host_name, "Siti Rahman");
        assert_eq!(record.visitor_name, "Alice Tan");
        assert!(record.created_at.is_some());
    }

    #[tokio::test]
    async fn each_issuance_gets_its_own_token() {
        let directory = PassDirectory::new(MemoryStore::new());
        let host = host();

        let a = directory.issue(&host, draft(date(14))).await.unwrap();
        let b = directory.issue(&host, draft(date(14))).await.unwrap();
        assert_ne!(a.pass_token, b.pass_token);
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn listing_is_scoped_to_the_host_and_date_ordered() {
        let directory = PassDirectory::new(MemoryStore::new());
        let host_a = host();
        let host_b = host();

        directory.issue(&host_a, draft(date(10))).await.unwrap();
        directory.issue(&host_a, draft(date(20))).await.unwrap();
        directory.issue(&host_b, draft(date(15))).await.unwrap();

        let listed = directory.list_for_host(host_a.id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].scheduled_date, date(20));
        assert_eq!(listed[1].scheduled_date, date(10));
    }

    #[tokio::test]
    async fn revoked_pass_disappears_from_lookup() {
        let directory = PassDirectory::new(MemoryStore::new());
        let host = host();

        let record = directory.issue(&host, draft(date(14))).await.unwrap();
        directory.revoke(record.id).await.unwrap();

        let remaining = directory.list_for_host(host.id).await.unwrap();
        assert!(remaining.is_empty());
        assert!(
            directory
                .store()
                .pass_by_token(&record.pass_token)
                .await
                .unwrap()
                .is_none()
        );
    }
}
