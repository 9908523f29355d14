// ── In-memory PassStore ──
//
// Backs unit tests and offline tooling. Semantics mirror the remote
// store: ids and timestamps are assigned at insert, lookups are by
// token, deletion is a hard delete.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use uuid::Uuid;

use crate::model::{HostProfile, NewPassRecord, PassRecord, PassToken};

use super::PassStore;

/// In-memory record store with the same observable behavior as the
/// hosted one.
#[derive(Debug, Default)]
pub struct MemoryStore {
    passes: Mutex<HashMap<Uuid, PassRecord>>,
    profiles: Mutex<HashMap<Uuid, HostProfile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a host profile for address joins.
    pub fn put_profile(&self, profile: HostProfile) {
        self.profiles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(profile.id, profile);
    }

    pub fn pass_count(&self) -> usize {
        self.passes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl PassStore for MemoryStore {
    async fn insert_pass(&self, row: &NewPassRecord) -> Result<PassRecord, gatepass_store::Error> {
        let record = PassRecord {
            id: Uuid::new_v4(),
            pass_token: row.pass_token,
            host_id: row.host_id,
            host_name: row.host_name.clone(),
            visitor_name: row.visitor_name.clone(),
            visitor_phone: row.visitor_phone.clone(),
            vehicle_plate: row.vehicle_plate.clone(),
            vehicle_type: row.vehicle_type,
            scheduled_date: row.scheduled_date,
            reason: row.reason.clone(),
            created_at: Some(Utc::now()),
        };
        self.passes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn pass_by_token(
        &self,
        token: &PassToken,
    ) -> Result<Option<PassRecord>, gatepass_store::Error> {
        Ok(self
            .passes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|p| p.pass_token == *token)
            .cloned())
    }

    async fn passes_for_host(
        &self,
        host_id: Uuid,
    ) -> Result<Vec<PassRecord>, gatepass_store::Error> {
        let mut rows: Vec<PassRecord> = self
            .passes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|p| p.host_id == host_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.scheduled_date.cmp(&a.scheduled_date));
        Ok(rows)
    }

    async fn delete_pass(&self, id: Uuid) -> Result<(), gatepass_store::Error> {
        self.passes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        Ok(())
    }

    async fn host_profile(
        &self,
        host_id: Uuid,
    ) -> Result<Option<HostProfile>, gatepass_store::Error> {
        Ok(self
            .profiles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&host_id)
            .cloned())
    }
}
