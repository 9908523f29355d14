// ── Hosted record store adapter ──
//
// Maps the table-generic `StoreClient` onto the `PassStore` contract.
// Table and column names are fixed here and nowhere else.

use std::sync::Arc;

use uuid::Uuid;

use gatepass_store::StoreClient;

use crate::model::{HostIdentity, HostProfile, NewPassRecord, PassRecord, PassToken};

use super::{PassStore, SessionProvider};

const PASSES_TABLE: &str = "visitor_passes";
const PROFILES_TABLE: &str = "profiles";

/// `PassStore` over the hosted record store.
#[derive(Clone)]
pub struct RemoteStore {
    client: Arc<StoreClient>,
}

impl RemoteStore {
    pub fn new(client: StoreClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub fn client(&self) -> &StoreClient {
        &self.client
    }
}

impl PassStore for RemoteStore {
    async fn insert_pass(&self, row: &NewPassRecord) -> Result<PassRecord, gatepass_store::Error> {
        self.client.insert(PASSES_TABLE, row).await
    }

    async fn pass_by_token(
        &self,
        token: &PassToken,
    ) -> Result<Option<PassRecord>, gatepass_store::Error> {
        match self
            .client
            .select_one(PASSES_TABLE, "pass_token", &token.to_string())
            .await
        {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn passes_for_host(
        &self,
        host_id: Uuid,
    ) -> Result<Vec<PassRecord>, gatepass_store::Error> {
        self.client
            .select_list(
                PASSES_TABLE,
                "host_id",
                &host_id.to_string(),
                Some("scheduled_date.desc"),
            )
            .await
    }

    async fn delete_pass(&self, id: Uuid) -> Result<(), gatepass_store::Error> {
        self.client.delete(PASSES_TABLE, &id.to_string()).await
    }

    async fn host_profile(
        &self,
        host_id: Uuid,
    ) -> Result<Option<HostProfile>, gatepass_store::Error> {
        match self
            .client
            .select_one(PROFILES_TABLE, "id", &host_id.to_string())
            .await
        {
            Ok(profile) => Ok(Some(profile)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Session provider resolving a configured resident id against the
/// `profiles` table.
#[derive(Clone)]
pub struct RemoteSession {
    store: RemoteStore,
    host_id: Uuid,
}

impl RemoteSession {
    pub fn new(store: RemoteStore, host_id: Uuid) -> Self {
        Self { store, host_id }
    }
}

impl SessionProvider for RemoteSession {
    async fn current_host(&self) -> Result<HostIdentity, gatepass_store::Error> {
        let profile = self.store.host_profile(self.host_id).await?.ok_or_else(|| {
            gatepass_store::Error::RowNotFound {
                table: PROFILES_TABLE.into(),
                filter: format!("id=eq.{}", self.host_id),
            }
        })?;
        Ok(profile.into())
    }
}
