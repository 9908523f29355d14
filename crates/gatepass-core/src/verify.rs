// ── Pass verification ──
//
// Resolution is read-only and idempotent: scanning a pass any number of
// times never mutates it, and the outcome is recomputed fresh each
// time. Store failures degrade to an Invalid outcome with a generic
// message rather than surfacing transport detail to the gate.

use std::time::Duration;

use chrono::{Local, NaiveDate};

use crate::link::extract_token;
use crate::model::{PassStatus, PassToken, VerificationOutcome};
use crate::store::PassStore;

const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

const MSG_UNRECOGNIZED: &str = "QR code format not recognized.";
const MSG_NOT_FOUND: &str = "Pass not found in the registry.";
const MSG_STORE_ERROR: &str = "Error verifying pass.";
const MSG_NOT_AUTHORIZED: &str = "Not authorized to view this pass.";

/// Decides whether the holder of a token may see its pass details.
pub trait TokenAuthorizer: Send + Sync {
    fn authorize(&self, token: &PassToken) -> bool;
}

/// Possession of an unguessable token is the authorization. This is the
/// deliberate access model for gate verification: anyone holding the
/// link may resolve it.
#[derive(Debug, Clone, Copy, Default)]
pub struct KnowledgeOfToken;

impl TokenAuthorizer for KnowledgeOfToken {
    fn authorize(&self, _token: &PassToken) -> bool {
        true
    }
}

/// Classify a scheduled date against the verification date. Whole-day
/// granularity: a pass is valid from local midnight to local midnight.
#[must_use]
pub fn classify(scheduled: NaiveDate, today: NaiveDate) -> PassStatus {
    match scheduled.cmp(&today) {
        std::cmp::Ordering::Equal => PassStatus::Valid,
        std::cmp::Ordering::Greater => PassStatus::FutureDated,
        std::cmp::Ordering::Less => PassStatus::Expired,
    }
}

/// Resolves scanned or pasted input into a [`VerificationOutcome`].
pub struct Verifier<S, A = KnowledgeOfToken> {
    store: S,
    authorizer: A,
    query_timeout: Duration,
}

impl<S: PassStore> Verifier<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            authorizer: KnowledgeOfToken,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }
}

impl<S: PassStore, A: TokenAuthorizer> Verifier<S, A> {
    pub fn with_authorizer(store: S, authorizer: A) -> Self {
        Self {
            store,
            authorizer,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    #[must_use]
    pub fn query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Resolve input against the local calendar date.
    pub async fn resolve(&self, input: &str) -> VerificationOutcome {
        self.resolve_on(input, Local::now().date_naive()).await
    }

    /// Resolve input against an explicit verification date.
    pub async fn resolve_on(&self, input: &str, today: NaiveDate) -> VerificationOutcome {
        let Some(token) = extract_token(input) else {
            // no token shape at all: never touches the store
            return VerificationOutcome::invalid(MSG_UNRECOGNIZED);
        };

        if !self.authorizer.authorize(&token) {
            return VerificationOutcome::invalid(MSG_NOT_AUTHORIZED);
        }

        let lookup = tokio::time::timeout(self.query_timeout, self.store.pass_by_token(&token));
        let record = match lookup.await {
            Ok(Ok(Some(record))) => record,
            Ok(Ok(None)) => return VerificationOutcome::invalid(MSG_NOT_FOUND),
            Ok(Err(e)) => {
                tracing::warn!(%token, error = %e, "pass lookup failed");
                return VerificationOutcome::invalid(MSG_STORE_ERROR);
            }
            Err(_) => {
                tracing::warn!(%token, timeout_secs = self.query_timeout.as_secs(), "pass lookup timed out");
                return VerificationOutcome::invalid(MSG_STORE_ERROR);
            }
        };

        // best-effort address join; a miss or error just drops the address
        let host_address = match tokio::time::timeout(
            self.query_timeout,
            self.store.host_profile(record.host_id),
        )
        .await
        {
            Ok(Ok(Some(profile))) => profile.address,
            Ok(Ok(None)) => None,
            Ok(Err(e)) => {
                tracing::debug!(host_id = %record.host_id, error = %e, "address join failed");
                None
            }
            Err(_) => None,
        };

        let date = record.scheduled_date.format("%d %b %Y");
        match classify(record.scheduled_date, today) {
            PassStatus::Valid => VerificationOutcome::valid(record, host_address),
            PassStatus::FutureDated => VerificationOutcome {
                status: PassStatus::FutureDated,
                message: Some(format!("This pass is not valid until {date}.")),
                record: Some(record),
                host_address,
            },
            PassStatus::Expired => VerificationOutcome {
                status: PassStatus::Expired,
                message: Some(format!("This pass is for {date}, not today.")),
                record: Some(record),
                host_address,
            },
            PassStatus::Invalid => unreachable!("classify never yields Invalid"),
        }
    }
}
