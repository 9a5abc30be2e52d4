//! Authorization resolver: the trust boundary of the gateway.
//!
//! The middleware established what the client *claims* to be; this module
//! converts that claim into "the identity store currently agrees" and binds
//! the tier-scoped resource handle. Per request the states are:
//! unauthenticated → authenticated (tier claimed) → reconciled (tier,
//! handle) → terminal. Nothing here is persisted; re-running resolution for
//! the same request state yields the same outcome.

use std::sync::Arc;

use axum::{extract::State, middleware::Next, response::Response};
use thiserror::Error;

use marquee_core::Tier;
use marquee_infra::{IdentityRecord, IdentityStore, StoreError, TierHandles};

use crate::app::errors;
use crate::context::{AuthIdentity, Reconciled};

/// Why a claimed identity failed reconciliation.
///
/// `UnknownSubject`, `ClaimMismatch` and `SubjectDisabled` all take the
/// same outward shape as an invalid credential; the distinction exists for
/// logs only. `StoreUnavailable` is different in kind: trust could not be
/// established either way, so it surfaces as a server error rather than a
/// rejection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no identity record for the claimed subject")]
    UnknownSubject,

    #[error("claimed tier does not match the identity record")]
    ClaimMismatch,

    #[error("subject is disabled")]
    SubjectDisabled,

    #[error("identity store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Reconcile an asserted identity against the authoritative store.
///
/// Guests reconcile directly (there is no record to check). For any other
/// claim the record is re-read on every request and the claimed tier must
/// equal the record's tier exactly; a stale or forged claim in either
/// direction is a rejection, never a silent downgrade.
pub async fn reconcile_tier(
    store: &dyn IdentityStore,
    identity: &AuthIdentity,
) -> Result<Tier, ResolveError> {
    let (claimed, subject) = match identity {
        AuthIdentity::Guest => return Ok(Tier::Guest),
        AuthIdentity::Claimed { tier, subject } => (*tier, *subject),
    };

    if claimed == Tier::Guest {
        // A signed guest assertion carries no privilege to confirm.
        return Ok(Tier::Guest);
    }

    let record = store.fetch(subject).await.map_err(|e| match e {
        StoreError::NotFound => ResolveError::UnknownSubject,
        other => ResolveError::StoreUnavailable(other.to_string()),
    })?;

    check_claim(claimed, &record)
}

/// The pure equality check at the heart of reconciliation.
fn check_claim(claimed: Tier, record: &IdentityRecord) -> Result<Tier, ResolveError> {
    if record.is_disabled {
        return Err(ResolveError::SubjectDisabled);
    }
    if record.tier() != claimed {
        return Err(ResolveError::ClaimMismatch);
    }
    Ok(claimed)
}

#[derive(Clone)]
pub struct ResolverState {
    pub identity: Arc<dyn IdentityStore>,
    pub handles: Arc<TierHandles>,
}

/// Middleware binding the reconciled tier and handle into the request.
///
/// Runs strictly after authentication and strictly before any business
/// handler; no response is emitted until resolution reached a terminal or
/// reconciled state.
pub async fn resolve_middleware(
    State(state): State<ResolverState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(identity) = req.extensions().get::<AuthIdentity>().copied() else {
        // Route wiring bug: this layer only makes sense behind the
        // authentication middleware.
        return errors::json_error(
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            "misconfigured",
            "request reached the resolver without an identity",
        );
    };

    match reconcile_tier(&*state.identity, &identity).await {
        Ok(tier) => {
            let pool = state.handles.pool(tier).clone();
            req.extensions_mut()
                .insert(Reconciled::new(tier, identity.subject(), pool));
            next.run(req).await
        }
        Err(ResolveError::StoreUnavailable(msg)) => {
            tracing::error!(error = %msg, "identity store read failed during reconciliation");
            errors::json_error(
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "store_unavailable",
                "could not establish trust",
            )
        }
        Err(e) => {
            tracing::warn!(error = %e, subject = ?identity.subject(), "claim failed reconciliation");
            errors::credential_rejected()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use marquee_core::SubjectId;

    use super::*;

    #[derive(Default)]
    struct FakeStore {
        records: HashMap<SubjectId, IdentityRecord>,
        unavailable: bool,
        reads: AtomicUsize,
    }

    impl FakeStore {
        fn with(subject: SubjectId, is_privileged: bool, is_disabled: bool) -> Self {
            let mut records = HashMap::new();
            records.insert(
                subject,
                IdentityRecord {
                    subject_id: subject,
                    is_privileged,
                    is_disabled,
                },
            );
            Self {
                records,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl IdentityStore for FakeStore {
        async fn fetch(&self, subject: SubjectId) -> Result<IdentityRecord, StoreError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.unavailable {
                return Err(StoreError::Other("connection timed out".to_string()));
            }
            self.records
                .get(&subject)
                .copied()
                .ok_or(StoreError::NotFound)
        }
    }

    fn claimed(tier: Tier, subject: SubjectId) -> AuthIdentity {
        AuthIdentity::Claimed { tier, subject }
    }

    #[tokio::test]
    async fn guest_reconciles_without_a_store_read() {
        let store = FakeStore::default();
        let tier = reconcile_tier(&store, &AuthIdentity::Guest).await.unwrap();
        assert_eq!(tier, Tier::Guest);
        assert_eq!(store.reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn privileged_claim_matching_the_record_reconciles() {
        let subject = SubjectId::new();
        let store = FakeStore::with(subject, true, false);

        let tier = reconcile_tier(&store, &claimed(Tier::Privileged, subject))
            .await
            .unwrap();
        assert_eq!(tier, Tier::Privileged);
        assert_eq!(store.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn standard_claim_matching_the_record_reconciles() {
        let subject = SubjectId::new();
        let store = FakeStore::with(subject, false, false);

        let tier = reconcile_tier(&store, &claimed(Tier::Standard, subject))
            .await
            .unwrap();
        assert_eq!(tier, Tier::Standard);
    }

    #[tokio::test]
    async fn stale_privileged_claim_is_rejected_after_demotion() {
        let subject = SubjectId::new();
        // Token still says privileged; the record no longer does.
        let store = FakeStore::with(subject, false, false);

        let err = reconcile_tier(&store, &claimed(Tier::Privileged, subject))
            .await
            .unwrap_err();
        assert_eq!(err, ResolveError::ClaimMismatch);
    }

    #[tokio::test]
    async fn standard_claim_on_a_privileged_record_is_rejected_not_downgraded() {
        let subject = SubjectId::new();
        let store = FakeStore::with(subject, true, false);

        let err = reconcile_tier(&store, &claimed(Tier::Standard, subject))
            .await
            .unwrap_err();
        assert_eq!(err, ResolveError::ClaimMismatch);
    }

    #[tokio::test]
    async fn absent_record_rejects_the_claim() {
        let store = FakeStore::default();

        let err = reconcile_tier(&store, &claimed(Tier::Standard, SubjectId::new()))
            .await
            .unwrap_err();
        assert_eq!(err, ResolveError::UnknownSubject);
    }

    #[tokio::test]
    async fn disabled_subject_rejects_even_with_a_matching_claim() {
        let subject = SubjectId::new();
        let store = FakeStore::with(subject, true, true);

        let err = reconcile_tier(&store, &claimed(Tier::Privileged, subject))
            .await
            .unwrap_err();
        assert_eq!(err, ResolveError::SubjectDisabled);
    }

    #[tokio::test]
    async fn store_outage_is_not_a_rejection() {
        let subject = SubjectId::new();
        let store = FakeStore {
            unavailable: true,
            ..FakeStore::with(subject, false, false)
        };

        let err = reconcile_tier(&store, &claimed(Tier::Standard, subject))
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn resolution_is_idempotent_for_a_stable_record() {
        let subject = SubjectId::new();
        let store = FakeStore::with(subject, true, false);
        let identity = claimed(Tier::Privileged, subject);

        let first = reconcile_tier(&store, &identity).await;
        let second = reconcile_tier(&store, &identity).await;
        assert_eq!(first, second);
        assert_eq!(store.reads.load(Ordering::SeqCst), 2);
    }
}
