//! The authoritative identity record and its store.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use marquee_core::{SubjectId, Tier};

use crate::StoreError;

/// Ground-truth privilege state for a subject, owned by the identity store.
///
/// The gateway never caches this across requests: every authenticated
/// request re-reads it, because privilege can change inside a token's
/// validity window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityRecord {
    pub subject_id: SubjectId,
    pub is_privileged: bool,
    pub is_disabled: bool,
}

impl IdentityRecord {
    /// The tier this record currently grants.
    pub fn tier(&self) -> Tier {
        if self.is_privileged {
            Tier::Privileged
        } else {
            Tier::Standard
        }
    }
}

/// Read access to the authoritative identity record.
///
/// Object-safe so the resolver can be exercised against a fake store.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Fetch the current record for `subject`.
    ///
    /// `StoreError::NotFound` means no record exists (never existed or
    /// since deleted; callers must not distinguish the two).
    async fn fetch(&self, subject: SubjectId) -> Result<IdentityRecord, StoreError>;
}

/// Postgres-backed identity store.
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn fetch(&self, subject: SubjectId) -> Result<IdentityRecord, StoreError> {
        let row = sqlx::query("SELECT is_admin, is_blocked FROM users WHERE id = $1")
            .bind(subject.as_uuid())
            .fetch_one(&self.pool)
            .await?;

        Ok(IdentityRecord {
            subject_id: subject,
            is_privileged: row.try_get("is_admin").map_err(StoreError::from)?,
            is_disabled: row.try_get("is_blocked").map_err(StoreError::from)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_tier_follows_the_privilege_flag() {
        let base = IdentityRecord {
            subject_id: SubjectId::new(),
            is_privileged: false,
            is_disabled: false,
        };
        assert_eq!(base.tier(), Tier::Standard);
        assert_eq!(
            IdentityRecord {
                is_privileged: true,
                ..base
            }
            .tier(),
            Tier::Privileged
        );
    }
}
