//! Closed taxonomy of downstream (store-reported) failures.

use thiserror::Error;

// SQLSTATE codes the gateway reacts to.
const PERMISSION_DENIED: &str = "42501";
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// A structured failure reported by a tier-scoped handle.
///
/// Every failing store operation is classified into exactly one of these
/// variants before anything else looks at it. The error translator performs
/// an exhaustive match, so adding a variant here is a compile-time-visible
/// change to every consumer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The requested row does not exist.
    #[error("not found")]
    NotFound,

    /// The handle's database role lacks the grant for the attempted
    /// operation. This is an authorization outcome, not a server fault.
    #[error("permission denied by the backing store")]
    PermissionDenied,

    /// A unique constraint was violated.
    #[error("unique constraint violated: {0}")]
    UniqueConflict(String),

    /// A foreign-key constraint was violated; the row is referenced
    /// elsewhere.
    #[error("dependency violation: {0}")]
    DependencyViolation(String),

    /// Transient or unclassified store failure.
    #[error("store failure: {0}")]
    Other(String),
}

impl StoreError {
    /// Classify a raw SQLSTATE code.
    ///
    /// Precedence when a failure could carry several meanings:
    /// permission-denied is checked first so an authorization signal is
    /// never masked, then unique violation, then foreign-key violation.
    /// Everything unrecognized falls through to `Other`.
    pub fn from_sqlstate(code: &str, message: impl Into<String>) -> Self {
        match code {
            PERMISSION_DENIED => StoreError::PermissionDenied,
            UNIQUE_VIOLATION => StoreError::UniqueConflict(message.into()),
            FOREIGN_KEY_VIOLATION => StoreError::DependencyViolation(message.into()),
            _ => StoreError::Other(message.into()),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message().to_string();
                match db_err.code() {
                    Some(code) => StoreError::from_sqlstate(code.as_ref(), msg),
                    None => StoreError::Other(msg),
                }
            }
            other => StoreError::Other(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_sqlstates_classify_to_their_variant() {
        assert_eq!(
            StoreError::from_sqlstate("42501", "denied"),
            StoreError::PermissionDenied
        );
        assert_eq!(
            StoreError::from_sqlstate("23505", "dup"),
            StoreError::UniqueConflict("dup".to_string())
        );
        assert_eq!(
            StoreError::from_sqlstate("23503", "fk"),
            StoreError::DependencyViolation("fk".to_string())
        );
    }

    #[test]
    fn unrecognized_sqlstate_falls_through_to_other() {
        // Not-null violation, syntax error, deadlock: none get a dedicated
        // client-facing outcome.
        for code in ["23502", "42601", "40P01", ""] {
            assert_eq!(
                StoreError::from_sqlstate(code, "boom"),
                StoreError::Other("boom".to_string())
            );
        }
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        assert_eq!(
            StoreError::from(sqlx::Error::RowNotFound),
            StoreError::NotFound
        );
    }

    #[test]
    fn non_database_sqlx_errors_map_to_other() {
        let err = StoreError::from(sqlx::Error::PoolClosed);
        assert!(matches!(err, StoreError::Other(_)));
    }
}
