use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use marquee_core::{SubjectId, Tier};

/// Verified identity assertion (transport-agnostic).
///
/// This is what a bearer token asserts once its signature and expiry have
/// been checked: *who* the caller claims to be and at *which* trust tier.
/// It is immutable, carries no grants of its own, and is discarded at the
/// end of the request. The claimed tier is an input to reconciliation, not
/// an authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject the token was issued for.
    pub subject: SubjectId,

    /// Trust tier claimed at issuance.
    pub tier: Tier,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}
