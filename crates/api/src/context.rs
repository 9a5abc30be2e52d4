use sqlx::PgPool;

use marquee_core::{SubjectId, Tier};

/// Identity asserted for a request by the authentication middleware.
///
/// Anonymity is a first-class identity, not an error: a request with no
/// credential is `Guest`. A `Claimed` identity has a verified signature but
/// has *not* been checked against the identity store yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthIdentity {
    Guest,
    Claimed { tier: Tier, subject: SubjectId },
}

impl AuthIdentity {
    pub fn claimed_tier(&self) -> Tier {
        match self {
            AuthIdentity::Guest => Tier::Guest,
            AuthIdentity::Claimed { tier, .. } => *tier,
        }
    }

    pub fn subject(&self) -> Option<SubjectId> {
        match self {
            AuthIdentity::Guest => None,
            AuthIdentity::Claimed { subject, .. } => Some(*subject),
        }
    }
}

/// Outcome of reconciliation: the effective tier and its resource handle.
///
/// Present in the request extensions only after the resolver has confirmed
/// the claimed tier against the identity store; handlers run every query on
/// [`pool`](Self::pool).
#[derive(Clone)]
pub struct Reconciled {
    tier: Tier,
    subject: Option<SubjectId>,
    pool: PgPool,
}

impl Reconciled {
    pub fn new(tier: Tier, subject: Option<SubjectId>, pool: PgPool) -> Self {
        Self {
            tier,
            subject,
            pool,
        }
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn subject(&self) -> Option<SubjectId> {
        self.subject
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
