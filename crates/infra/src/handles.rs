//! Tier-scoped resource handles.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use marquee_core::Tier;

/// Connection configuration for the three tier-scoped pools.
///
/// Each URL points at the same database under a different database role;
/// the roles carry the actual permission grants.
#[derive(Debug, Clone)]
pub struct HandleConfig {
    pub guest_url: String,
    pub standard_url: String,
    pub privileged_url: String,
}

/// The registry of pre-provisioned, tier-scoped connection pools.
///
/// Created once at startup and shared read-only across all requests. The
/// application never grants or revokes anything through these handles; it
/// only selects which one a reconciled request runs on.
#[derive(Clone)]
pub struct TierHandles {
    guest: PgPool,
    standard: PgPool,
    privileged: PgPool,
}

impl TierHandles {
    /// Build the registry without connecting; each pool establishes its
    /// connections on first use.
    pub fn connect_lazy(config: &HandleConfig) -> Result<Self, sqlx::Error> {
        Ok(Self {
            guest: PgPoolOptions::new().connect_lazy(&config.guest_url)?,
            standard: PgPoolOptions::new().connect_lazy(&config.standard_url)?,
            privileged: PgPoolOptions::new().connect_lazy(&config.privileged_url)?,
        })
    }

    /// The handle bound to `tier`.
    pub fn pool(&self, tier: Tier) -> &PgPool {
        match tier {
            Tier::Guest => &self.guest,
            Tier::Standard => &self.standard,
            Tier::Privileged => &self.privileged,
        }
    }

    /// The privileged handle. Authoritative identity reads go through this
    /// pool so reconciliation never depends on the grants of the tier being
    /// verified.
    pub fn privileged(&self) -> &PgPool {
        &self.privileged
    }
}
