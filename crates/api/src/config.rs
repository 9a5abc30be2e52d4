//! Process configuration, loaded once at startup.

use thiserror::Error;

use marquee_core::{TierVocabulary, VocabularyError};
use marquee_infra::HandleConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),
}

/// Everything the gateway needs, resolved from the environment in `main`
/// and passed by reference into the router builder. There is no other
/// source of configuration and no global state.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Process-wide symmetric signing secret.
    pub jwt_secret: String,

    /// Wire labels for the three trust tiers.
    pub vocabulary: TierVocabulary,

    /// Connection URLs for the tier-scoped pools.
    pub stores: HandleConfig,

    pub bind_addr: String,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            jwt_secret: require("JWT_SECRET")?,
            vocabulary: TierVocabulary::new(
                var_or("TIER_GUEST", "guest"),
                var_or("TIER_STANDARD", "user"),
                var_or("TIER_PRIVILEGED", "admin"),
            )?,
            stores: HandleConfig {
                guest_url: require("GUEST_DATABASE_URL")?,
                standard_url: require("STANDARD_DATABASE_URL")?,
                privileged_url: require("PRIVILEGED_DATABASE_URL")?,
            },
            bind_addr: var_or("BIND_ADDR", "0.0.0.0:8080"),
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}
