//! Credential issuer and parser/verifier (HS256, process-wide secret).

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use marquee_core::{SubjectId, Tier, TierVocabulary};

use crate::TokenClaims;

/// Default validity window for issued tokens.
pub fn default_ttl() -> Duration {
    Duration::minutes(30)
}

/// On-the-wire claim set. The tier travels as its configured label so the
/// vocabulary can vary per environment without re-issuing code.
#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: Uuid,
    tier: String,
    exp: i64,
}

/// Signing failed while producing a token.
///
/// This is fatal to the request that triggered issuance and is surfaced as
/// a server error, never swallowed.
#[derive(Debug, Error)]
#[error("token signing failed: {0}")]
pub struct SigningError(#[from] jsonwebtoken::errors::Error);

/// Why a presented token could not be trusted.
///
/// Callers must treat all three variants uniformly toward the client; the
/// distinction exists for logs only, to avoid an oracle about *why* a token
/// was rejected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    BadSignature,

    #[error("token has expired")]
    Expired,
}

/// Produces signed, time-bounded identity assertions.
///
/// Pure function of (tier, subject, secret, clock); never touches the
/// identity store.
pub struct TokenIssuer {
    key: EncodingKey,
    vocab: TierVocabulary,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], vocab: TierVocabulary) -> Self {
        Self {
            key: EncodingKey::from_secret(secret),
            vocab,
            ttl: default_ttl(),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Issue a token for `subject` at `tier`, expiring `ttl` from now.
    pub fn issue(&self, tier: Tier, subject: SubjectId) -> Result<String, SigningError> {
        self.issue_at(tier, subject, Utc::now())
    }

    /// Clock-injected variant of [`issue`](Self::issue).
    pub fn issue_at(
        &self,
        tier: Tier,
        subject: SubjectId,
        now: DateTime<Utc>,
    ) -> Result<String, SigningError> {
        let claims = WireClaims {
            sub: *subject.as_uuid(),
            tier: self.vocab.label(tier).to_string(),
            exp: (now + self.ttl).timestamp(),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.key)?;
        Ok(token)
    }
}

/// Recovers the asserted (tier, subject) from a token, or fails.
///
/// Stateless and deterministic given the secret and the current time.
pub struct TokenVerifier {
    key: DecodingKey,
    vocab: TierVocabulary,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &[u8], vocab: TierVocabulary) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact: no grace window past `exp`.
        validation.leeway = 0;

        Self {
            key: DecodingKey::from_secret(secret),
            vocab,
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let data = jsonwebtoken::decode::<WireClaims>(token, &self.key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed,
            })?;

        // A label outside the configured vocabulary is as untrusted as a
        // parse failure, whatever signed it.
        let tier = self
            .vocab
            .resolve(&data.claims.tier)
            .ok_or(TokenError::Malformed)?;

        let expires_at = Utc
            .timestamp_opt(data.claims.exp, 0)
            .single()
            .ok_or(TokenError::Malformed)?;

        Ok(TokenClaims {
            subject: SubjectId::from_uuid(data.claims.sub),
            tier,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SECRET, TierVocabulary::default())
    }

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(SECRET, TierVocabulary::default())
    }

    #[test]
    fn issued_token_verifies_to_the_same_assertion() {
        let subject = SubjectId::new();
        let token = issuer().issue(Tier::Privileged, subject).unwrap();

        let claims = verifier().verify(&token).unwrap();
        assert_eq!(claims.subject, subject);
        assert_eq!(claims.tier, Tier::Privileged);
        assert!(claims.expires_at > Utc::now());
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let forged = TokenIssuer::new(b"not-the-secret", TierVocabulary::default())
            .issue(Tier::Privileged, SubjectId::new())
            .unwrap();

        assert_eq!(verifier().verify(&forged), Err(TokenError::BadSignature));
    }

    #[test]
    fn expired_token_is_rejected_despite_valid_signature() {
        let subject = SubjectId::new();
        let token = issuer()
            .issue_at(Tier::Standard, subject, Utc::now() - Duration::hours(2))
            .unwrap();

        assert_eq!(verifier().verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(verifier().verify(""), Err(TokenError::Malformed));
        assert_eq!(
            verifier().verify("not.a.token"),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn tier_label_outside_the_vocabulary_is_malformed() {
        // Properly signed, but minted under a different deployment's
        // vocabulary.
        let other_vocab = TierVocabulary::new("anon", "member", "operator").unwrap();
        let token = TokenIssuer::new(SECRET, other_vocab)
            .issue(Tier::Privileged, SubjectId::new())
            .unwrap();

        assert_eq!(verifier().verify(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn tokens_issued_at_different_instants_are_distinct_and_independently_valid() {
        let subject = SubjectId::new();
        let now = Utc::now();

        let first = issuer()
            .issue_at(Tier::Standard, subject, now)
            .unwrap();
        let second = issuer()
            .issue_at(Tier::Standard, subject, now + Duration::seconds(5))
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(verifier().verify(&first).unwrap().subject, subject);
        assert_eq!(verifier().verify(&second).unwrap().subject, subject);
    }
}
