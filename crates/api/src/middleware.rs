//! Authentication middleware: credential extraction and verification.
//!
//! This layer never grants access. It binds an identity (asserted or guest)
//! to the request and fast-rejects bad tokens without a store round-trip;
//! whether the identity is still true is the resolver's concern.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};

use marquee_auth::TokenVerifier;

use crate::app::errors;
use crate::context::AuthIdentity;

#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<TokenVerifier>,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let identity = match bearer_token(req.headers()) {
        // Absent credential: anonymous guest, proceed.
        Credential::Absent => AuthIdentity::Guest,
        // Present but unreadable: a credential was offered and cannot be
        // verified, which is never downgraded to guest.
        Credential::Invalid => {
            tracing::debug!("rejected unreadable bearer credential");
            return errors::credential_rejected();
        }
        Credential::Token(token) => match state.verifier.verify(token) {
            Ok(claims) => AuthIdentity::Claimed {
                tier: claims.tier,
                subject: claims.subject,
            },
            // One outward shape for malformed/expired/bad-signature.
            Err(e) => {
                tracing::debug!(error = %e, "rejected bearer credential");
                return errors::credential_rejected();
            }
        },
    };

    req.extensions_mut().insert(identity);
    next.run(req).await
}

/// What the `Authorization` header carried, if anything.
#[derive(Debug, PartialEq, Eq)]
enum Credential<'a> {
    /// No credential was presented (header absent or empty).
    Absent,
    /// A credential was presented but cannot even be read as a token:
    /// non-UTF-8 bytes, or nothing left after the `Bearer ` prefix.
    Invalid,
    Token(&'a str),
}

/// Pull the token out of the `Authorization` header.
///
/// Only an absent or literally empty header counts as "no credential";
/// any other value was an attempt to authenticate and must either verify
/// or be rejected.
fn bearer_token(headers: &HeaderMap) -> Credential<'_> {
    let Some(header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Credential::Absent;
    };
    let Ok(value) = header.to_str() else {
        return Credential::Invalid;
    };
    if value.is_empty() {
        return Credential::Absent;
    }

    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        Credential::Invalid
    } else {
        Credential::Token(token)
    }
}
