//! HTTP application wiring (axum router + gateway layers).
//!
//! Layer order, outermost first: authentication middleware (token →
//! asserted identity), authorization resolver (identity → reconciled tier +
//! handle), then the business routes. `/health` sits outside both;
//! `/whoami` sits behind authentication only.

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use marquee_auth::{TokenIssuer, TokenVerifier};
use marquee_infra::{IdentityStore, PgIdentityStore, TierHandles};

use crate::config::GatewayConfig;
use crate::{middleware, resolver};

pub mod dto;
pub mod errors;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(config: &GatewayConfig) -> Result<Router, sqlx::Error> {
    let secret = config.jwt_secret.as_bytes();
    let verifier = Arc::new(TokenVerifier::new(secret, config.vocabulary.clone()));
    let issuer = Arc::new(TokenIssuer::new(secret, config.vocabulary.clone()));

    let handles = Arc::new(TierHandles::connect_lazy(&config.stores)?);
    let identity: Arc<dyn IdentityStore> =
        Arc::new(PgIdentityStore::new(handles.privileged().clone()));

    let auth_state = middleware::AuthState { verifier };
    let resolver_state = resolver::ResolverState { identity, handles };

    let business = routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn_with_state(
                resolver_state,
                resolver::resolve_middleware,
            ))
            .layer(Extension(issuer)),
    );

    let authenticated = Router::new()
        .route("/whoami", get(routes::system::whoami))
        .merge(business)
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .merge(authenticated))
}
