use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::context::AuthIdentity;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Echo the identity asserted by the credential (pre-reconciliation).
pub async fn whoami(Extension(identity): Extension<AuthIdentity>) -> impl IntoResponse {
    Json(serde_json::json!({
        "tier": identity.claimed_tier().to_string(),
        "subject": identity.subject().map(|s| s.to_string()),
    }))
}
