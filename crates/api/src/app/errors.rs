//! Consistent error responses, including the downstream error translator.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use marquee_infra::StoreError;

/// Translate a downstream failure into its client-facing outcome.
///
/// Exhaustive by construction: a new `StoreError` variant will not compile
/// until it is given an outcome here. Permission-denied comes first in the
/// taxonomy so it can never be masked by the generic fallback, and the
/// fallback itself always exists; no failure is ever shaped like success.
pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::PermissionDenied => {
            json_error(StatusCode::FORBIDDEN, "forbidden", "permission denied")
        }
        StoreError::UniqueConflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        StoreError::DependencyViolation(msg) => {
            json_error(StatusCode::FAILED_DEPENDENCY, "dependency_violation", msg)
        }
        StoreError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        StoreError::Other(msg) => {
            tracing::error!(error = %msg, "unclassified store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
        }
    }
}

/// The single outward shape for every untrusted credential.
///
/// Malformed token, bad signature, expiry, unknown subject, claim mismatch
/// and disabled subject all emit exactly this response, so a caller probing
/// with forged tokens learns nothing about accounts or privilege state.
pub fn credential_rejected() -> axum::response::Response {
    json_error(StatusCode::FORBIDDEN, "forbidden", "invalid credential")
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_table_matches_the_outcome_families() {
        let cases = [
            (StoreError::PermissionDenied, StatusCode::FORBIDDEN),
            (
                StoreError::UniqueConflict("dup".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                StoreError::DependencyViolation("fk".to_string()),
                StatusCode::FAILED_DEPENDENCY,
            ),
            (StoreError::NotFound, StatusCode::NOT_FOUND),
            (
                StoreError::Other("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(store_error_to_response(err).status(), status);
        }
    }

    #[test]
    fn permission_denied_is_never_a_server_error() {
        let response = store_error_to_response(StoreError::PermissionDenied);
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn rejected_credentials_share_one_status() {
        assert_eq!(credential_rejected().status(), StatusCode::FORBIDDEN);
    }
}
