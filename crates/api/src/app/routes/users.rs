//! Account endpoints: registration, login, and user administration.
//!
//! Every query runs on the reconciled tier handle; the store's own grants
//! decide what each handle may touch, and failures come back through the
//! error translator. The checks in here are business rules (self-or-admin,
//! no self-demotion), not a second authorization layer.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use sqlx::Row;
use uuid::Uuid;

use marquee_auth::TokenIssuer;
use marquee_core::{SubjectId, Tier};

use crate::app::{dto, errors};
use crate::context::Reconciled;

fn db_error(err: sqlx::Error) -> axum::response::Response {
    errors::store_error_to_response(err.into())
}

fn parse_date(raw: &str) -> Result<NaiveDate, axum::response::Response> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_date",
            "date must be YYYY-MM-DD",
        )
    })
}

fn require_non_empty(fields: &[(&str, &str)]) -> Result<(), axum::response::Response> {
    for (name, value) in fields {
        if value.trim().is_empty() {
            return Err(errors::json_error(
                StatusCode::BAD_REQUEST,
                "empty_field",
                format!("field '{name}' must not be empty"),
            ));
        }
    }
    Ok(())
}

/// Self-or-admin guard shared by the per-user endpoints.
fn self_or_privileged(ctx: &Reconciled, id: Uuid) -> Result<(), axum::response::Response> {
    let is_self = ctx.subject() == Some(SubjectId::from_uuid(id));
    if ctx.tier() != Tier::Privileged && !is_self {
        return Err(errors::json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "access denied",
        ));
    }
    Ok(())
}

pub async fn register(
    Extension(ctx): Extension<Reconciled>,
    Json(body): Json<dto::RegisterRequest>,
) -> axum::response::Response {
    if let Err(resp) = require_non_empty(&[
        ("name", &body.name),
        ("email", &body.email),
        ("password_hash", &body.password_hash),
        ("birth_date", &body.birth_date),
    ]) {
        return resp;
    }
    let birth_date = match parse_date(&body.birth_date) {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    let id = SubjectId::new();
    let result = sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, birth_date) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id.as_uuid())
    .bind(&body.name)
    .bind(&body.email)
    .bind(&body.password_hash)
    .bind(birth_date)
    .execute(ctx.pool())
    .await;

    match result {
        Ok(_) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "id": id.to_string() })),
        )
            .into_response(),
        Err(e) => db_error(e),
    }
}

pub async fn login(
    Extension(ctx): Extension<Reconciled>,
    Extension(issuer): Extension<Arc<TokenIssuer>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    if let Err(resp) = require_non_empty(&[
        ("email", &body.email),
        ("password_hash", &body.password_hash),
    ]) {
        return resp;
    }

    let row = match sqlx::query("SELECT id, password_hash, is_admin FROM users WHERE email = $1")
        .bind(&body.email)
        .fetch_one(ctx.pool())
        .await
    {
        Ok(row) => row,
        // Unknown email and wrong password share one outward shape.
        Err(sqlx::Error::RowNotFound) => return bad_login(),
        Err(e) => return db_error(e),
    };

    let stored_hash: String = match row.try_get("password_hash") {
        Ok(v) => v,
        Err(e) => return db_error(e),
    };
    if stored_hash != body.password_hash {
        return bad_login();
    }

    let user_id: Uuid = match row.try_get("id") {
        Ok(v) => v,
        Err(e) => return db_error(e),
    };
    let is_admin: bool = match row.try_get("is_admin") {
        Ok(v) => v,
        Err(e) => return db_error(e),
    };

    // The tier the token asserts is whatever the record says right now;
    // reconciliation re-checks it on every later request.
    let tier = if is_admin {
        Tier::Privileged
    } else {
        Tier::Standard
    };

    match issuer.issue(tier, SubjectId::from_uuid(user_id)) {
        Ok(token) => Json(dto::AuthResponse { token, user_id }).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "token issuance failed");
            errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "signing_error",
                "could not issue token",
            )
        }
    }
}

fn bad_login() -> axum::response::Response {
    errors::json_error(
        StatusCode::UNAUTHORIZED,
        "unauthorized",
        "invalid email or password",
    )
}

pub async fn list_users(Extension(ctx): Extension<Reconciled>) -> axum::response::Response {
    let rows = match sqlx::query(
        "SELECT id, name, email, birth_date, is_blocked, is_admin FROM users ORDER BY name",
    )
    .fetch_all(ctx.pool())
    .await
    {
        Ok(rows) => rows,
        Err(e) => return db_error(e),
    };

    if rows.is_empty() {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "no users");
    }

    let mut users = Vec::with_capacity(rows.len());
    for row in rows {
        match user_from_row(&row) {
            Ok(user) => users.push(user),
            Err(e) => return db_error(e),
        }
    }
    Json(users).into_response()
}

pub async fn get_user(
    Extension(ctx): Extension<Reconciled>,
    Path(id): Path<Uuid>,
) -> axum::response::Response {
    if let Err(resp) = self_or_privileged(&ctx, id) {
        return resp;
    }

    let row = match sqlx::query(
        "SELECT id, name, email, birth_date, is_blocked, is_admin FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_one(ctx.pool())
    .await
    {
        Ok(row) => row,
        Err(e) => return db_error(e),
    };

    match user_from_row(&row) {
        Ok(user) => Json(user).into_response(),
        Err(e) => db_error(e),
    }
}

pub async fn update_user(
    Extension(ctx): Extension<Reconciled>,
    Path(id): Path<Uuid>,
    Json(body): Json<dto::UserUpdateRequest>,
) -> axum::response::Response {
    if let Err(resp) = self_or_privileged(&ctx, id) {
        return resp;
    }
    if let Err(resp) = require_non_empty(&[
        ("name", &body.name),
        ("email", &body.email),
        ("password_hash", &body.password_hash),
        ("birth_date", &body.birth_date),
    ]) {
        return resp;
    }
    let birth_date = match parse_date(&body.birth_date) {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    let result = sqlx::query(
        "UPDATE users SET name = $1, email = $2, birth_date = $3, password_hash = $4 WHERE id = $5",
    )
    .bind(&body.name)
    .bind(&body.email)
    .bind(birth_date)
    .bind(&body.password_hash)
    .bind(id)
    .execute(ctx.pool())
    .await;

    match result {
        Ok(done) if done.rows_affected() == 0 => {
            errors::json_error(StatusCode::NOT_FOUND, "not_found", "user not found")
        }
        Ok(_) => StatusCode::OK.into_response(),
        Err(e) => db_error(e),
    }
}

pub async fn delete_user(
    Extension(ctx): Extension<Reconciled>,
    Path(id): Path<Uuid>,
) -> axum::response::Response {
    // An admin cannot delete their own account.
    if ctx.subject() == Some(SubjectId::from_uuid(id)) {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", "access denied");
    }

    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(ctx.pool())
        .await;

    match result {
        Ok(done) if done.rows_affected() == 0 => {
            errors::json_error(StatusCode::NOT_FOUND, "not_found", "user not found")
        }
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => db_error(e),
    }
}

pub async fn get_admin_status(
    Extension(ctx): Extension<Reconciled>,
    Path(id): Path<Uuid>,
) -> axum::response::Response {
    if ctx.tier() != Tier::Privileged {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", "access denied");
    }

    let row = match sqlx::query("SELECT is_admin FROM users WHERE id = $1")
        .bind(id)
        .fetch_one(ctx.pool())
        .await
    {
        Ok(row) => row,
        Err(e) => return db_error(e),
    };

    match row.try_get::<bool, _>("is_admin") {
        Ok(is_admin) => Json(dto::AdminStatusBody { is_admin }).into_response(),
        Err(e) => db_error(e),
    }
}

pub async fn set_admin_status(
    Extension(ctx): Extension<Reconciled>,
    Path(id): Path<Uuid>,
    Json(body): Json<dto::AdminStatusBody>,
) -> axum::response::Response {
    // Admin-only, and never against one's own record.
    if ctx.tier() != Tier::Privileged || ctx.subject() == Some(SubjectId::from_uuid(id)) {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", "access denied");
    }

    let result = sqlx::query("UPDATE users SET is_admin = $1 WHERE id = $2")
        .bind(body.is_admin)
        .bind(id)
        .execute(ctx.pool())
        .await;

    match result {
        Ok(done) if done.rows_affected() == 0 => {
            errors::json_error(StatusCode::NOT_FOUND, "not_found", "user not found")
        }
        Ok(_) => StatusCode::OK.into_response(),
        Err(e) => db_error(e),
    }
}

/// Public nickname lookup, reachable anonymously.
pub async fn get_nickname(
    Extension(ctx): Extension<Reconciled>,
    Path(id): Path<Uuid>,
) -> axum::response::Response {
    let row = match sqlx::query("SELECT name FROM users WHERE id = $1")
        .bind(id)
        .fetch_one(ctx.pool())
        .await
    {
        Ok(row) => row,
        Err(e) => return db_error(e),
    };

    match row.try_get::<String, _>("name") {
        Ok(name) => Json(name).into_response(),
        Err(e) => db_error(e),
    }
}

fn user_from_row(row: &sqlx::postgres::PgRow) -> Result<dto::UserResponse, sqlx::Error> {
    let birth_date: NaiveDate = row.try_get("birth_date")?;
    Ok(dto::UserResponse {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        birth_date: birth_date.format("%Y-%m-%d").to_string(),
        is_blocked: row.try_get("is_blocked")?,
        is_admin: row.try_get("is_admin")?,
    })
}
