//! Request/response DTOs and their JSON shapes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── accounts ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    /// ISO date, `YYYY-MM-DD`.
    pub birth_date: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub birth_date: String,
    pub is_blocked: bool,
    pub is_admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct UserUpdateRequest {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub birth_date: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminStatusBody {
    pub is_admin: bool,
}

// ── catalog (representative) ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MovieRequest {
    pub title: String,
    /// Running time, `HH:MM:SS`.
    pub duration: String,
    pub description: String,
    pub age_limit: i32,
    /// ISO date, `YYYY-MM-DD`.
    pub release_date: String,
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub id: Uuid,
    pub title: String,
    pub duration: String,
    pub description: String,
    pub age_limit: i32,
    pub release_date: String,
}
