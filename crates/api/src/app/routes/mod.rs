use axum::{
    Router,
    routing::{get, post},
};

pub mod movies;
pub mod system;
pub mod users;

/// Router for all endpoints that run on a reconciled resource handle.
pub fn router() -> Router {
    Router::new()
        .route("/users", get(users::list_users))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/user/register", post(users::register))
        .route("/user/login", post(users::login))
        .route(
            "/user/admin-status/:id",
            get(users::get_admin_status).put(users::set_admin_status),
        )
        .route("/user/:id", get(users::get_nickname))
        .nest("/movies", movies::router())
}
