use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::users::handlers;
use crate::features::users::services::UserService;

pub fn public_routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route(
            "/api/usernames/{username}/availability",
            get(handlers::username_availability),
        )
        .with_state(service)
}

/// Profile and owner routes (require auth middleware to be applied by caller)
pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/users/profile", post(handlers::register_profile))
        .route("/api/users/me", get(handlers::get_me))
        .route("/api/admin/users", get(handlers::list_users))
        .route("/api/admin/users/{id}/role", patch(handlers::change_role))
        .route("/api/admin/delete-user", post(handlers::delete_user))
        .with_state(service)
}
