use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::desa::handlers;
use crate::features::desa::services::DesaService;

pub fn public_routes(desa_service: Arc<DesaService>) -> Router {
    Router::new()
        .route("/api/desa", get(handlers::list_desa))
        .route("/api/desa/{id}", get(handlers::get_desa))
        .with_state(desa_service)
}

/// Staff catalog management (require auth middleware to be applied by caller)
pub fn routes(desa_service: Arc<DesaService>) -> Router {
    Router::new()
        .route("/api/admin/desa", post(handlers::create_desa))
        .route(
            "/api/admin/desa/{id}",
            put(handlers::update_desa).delete(handlers::delete_desa),
        )
        .with_state(desa_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::access::UserRole;
    use crate::shared::test_helpers::{lazy_pool, user_with_role, with_user};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    #[tokio::test]
    async fn test_only_staff_manage_desa() {
        let router = routes(Arc::new(DesaService::new(lazy_pool())));
        let server = TestServer::new(with_user(router, user_with_role(UserRole::User))).unwrap();
        server
            .post("/api/admin/desa")
            .json(&json!({"name": "Watukarung", "kecamatan": "Pringkuku"}))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_invalid_ratings_rejected() {
        let router = routes(Arc::new(DesaService::new(lazy_pool())));
        let server = TestServer::new(with_user(router, user_with_role(UserRole::Admin))).unwrap();
        server
            .put(&format!("/api/admin/desa/{}", uuid::Uuid::new_v4()))
            .json(&json!({"infrastructure": {"internet": 7}}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
