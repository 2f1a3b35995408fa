use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::approvals::ApprovalService;
use crate::features::locations::handlers::{self, LocationState};
use crate::features::locations::services::LocationService;

fn state(
    location_service: Arc<LocationService>,
    approval_service: Arc<ApprovalService>,
) -> LocationState {
    LocationState {
        location_service,
        approval_service,
    }
}

/// Approved catalog, no auth
pub fn public_routes(
    location_service: Arc<LocationService>,
    approval_service: Arc<ApprovalService>,
) -> Router {
    Router::new()
        .route("/api/locations", get(handlers::list_locations))
        .route("/api/locations/{id}", get(handlers::get_location))
        .with_state(state(location_service, approval_service))
}

/// Submission and staff routes (require auth middleware to be applied by caller)
pub fn routes(
    location_service: Arc<LocationService>,
    approval_service: Arc<ApprovalService>,
) -> Router {
    Router::new()
        .route("/api/locations", post(handlers::create_location))
        .route("/api/locations/mine", get(handlers::list_my_locations))
        .route("/api/admin/locations", get(handlers::admin_list_locations))
        .route(
            "/api/admin/locations/{id}",
            put(handlers::update_location).delete(handlers::delete_location),
        )
        .route(
            "/api/admin/locations/{id}/approve",
            post(handlers::approve_location),
        )
        .route(
            "/api/admin/locations/{id}/reject",
            post(handlers::reject_location),
        )
        .with_state(state(location_service, approval_service))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::access::UserRole;
    use crate::shared::test_helpers::{lazy_pool, user_with_role, user_without_profile, with_user};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    fn protected(user: crate::features::auth::model::AuthenticatedUser) -> TestServer {
        let pool = lazy_pool();
        let router = routes(
            Arc::new(LocationService::new(pool.clone())),
            Arc::new(ApprovalService::new(pool)),
        );
        TestServer::new(with_user(router, user)).unwrap()
    }

    #[tokio::test]
    async fn test_submission_requires_profile() {
        protected(user_without_profile())
            .post("/api/locations")
            .json(&json!({}))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_invalid_submission_is_rejected_before_storage() {
        let response = protected(user_with_role(UserRole::User))
            .post("/api/locations")
            .json(&json!({
                "name": "Goa Gong",
                "type": "wisata",
                "kecamatan": "Yogyakarta",
                "desa": "Bomo",
                "description": "Goa kapur",
                "latitude": -8.1,
                "longitude": 111.0
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_staff_routes_refuse_regular_users() {
        let server = protected(user_with_role(UserRole::User));
        let id = uuid::Uuid::new_v4();
        server
            .get("/api/admin/locations")
            .await
            .assert_status(StatusCode::FORBIDDEN);
        server
            .delete(&format!("/api/admin/locations/{}", id))
            .await
            .assert_status(StatusCode::FORBIDDEN);
        server
            .post(&format!("/api/admin/locations/{}/approve", id))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_reject_requires_reason() {
        protected(user_with_role(UserRole::Owner))
            .post(&format!("/api/admin/locations/{}/reject", uuid::Uuid::new_v4()))
            .json(&json!({"reason": ""}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
