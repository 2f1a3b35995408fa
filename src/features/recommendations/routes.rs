use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::recommendations::handlers;
use crate::features::recommendations::services::RecommendationService;

/// Cached reads, no auth
pub fn public_routes(service: Arc<RecommendationService>) -> Router {
    Router::new()
        .route(
            "/api/recommendations/{target}/{id}",
            get(handlers::get_recommendation),
        )
        .with_state(service)
}

/// Generation and invalidation (require auth middleware to be applied by caller)
pub fn routes(service: Arc<RecommendationService>) -> Router {
    Router::new()
        .route(
            "/api/recommendations/{target}/{id}",
            post(handlers::generate_recommendation).delete(handlers::invalidate_recommendation),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::access::UserRole;
    use crate::features::recommendations::services::RecommendationEngine;
    use crate::shared::test_helpers::{lazy_pool, user_with_role, user_without_profile, with_user};
    use axum::http::StatusCode;
    use axum_test::TestServer;

    fn service() -> Arc<RecommendationService> {
        Arc::new(RecommendationService::new(
            lazy_pool(),
            Arc::new(RecommendationEngine::new(None)),
        ))
    }

    fn protected(user: crate::features::auth::model::AuthenticatedUser) -> TestServer {
        TestServer::new(with_user(routes(service()), user)).unwrap()
    }

    #[tokio::test]
    async fn test_force_regeneration_is_staff_only() {
        let response = protected(user_with_role(UserRole::User))
            .post(&format!("/api/recommendations/location/{}", uuid::Uuid::new_v4()))
            .add_query_param("force", "true")
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_invalidate_is_staff_only() {
        protected(user_with_role(UserRole::User))
            .delete(&format!("/api/recommendations/desa/{}", uuid::Uuid::new_v4()))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_generation_requires_profile() {
        protected(user_without_profile())
            .post(&format!("/api/recommendations/desa/{}", uuid::Uuid::new_v4()))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_target_is_rejected() {
        let server = TestServer::new(public_routes(service())).unwrap();
        let response = server
            .get(&format!("/api/recommendations/kabupaten/{}", uuid::Uuid::new_v4()))
            .await;
        assert!(response.status_code().is_client_error());
    }
}
