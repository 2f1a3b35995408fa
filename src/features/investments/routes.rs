use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::approvals::ApprovalService;
use crate::features::investments::handlers::{self, InvestmentState};
use crate::features::investments::services::InvestmentService;

pub fn public_routes(
    investment_service: Arc<InvestmentService>,
    approval_service: Arc<ApprovalService>,
) -> Router {
    Router::new()
        .route("/api/investments", get(handlers::list_investments))
        .route("/api/investments/{id}", get(handlers::get_investment))
        .with_state(InvestmentState {
            investment_service,
            approval_service,
        })
}

/// Requires the auth middleware
pub fn routes(
    investment_service: Arc<InvestmentService>,
    approval_service: Arc<ApprovalService>,
) -> Router {
    Router::new()
        .route("/api/investments", post(handlers::create_investment))
        .route("/api/investments/mine", get(handlers::list_my_investments))
        .route(
            "/api/admin/investments",
            get(handlers::admin_list_investments),
        )
        .route(
            "/api/admin/investments/{id}",
            put(handlers::update_investment).delete(handlers::delete_investment),
        )
        .route(
            "/api/admin/investments/{id}/approve",
            post(handlers::approve_investment),
        )
        .route(
            "/api/admin/investments/{id}/reject",
            post(handlers::reject_investment),
        )
        .with_state(InvestmentState {
            investment_service,
            approval_service,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::access::UserRole;
    use crate::shared::test_helpers::{lazy_pool, user_with_role, with_user};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    fn server(role: UserRole) -> TestServer {
        let pool = lazy_pool();
        let router = routes(
            Arc::new(InvestmentService::new(pool.clone())),
            Arc::new(ApprovalService::new(pool)),
        );
        TestServer::new(with_user(router, user_with_role(role))).unwrap()
    }

    #[tokio::test]
    async fn test_negative_value_is_rejected() {
        let response = server(UserRole::User)
            .post("/api/investments")
            .json(&json!({
                "title": "Tambak udang vaname",
                "sector": "perikanan",
                "kecamatan": "Sudimoro",
                "desa": "Sukorejo",
                "description": "Tambak 2 ha",
                "estimated_value": "-5000"
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_admin_cannot_be_bypassed_by_users() {
        let server = server(UserRole::User);
        let id = uuid::Uuid::new_v4();
        server
            .put(&format!("/api/admin/investments/{}", id))
            .json(&json!({"title": "Baru"}))
            .await
            .assert_status(StatusCode::FORBIDDEN);
        server
            .post(&format!("/api/admin/investments/{}/reject", id))
            .json(&json!({"reason": "duplikat"}))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }
}
