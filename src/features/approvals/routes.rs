use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::approvals::handlers;
use crate::features::approvals::services::ApprovalService;

/// Staff review queue. Requires the auth middleware.
pub fn routes(approval_service: Arc<ApprovalService>) -> Router {
    Router::new()
        .route("/api/approvals", get(handlers::list_approvals))
        .route("/api/approvals/stats", get(handlers::approval_stats))
        .route(
            "/api/approvals/{id}/approve",
            post(handlers::approve_approval),
        )
        .route("/api/approvals/{id}/reject", post(handlers::reject_approval))
        .with_state(approval_service)
}
