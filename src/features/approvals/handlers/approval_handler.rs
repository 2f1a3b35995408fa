use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::approvals::dtos::{
    ApprovalQueryParams, ApprovalResponseDto, ApprovalStatsDto, RejectSubmissionDto,
    ReviewResultDto,
};
use crate::features::approvals::models::ReviewDecision;
use crate::features::approvals::services::ApprovalService;
use crate::features::access::Action;
use crate::features::auth::guards::RequireStaff;
use crate::shared::types::{ApiResponse, Meta};

/// List the review queue (staff)
#[utoipa::path(
    get,
    path = "/api/approvals",
    params(ApprovalQueryParams),
    responses(
        (status = 200, description = "Queue entries", body = ApiResponse<Vec<ApprovalResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only")
    ),
    security(("bearer_auth" = [])),
    tag = "approvals"
)]
pub async fn list_approvals(
    RequireStaff(actor): RequireStaff,
    State(service): State<Arc<ApprovalService>>,
    AppQuery(params): AppQuery<ApprovalQueryParams>,
) -> Result<Json<ApiResponse<Vec<ApprovalResponseDto>>>> {
    actor.authorize(Action::ReviewSubmission)?;
    let (items, total) = service.list(&params).await?;
    let dtos: Vec<ApprovalResponseDto> = items.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta::total(total)),
    )))
}

/// Submission counts by status (staff)
#[utoipa::path(
    get,
    path = "/api/approvals/stats",
    responses(
        (status = 200, description = "Counts", body = ApiResponse<ApprovalStatsDto>),
        (status = 403, description = "Staff only")
    ),
    security(("bearer_auth" = [])),
    tag = "approvals"
)]
pub async fn approval_stats(
    RequireStaff(_actor): RequireStaff,
    State(service): State<Arc<ApprovalService>>,
) -> Result<Json<ApiResponse<ApprovalStatsDto>>> {
    let stats = service.stats().await?;
    Ok(Json(ApiResponse::success(Some(stats), None, None)))
}

/// Approve a queued submission
#[utoipa::path(
    post,
    path = "/api/approvals/{id}/approve",
    params(("id" = Uuid, Path, description = "Approval ID")),
    responses(
        (status = 200, description = "Approved", body = ApiResponse<ReviewResultDto>),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Approval not found"),
        (status = 409, description = "Already reviewed")
    ),
    security(("bearer_auth" = [])),
    tag = "approvals"
)]
pub async fn approve_approval(
    RequireStaff(actor): RequireStaff,
    State(service): State<Arc<ApprovalService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReviewResultDto>>> {
    actor.authorize(Action::ReviewSubmission)?;
    let result = service.review(id, &actor, ReviewDecision::Approve).await?;
    Ok(Json(ApiResponse::success(
        Some(result),
        Some("Pengajuan disetujui".to_string()),
        None,
    )))
}

/// Reject a queued submission with a reason
#[utoipa::path(
    post,
    path = "/api/approvals/{id}/reject",
    params(("id" = Uuid, Path, description = "Approval ID")),
    request_body = RejectSubmissionDto,
    responses(
        (status = 200, description = "Rejected", body = ApiResponse<ReviewResultDto>),
        (status = 400, description = "Missing reason"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Approval not found"),
        (status = 409, description = "Already reviewed")
    ),
    security(("bearer_auth" = [])),
    tag = "approvals"
)]
pub async fn reject_approval(
    RequireStaff(actor): RequireStaff,
    State(service): State<Arc<ApprovalService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<RejectSubmissionDto>,
) -> Result<Json<ApiResponse<ReviewResultDto>>> {
    actor.authorize(Action::ReviewSubmission)?;
    dto.validate()?;
    let decision = ReviewDecision::reject(&dto.reason)?;
    let result = service.review(id, &actor, decision).await?;
    Ok(Json(ApiResponse::success(
        Some(result),
        Some("Pengajuan ditolak".to_string()),
        None,
    )))
}
