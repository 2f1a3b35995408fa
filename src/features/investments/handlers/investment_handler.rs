use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::access::Action;
use crate::features::approvals::dtos::{RejectSubmissionDto, ReviewResultDto};
use crate::features::approvals::models::{RecordStatus, ReviewDecision, SubmissionKind};
use crate::features::approvals::ApprovalService;
use crate::features::auth::guards::{RequireProfile, RequireStaff};
use crate::features::investments::dtos::{
    CreateInvestmentDto, InvestmentQueryParams, InvestmentResponseDto, UpdateInvestmentDto,
};
use crate::features::investments::models::InvestmentFilter;
use crate::features::investments::services::InvestmentService;
use crate::shared::types::{ApiResponse, Meta};

#[derive(Clone)]
pub struct InvestmentState {
    pub investment_service: Arc<InvestmentService>,
    pub approval_service: Arc<ApprovalService>,
}

async fn list_with(
    state: &InvestmentState,
    filter: InvestmentFilter,
    params: &InvestmentQueryParams,
) -> Result<Json<ApiResponse<Vec<InvestmentResponseDto>>>> {
    let (items, total) = state
        .investment_service
        .list(&filter, &params.pagination())
        .await?;
    let dtos: Vec<InvestmentResponseDto> = items.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta::total(total)),
    )))
}

/// List approved investment opportunities (public)
#[utoipa::path(
    get,
    path = "/api/investments",
    params(InvestmentQueryParams),
    responses(
        (status = 200, description = "Approved investments", body = ApiResponse<Vec<InvestmentResponseDto>>)
    ),
    tag = "investments"
)]
pub async fn list_investments(
    State(state): State<InvestmentState>,
    AppQuery(params): AppQuery<InvestmentQueryParams>,
) -> Result<Json<ApiResponse<Vec<InvestmentResponseDto>>>> {
    let filter = InvestmentFilter {
        status: Some(RecordStatus::Approved),
        ..params.filter()
    };
    list_with(&state, filter, &params).await
}

/// Get an approved investment opportunity (public)
#[utoipa::path(
    get,
    path = "/api/investments/{id}",
    params(("id" = Uuid, Path, description = "Investment ID")),
    responses(
        (status = 200, description = "Investment found", body = ApiResponse<InvestmentResponseDto>),
        (status = 404, description = "Investment not found")
    ),
    tag = "investments"
)]
pub async fn get_investment(
    State(state): State<InvestmentState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<InvestmentResponseDto>>> {
    let investment = state.investment_service.get_approved(id).await?;
    Ok(Json(ApiResponse::success(Some(investment.into()), None, None)))
}

/// Submit an investment opportunity
#[utoipa::path(
    post,
    path = "/api/investments",
    request_body = CreateInvestmentDto,
    responses(
        (status = 201, description = "Investment created", body = ApiResponse<InvestmentResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Profile required")
    ),
    security(("bearer_auth" = [])),
    tag = "investments"
)]
pub async fn create_investment(
    RequireProfile(actor): RequireProfile,
    State(state): State<InvestmentState>,
    AppJson(dto): AppJson<CreateInvestmentDto>,
) -> Result<(StatusCode, Json<ApiResponse<InvestmentResponseDto>>)> {
    actor.authorize(Action::SubmitContent)?;
    dto.validate()?;

    let investment = state.investment_service.create(&actor, dto).await?;
    let message = match investment.status {
        RecordStatus::Pending => "Peluang investasi berhasil diajukan dan menunggu persetujuan",
        _ => "Peluang investasi berhasil ditambahkan",
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(investment.into()),
            Some(message.to_string()),
            None,
        )),
    ))
}

/// List the caller's own submissions in every status
#[utoipa::path(
    get,
    path = "/api/investments/mine",
    params(InvestmentQueryParams),
    responses(
        (status = 200, description = "Own investments", body = ApiResponse<Vec<InvestmentResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Profile required")
    ),
    security(("bearer_auth" = [])),
    tag = "investments"
)]
pub async fn list_my_investments(
    RequireProfile(actor): RequireProfile,
    State(state): State<InvestmentState>,
    AppQuery(params): AppQuery<InvestmentQueryParams>,
) -> Result<Json<ApiResponse<Vec<InvestmentResponseDto>>>> {
    actor.authorize(Action::ViewOwnSubmissions)?;
    let filter = InvestmentFilter {
        status: params.status,
        created_by: Some(actor.user_id),
        ..params.filter()
    };
    list_with(&state, filter, &params).await
}

/// List investment opportunities in any status (staff)
#[utoipa::path(
    get,
    path = "/api/admin/investments",
    params(InvestmentQueryParams),
    responses(
        (status = 200, description = "All investments", body = ApiResponse<Vec<InvestmentResponseDto>>),
        (status = 403, description = "Staff only")
    ),
    security(("bearer_auth" = [])),
    tag = "investments"
)]
pub async fn admin_list_investments(
    RequireStaff(actor): RequireStaff,
    State(state): State<InvestmentState>,
    AppQuery(params): AppQuery<InvestmentQueryParams>,
) -> Result<Json<ApiResponse<Vec<InvestmentResponseDto>>>> {
    actor.authorize(Action::ViewAllContent)?;
    let filter = InvestmentFilter {
        status: params.status,
        ..params.filter()
    };
    list_with(&state, filter, &params).await
}

/// Edit an investment opportunity (staff)
#[utoipa::path(
    put,
    path = "/api/admin/investments/{id}",
    params(("id" = Uuid, Path, description = "Investment ID")),
    request_body = UpdateInvestmentDto,
    responses(
        (status = 200, description = "Investment updated", body = ApiResponse<InvestmentResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Investment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "investments"
)]
pub async fn update_investment(
    RequireStaff(actor): RequireStaff,
    State(state): State<InvestmentState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateInvestmentDto>,
) -> Result<Json<ApiResponse<InvestmentResponseDto>>> {
    actor.authorize(Action::ManageCatalog)?;
    dto.validate()?;
    let investment = state.investment_service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(investment.into()),
        Some("Peluang investasi berhasil diperbarui".to_string()),
        None,
    )))
}

/// Delete an investment opportunity and its queue entries (staff)
#[utoipa::path(
    delete,
    path = "/api/admin/investments/{id}",
    params(("id" = Uuid, Path, description = "Investment ID")),
    responses(
        (status = 200, description = "Investment deleted"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Investment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "investments"
)]
pub async fn delete_investment(
    RequireStaff(actor): RequireStaff,
    State(state): State<InvestmentState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    actor.authorize(Action::DeleteContent)?;
    state.investment_service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Peluang investasi berhasil dihapus".to_string()),
        None,
    )))
}

/// Approve a pending investment opportunity (staff)
#[utoipa::path(
    post,
    path = "/api/admin/investments/{id}/approve",
    params(("id" = Uuid, Path, description = "Investment ID")),
    responses(
        (status = 200, description = "Approved", body = ApiResponse<ReviewResultDto>),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Investment not found"),
        (status = 409, description = "Already reviewed")
    ),
    security(("bearer_auth" = [])),
    tag = "investments"
)]
pub async fn approve_investment(
    RequireStaff(actor): RequireStaff,
    State(state): State<InvestmentState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReviewResultDto>>> {
    actor.authorize(Action::ReviewSubmission)?;
    let result = state
        .approval_service
        .review_target(SubmissionKind::Investment, id, &actor, ReviewDecision::Approve)
        .await?;
    Ok(Json(ApiResponse::success(
        Some(result),
        Some("Peluang investasi disetujui".to_string()),
        None,
    )))
}

/// Reject a pending investment opportunity with a reason (staff)
#[utoipa::path(
    post,
    path = "/api/admin/investments/{id}/reject",
    params(("id" = Uuid, Path, description = "Investment ID")),
    request_body = RejectSubmissionDto,
    responses(
        (status = 200, description = "Rejected", body = ApiResponse<ReviewResultDto>),
        (status = 400, description = "Missing reason"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Investment not found"),
        (status = 409, description = "Already reviewed")
    ),
    security(("bearer_auth" = [])),
    tag = "investments"
)]
pub async fn reject_investment(
    RequireStaff(actor): RequireStaff,
    State(state): State<InvestmentState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<RejectSubmissionDto>,
) -> Result<Json<ApiResponse<ReviewResultDto>>> {
    actor.authorize(Action::ReviewSubmission)?;
    dto.validate()?;
    let decision = ReviewDecision::reject(&dto.reason)?;
    let result = state
        .approval_service
        .review_target(SubmissionKind::Investment, id, &actor, decision)
        .await?;
    Ok(Json(ApiResponse::success(
        Some(result),
        Some("Peluang investasi ditolak".to_string()),
        None,
    )))
}
