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
use crate::features::locations::dtos::{
    CreateLocationDto, LocationQueryParams, LocationResponseDto, UpdateLocationDto,
};
use crate::features::locations::models::LocationFilter;
use crate::features::locations::services::LocationService;
use crate::shared::types::{ApiResponse, Meta};

#[derive(Clone)]
pub struct LocationState {
    pub location_service: Arc<LocationService>,
    pub approval_service: Arc<ApprovalService>,
}

async fn list_with(
    state: &LocationState,
    filter: LocationFilter,
    params: &LocationQueryParams,
) -> Result<Json<ApiResponse<Vec<LocationResponseDto>>>> {
    let (items, total) = state
        .location_service
        .list(&filter, &params.pagination())
        .await?;
    let dtos: Vec<LocationResponseDto> = items.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta::total(total)),
    )))
}

/// List approved locations (public)
#[utoipa::path(
    get,
    path = "/api/locations",
    params(LocationQueryParams),
    responses(
        (status = 200, description = "Approved locations", body = ApiResponse<Vec<LocationResponseDto>>)
    ),
    tag = "locations"
)]
pub async fn list_locations(
    State(state): State<LocationState>,
    AppQuery(params): AppQuery<LocationQueryParams>,
) -> Result<Json<ApiResponse<Vec<LocationResponseDto>>>> {
    let filter = LocationFilter {
        status: Some(RecordStatus::Approved),
        ..params.filter()
    };
    list_with(&state, filter, &params).await
}

/// Get an approved location (public)
#[utoipa::path(
    get,
    path = "/api/locations/{id}",
    params(("id" = Uuid, Path, description = "Location ID")),
    responses(
        (status = 200, description = "Location found", body = ApiResponse<LocationResponseDto>),
        (status = 404, description = "Location not found")
    ),
    tag = "locations"
)]
pub async fn get_location(
    State(state): State<LocationState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<LocationResponseDto>>> {
    let location = state.location_service.get_approved(id).await?;
    Ok(Json(ApiResponse::success(Some(location.into()), None, None)))
}

/// Submit a location
///
/// Regular users' submissions start as `pending` and enter the review queue.
/// Admin and owner submissions are approved immediately.
#[utoipa::path(
    post,
    path = "/api/locations",
    request_body = CreateLocationDto,
    responses(
        (status = 201, description = "Location created", body = ApiResponse<LocationResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Profile required")
    ),
    security(("bearer_auth" = [])),
    tag = "locations"
)]
pub async fn create_location(
    RequireProfile(actor): RequireProfile,
    State(state): State<LocationState>,
    AppJson(dto): AppJson<CreateLocationDto>,
) -> Result<(StatusCode, Json<ApiResponse<LocationResponseDto>>)> {
    actor.authorize(Action::SubmitContent)?;
    dto.validate()?;

    let location = state.location_service.create(&actor, dto).await?;
    let message = match location.status {
        RecordStatus::Pending => "Lokasi berhasil diajukan dan menunggu persetujuan",
        _ => "Lokasi berhasil ditambahkan",
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(location.into()),
            Some(message.to_string()),
            None,
        )),
    ))
}

/// List the caller's own submissions in every status
#[utoipa::path(
    get,
    path = "/api/locations/mine",
    params(LocationQueryParams),
    responses(
        (status = 200, description = "Own locations", body = ApiResponse<Vec<LocationResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Profile required")
    ),
    security(("bearer_auth" = [])),
    tag = "locations"
)]
pub async fn list_my_locations(
    RequireProfile(actor): RequireProfile,
    State(state): State<LocationState>,
    AppQuery(params): AppQuery<LocationQueryParams>,
) -> Result<Json<ApiResponse<Vec<LocationResponseDto>>>> {
    actor.authorize(Action::ViewOwnSubmissions)?;
    let filter = LocationFilter {
        status: params.status,
        created_by: Some(actor.user_id),
        ..params.filter()
    };
    list_with(&state, filter, &params).await
}

/// List locations in any status (staff)
#[utoipa::path(
    get,
    path = "/api/admin/locations",
    params(LocationQueryParams),
    responses(
        (status = 200, description = "All locations", body = ApiResponse<Vec<LocationResponseDto>>),
        (status = 403, description = "Staff only")
    ),
    security(("bearer_auth" = [])),
    tag = "locations"
)]
pub async fn admin_list_locations(
    RequireStaff(actor): RequireStaff,
    State(state): State<LocationState>,
    AppQuery(params): AppQuery<LocationQueryParams>,
) -> Result<Json<ApiResponse<Vec<LocationResponseDto>>>> {
    actor.authorize(Action::ViewAllContent)?;
    let filter = LocationFilter {
        status: params.status,
        ..params.filter()
    };
    list_with(&state, filter, &params).await
}

/// Edit a location (staff)
#[utoipa::path(
    put,
    path = "/api/admin/locations/{id}",
    params(("id" = Uuid, Path, description = "Location ID")),
    request_body = UpdateLocationDto,
    responses(
        (status = 200, description = "Location updated", body = ApiResponse<LocationResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Location not found")
    ),
    security(("bearer_auth" = [])),
    tag = "locations"
)]
pub async fn update_location(
    RequireStaff(actor): RequireStaff,
    State(state): State<LocationState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateLocationDto>,
) -> Result<Json<ApiResponse<LocationResponseDto>>> {
    actor.authorize(Action::ManageCatalog)?;
    dto.validate()?;
    let location = state.location_service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(location.into()),
        Some("Lokasi berhasil diperbarui".to_string()),
        None,
    )))
}

/// Delete a location and its queue entries (staff)
#[utoipa::path(
    delete,
    path = "/api/admin/locations/{id}",
    params(("id" = Uuid, Path, description = "Location ID")),
    responses(
        (status = 200, description = "Location deleted"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Location not found")
    ),
    security(("bearer_auth" = [])),
    tag = "locations"
)]
pub async fn delete_location(
    RequireStaff(actor): RequireStaff,
    State(state): State<LocationState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    actor.authorize(Action::DeleteContent)?;
    state.location_service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Lokasi berhasil dihapus".to_string()),
        None,
    )))
}

/// Approve a pending location (staff)
#[utoipa::path(
    post,
    path = "/api/admin/locations/{id}/approve",
    params(("id" = Uuid, Path, description = "Location ID")),
    responses(
        (status = 200, description = "Approved", body = ApiResponse<ReviewResultDto>),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Location not found"),
        (status = 409, description = "Already reviewed")
    ),
    security(("bearer_auth" = [])),
    tag = "locations"
)]
pub async fn approve_location(
    RequireStaff(actor): RequireStaff,
    State(state): State<LocationState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReviewResultDto>>> {
    actor.authorize(Action::ReviewSubmission)?;
    let result = state
        .approval_service
        .review_target(SubmissionKind::Location, id, &actor, ReviewDecision::Approve)
        .await?;
    Ok(Json(ApiResponse::success(
        Some(result),
        Some("Lokasi disetujui".to_string()),
        None,
    )))
}

/// Reject a pending location with a reason (staff)
#[utoipa::path(
    post,
    path = "/api/admin/locations/{id}/reject",
    params(("id" = Uuid, Path, description = "Location ID")),
    request_body = RejectSubmissionDto,
    responses(
        (status = 200, description = "Rejected", body = ApiResponse<ReviewResultDto>),
        (status = 400, description = "Missing reason"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Location not found"),
        (status = 409, description = "Already reviewed")
    ),
    security(("bearer_auth" = [])),
    tag = "locations"
)]
pub async fn reject_location(
    RequireStaff(actor): RequireStaff,
    State(state): State<LocationState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<RejectSubmissionDto>,
) -> Result<Json<ApiResponse<ReviewResultDto>>> {
    actor.authorize(Action::ReviewSubmission)?;
    dto.validate()?;
    let decision = ReviewDecision::reject(&dto.reason)?;
    let result = state
        .approval_service
        .review_target(SubmissionKind::Location, id, &actor, decision)
        .await?;
    Ok(Json(ApiResponse::success(
        Some(result),
        Some("Lokasi ditolak".to_string()),
        None,
    )))
}
