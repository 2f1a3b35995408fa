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
use crate::features::auth::guards::RequireStaff;
use crate::features::desa::dtos::{CreateDesaDto, DesaQueryParams, DesaResponseDto, UpdateDesaDto};
use crate::features::desa::services::DesaService;
use crate::shared::types::{ApiResponse, Meta};

/// List village profiles
#[utoipa::path(
    get,
    path = "/api/desa",
    params(DesaQueryParams),
    responses(
        (status = 200, description = "Village profiles", body = ApiResponse<Vec<DesaResponseDto>>)
    ),
    tag = "desa"
)]
pub async fn list_desa(
    State(service): State<Arc<DesaService>>,
    AppQuery(params): AppQuery<DesaQueryParams>,
) -> Result<Json<ApiResponse<Vec<DesaResponseDto>>>> {
    let (items, total) = service.list(&params).await?;
    let dtos: Vec<DesaResponseDto> = items.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta::total(total)),
    )))
}

#[utoipa::path(
    get,
    path = "/api/desa/{id}",
    params(("id" = Uuid, Path, description = "Desa ID")),
    responses(
        (status = 200, description = "Village profile", body = ApiResponse<DesaResponseDto>),
        (status = 404, description = "Desa not found")
    ),
    tag = "desa"
)]
pub async fn get_desa(
    State(service): State<Arc<DesaService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DesaResponseDto>>> {
    let desa = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(desa.into()), None, None)))
}

#[utoipa::path(
    post,
    path = "/api/admin/desa",
    request_body = CreateDesaDto,
    responses(
        (status = 201, description = "Desa created", body = ApiResponse<DesaResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Staff only"),
        (status = 409, description = "Desa already exists in this kecamatan")
    ),
    security(("bearer_auth" = [])),
    tag = "desa"
)]
pub async fn create_desa(
    RequireStaff(actor): RequireStaff,
    State(service): State<Arc<DesaService>>,
    AppJson(dto): AppJson<CreateDesaDto>,
) -> Result<(StatusCode, Json<ApiResponse<DesaResponseDto>>)> {
    actor.authorize(Action::ManageCatalog)?;
    dto.validate()?;
    let desa = service.create(&actor, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(desa.into()),
            Some("Profil desa berhasil ditambahkan".to_string()),
            None,
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/api/admin/desa/{id}",
    params(("id" = Uuid, Path, description = "Desa ID")),
    request_body = UpdateDesaDto,
    responses(
        (status = 200, description = "Desa updated", body = ApiResponse<DesaResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Desa not found"),
        (status = 409, description = "Desa already exists in this kecamatan")
    ),
    security(("bearer_auth" = [])),
    tag = "desa"
)]
pub async fn update_desa(
    RequireStaff(actor): RequireStaff,
    State(service): State<Arc<DesaService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateDesaDto>,
) -> Result<Json<ApiResponse<DesaResponseDto>>> {
    actor.authorize(Action::ManageCatalog)?;
    dto.validate()?;
    let desa = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(desa.into()),
        Some("Profil desa berhasil diperbarui".to_string()),
        None,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/admin/desa/{id}",
    params(("id" = Uuid, Path, description = "Desa ID")),
    responses(
        (status = 200, description = "Desa deleted"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Desa not found")
    ),
    security(("bearer_auth" = [])),
    tag = "desa"
)]
pub async fn delete_desa(
    RequireStaff(actor): RequireStaff,
    State(service): State<Arc<DesaService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    actor.authorize(Action::ManageCatalog)?;
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Profil desa berhasil dihapus".to_string()),
        None,
    )))
}
