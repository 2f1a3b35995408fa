use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::features::regions::dtos::{DesaNameDto, KecamatanResponseDto};
use crate::features::regions::services::RegionService;
use crate::shared::types::ApiResponse;

/// List the kecamatan of Kabupaten Pacitan with counts
#[utoipa::path(
    get,
    path = "/api/regions/kecamatan",
    responses(
        (status = 200, description = "All kecamatan", body = ApiResponse<Vec<KecamatanResponseDto>>)
    ),
    tag = "regions"
)]
pub async fn list_kecamatan(
    State(service): State<Arc<RegionService>>,
) -> Result<Json<ApiResponse<Vec<KecamatanResponseDto>>>> {
    let items = service.list_kecamatan().await?;
    let dtos: Vec<KecamatanResponseDto> = items.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// List the registered villages of a kecamatan
#[utoipa::path(
    get,
    path = "/api/regions/kecamatan/{name}/desa",
    params(("name" = String, Path, description = "Kecamatan name (case-insensitive)")),
    responses(
        (status = 200, description = "Villages", body = ApiResponse<Vec<DesaNameDto>>),
        (status = 404, description = "Not a kecamatan of Pacitan")
    ),
    tag = "regions"
)]
pub async fn list_desa_in_kecamatan(
    State(service): State<Arc<RegionService>>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<Vec<DesaNameDto>>>> {
    let items = service.list_desa(&name).await?;
    let dtos: Vec<DesaNameDto> = items.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}
