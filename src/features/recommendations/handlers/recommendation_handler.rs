use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppQuery;
use crate::features::auth::guards::{RequireProfile, RequireStaff};
use crate::features::recommendations::dtos::{
    GenerateRecommendationQuery, RecommendationResponseDto,
};
use crate::features::recommendations::models::RecommendationTarget;
use crate::features::recommendations::services::RecommendationService;
use crate::shared::types::ApiResponse;

/// Get the cached recommendation for a location or desa
///
/// Returns `data: null` when nothing has been generated yet.
#[utoipa::path(
    get,
    path = "/api/recommendations/{target}/{id}",
    params(
        ("target" = RecommendationTarget, Path, description = "`location` or `desa`"),
        ("id" = Uuid, Path, description = "Target ID")
    ),
    responses(
        (status = 200, description = "Cached recommendation or null", body = ApiResponse<RecommendationResponseDto>),
        (status = 404, description = "Target not found or not approved")
    ),
    tag = "recommendations"
)]
pub async fn get_recommendation(
    State(service): State<Arc<RecommendationService>>,
    Path((target, id)): Path<(RecommendationTarget, Uuid)>,
) -> Result<Json<ApiResponse<RecommendationResponseDto>>> {
    let cached = service.get_cached(target, id).await?;
    let message = cached
        .is_none()
        .then(|| "Rekomendasi belum tersedia".to_string());
    Ok(Json(ApiResponse::success(cached, message, None)))
}

/// Generate a recommendation
///
/// Serves the cached result unless `force=true`. A failed narration returns
/// the fallback with `is_fallback: true` and leaves the cache untouched.
#[utoipa::path(
    post,
    path = "/api/recommendations/{target}/{id}",
    params(
        ("target" = RecommendationTarget, Path, description = "`location` or `desa`"),
        ("id" = Uuid, Path, description = "Target ID"),
        GenerateRecommendationQuery
    ),
    responses(
        (status = 200, description = "Recommendation", body = ApiResponse<RecommendationResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Profile required, or force requested by a non-staff account"),
        (status = 404, description = "Target not found or not approved")
    ),
    security(("bearer_auth" = [])),
    tag = "recommendations"
)]
pub async fn generate_recommendation(
    RequireProfile(actor): RequireProfile,
    State(service): State<Arc<RecommendationService>>,
    Path((target, id)): Path<(RecommendationTarget, Uuid)>,
    AppQuery(query): AppQuery<GenerateRecommendationQuery>,
) -> Result<Json<ApiResponse<RecommendationResponseDto>>> {
    let dto = service.generate(target, id, &actor, query.force).await?;
    let message = if dto.is_fallback {
        "Rekomendasi AI sedang tidak tersedia, menampilkan rekomendasi umum"
    } else if dto.cached {
        "Rekomendasi diambil dari cache"
    } else {
        "Rekomendasi berhasil dibuat"
    };
    Ok(Json(ApiResponse::success(
        Some(dto),
        Some(message.to_string()),
        None,
    )))
}

/// Clear a cached recommendation (staff)
#[utoipa::path(
    delete,
    path = "/api/recommendations/{target}/{id}",
    params(
        ("target" = RecommendationTarget, Path, description = "`location` or `desa`"),
        ("id" = Uuid, Path, description = "Target ID")
    ),
    responses(
        (status = 200, description = "Cache cleared"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Target not found")
    ),
    security(("bearer_auth" = [])),
    tag = "recommendations"
)]
pub async fn invalidate_recommendation(
    RequireStaff(actor): RequireStaff,
    State(service): State<Arc<RecommendationService>>,
    Path((target, id)): Path<(RecommendationTarget, Uuid)>,
) -> Result<Json<ApiResponse<()>>> {
    service.invalidate(target, id, &actor).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Cache rekomendasi dihapus".to_string()),
        None,
    )))
}
