use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireProfile;
use crate::features::files::dtos::{
    check_image, DeleteFileByUrlDto, DeleteFileResponseDto, FileResponseDto, UploadImageDto,
};
use crate::features::files::models::ImagePurpose;
use crate::features::files::services::FileService;
use crate::shared::types::ApiResponse;

/// Upload an image
///
/// Multipart form with `file` (required) and `purpose` (optional).
/// The returned `url` is what catalog entries store as `image_url`.
#[utoipa::path(
    post,
    path = "/api/files/upload",
    tag = "files",
    request_body(
        content = UploadImageDto,
        content_type = "multipart/form-data",
        description = "Image file with optional purpose",
    ),
    responses(
        (status = 201, description = "Image uploaded", body = ApiResponse<FileResponseDto>),
        (status = 400, description = "Missing file, unsupported type or too large"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Profile required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_file(
    RequireProfile(actor): RequireProfile,
    State(service): State<Arc<FileService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<FileResponseDto>>)> {
    let mut file: Option<(Vec<u8>, String, String)> = None;
    let mut purpose = ImagePurpose::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Gagal membaca data multipart: {}", e))
    })? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let file_name = field.file_name().unwrap_or("gambar").to_string();
                let data = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Gagal membaca file: {}", e))
                })?;
                file = Some((data.to_vec(), file_name, content_type));
            }
            "purpose" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Gagal membaca purpose: {}", e))
                })?;
                purpose = ImagePurpose::parse(&text);
            }
            other => debug!("Ignoring multipart field: {}", other),
        }
    }

    let (data, file_name, content_type) =
        file.ok_or_else(|| AppError::BadRequest("File wajib diunggah".to_string()))?;
    let extension = check_image(&content_type, data.len())?;

    let stored = service
        .upload_image(&actor, &data, &file_name, &content_type, extension, purpose)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(stored.into()),
            Some("Gambar berhasil diunggah".to_string()),
            None,
        )),
    ))
}

/// Delete an image by URL
///
/// Allowed for the uploader and for staff.
#[utoipa::path(
    delete,
    path = "/api/files",
    tag = "files",
    request_body = DeleteFileByUrlDto,
    responses(
        (status = 200, description = "Image deleted", body = ApiResponse<DeleteFileResponseDto>),
        (status = 400, description = "Invalid URL"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the uploader"),
        (status = 404, description = "File not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_file_by_url(
    RequireProfile(actor): RequireProfile,
    State(service): State<Arc<FileService>>,
    AppJson(dto): AppJson<DeleteFileByUrlDto>,
) -> Result<Json<ApiResponse<DeleteFileResponseDto>>> {
    dto.validate()?;
    service.delete_by_url(&dto.url, &actor).await?;

    Ok(Json(ApiResponse::success(
        Some(DeleteFileResponseDto { deleted: true }),
        Some("File berhasil dihapus".to_string()),
        None,
    )))
}
