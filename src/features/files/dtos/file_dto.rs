use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::files::models::{ImagePurpose, StoredFile};
use crate::shared::constants::{ALLOWED_IMAGE_TYPES, MAX_IMAGE_SIZE};

/// Multipart form for Swagger UI; the handler reads `Multipart` directly
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadImageDto {
    /// JPEG, PNG, WebP or GIF, at most 5 MB
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
    /// `location`, `investment`, `desa` or `general`
    #[schema(example = "location")]
    pub purpose: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileResponseDto {
    pub id: Uuid,
    pub original_filename: String,
    pub content_type: String,
    pub file_size: i64,
    /// Public URL to store on the location, investment or desa
    pub url: String,
    pub purpose: ImagePurpose,
    pub created_at: DateTime<Utc>,
}

impl From<StoredFile> for FileResponseDto {
    fn from(file: StoredFile) -> Self {
        Self {
            id: file.id,
            original_filename: file.original_filename,
            content_type: file.content_type,
            file_size: file.file_size,
            url: file.url,
            purpose: ImagePurpose::parse(&file.purpose),
            created_at: file.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DeleteFileByUrlDto {
    #[validate(url(message = "URL tidak valid"))]
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteFileResponseDto {
    pub deleted: bool,
}

/// Check an upload against the accepted image types and size limit,
/// returning the file extension to store it under
pub fn check_image(content_type: &str, size: usize) -> Result<&'static str> {
    if size == 0 {
        return Err(AppError::BadRequest("File kosong".to_string()));
    }
    if size > MAX_IMAGE_SIZE {
        return Err(AppError::BadRequest(format!(
            "Ukuran file maksimal {} MB",
            MAX_IMAGE_SIZE / 1024 / 1024
        )));
    }
    ALLOWED_IMAGE_TYPES
        .iter()
        .find(|(mime, _)| *mime == content_type)
        .map(|(_, ext)| *ext)
        .ok_or_else(|| {
            let allowed: Vec<&str> = ALLOWED_IMAGE_TYPES.iter().map(|(m, _)| *m).collect();
            AppError::BadRequest(format!(
                "Tipe file '{}' tidak didukung. Gunakan: {}",
                content_type,
                allowed.join(", ")
            ))
        })
}
