use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::error::{AppError, Result};
use crate::features::auth::model::Actor;
use crate::features::files::models::{ImagePurpose, StoredFile};
use crate::modules::storage::MinIOClient;

/// Image uploads backed by the object store, with metadata in `files`
pub struct FileService {
    pool: PgPool,
    minio_client: Arc<MinIOClient>,
}

impl FileService {
    pub fn new(pool: PgPool, minio_client: Arc<MinIOClient>) -> Self {
        Self { pool, minio_client }
    }

    /// Upload an image already checked by `check_image`
    pub async fn upload_image(
        &self,
        actor: &Actor,
        data: &[u8],
        original_filename: &str,
        content_type: &str,
        extension: &str,
        purpose: ImagePurpose,
    ) -> Result<StoredFile> {
        let file_key = self
            .minio_client
            .generate_key(purpose.as_str(), actor.user_id, extension);

        self.minio_client
            .upload(&file_key, data, content_type)
            .await?;
        debug!("Image uploaded: {}", file_key);

        let url = self.minio_client.get_file_url(&file_key);

        let file = sqlx::query_as::<_, StoredFile>(
            r#"
            INSERT INTO files (file_key, original_filename, content_type, file_size, url, purpose, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&file_key)
        .bind(original_filename)
        .bind(content_type)
        .bind(data.len() as i64)
        .bind(&url)
        .bind(purpose.as_str())
        .bind(actor.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to save metadata for {}: {:?}", file_key, e);
            AppError::Database(e)
        })?;

        info!(
            "File saved: id={}, key={}, size={}, by={}",
            file.id, file.file_key, file.file_size, actor.username
        );
        Ok(file)
    }

    /// Delete an image by its public URL. Uploaders may delete their own
    /// images; staff may delete any.
    pub async fn delete_by_url(&self, url: &str, actor: &Actor) -> Result<()> {
        if self.minio_client.extract_key_from_url(url).is_none() {
            return Err(AppError::BadRequest(
                "URL bukan file yang dikelola layanan ini".to_string(),
            ));
        }

        let file = sqlx::query_as::<_, StoredFile>(
            "SELECT * FROM files WHERE url = $1 AND is_active = TRUE",
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("File tidak ditemukan".to_string()))?;

        if file.uploaded_by != actor.user_id && !actor.is_staff() {
            return Err(AppError::Forbidden(
                "Anda tidak berhak menghapus file ini".to_string(),
            ));
        }

        self.minio_client.delete(&file.file_key).await?;
        debug!("Image removed from storage: {}", file.file_key);

        sqlx::query("UPDATE files SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(file.id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        info!(
            "File soft deleted: id={}, key={}, by={}",
            file.id, file.file_key, actor.username
        );
        Ok(())
    }
}
