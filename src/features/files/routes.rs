use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, post},
    Router,
};
use std::sync::Arc;

use crate::features::files::handlers::{delete_file_by_url, upload_file};
use crate::features::files::services::FileService;
use crate::shared::constants::MAX_IMAGE_SIZE;

/// Upload and delete routes (require auth middleware to be applied by caller)
pub fn routes(file_service: Arc<FileService>) -> Router {
    Router::new()
        .route(
            "/api/files/upload",
            // room for multipart framing on top of the image
            post(upload_file).layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + 1024 * 1024)),
        )
        .route("/api/files", delete(delete_file_by_url))
        .with_state(file_service)
}
