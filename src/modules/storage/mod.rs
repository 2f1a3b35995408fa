//! Object storage for uploaded images (MinIO/S3-compatible).

mod minio_client;
mod sigv4;

pub use minio_client::MinIOClient;
