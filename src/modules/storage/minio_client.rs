//! MinIO/S3-compatible image storage.
//!
//! Every object lives under a single public-read prefix, so stored images are
//! served straight from the public endpoint without presigning.

use chrono::Utc;
use reqwest::{Client, Url};
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::sigv4;
use crate::core::config::MinIOConfig;
use crate::core::error::AppError;

/// Builds and parses public object URLs
#[derive(Debug, Clone)]
pub struct ObjectUrls {
    endpoint: String,
    public_endpoint: String,
    bucket: String,
}

impl ObjectUrls {
    pub fn new(endpoint: &str, public_endpoint: &str, bucket: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            public_endpoint: public_endpoint.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
        }
    }

    pub fn url_for(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_endpoint, self.bucket, key)
    }

    /// Object key for a URL produced by either endpoint of this bucket
    pub fn key_from_url(&self, url: &str) -> Option<String> {
        [&self.public_endpoint, &self.endpoint]
            .into_iter()
            .find_map(|base| url.strip_prefix(&format!("{}/{}/", base, self.bucket)))
            .map(|key| key.split(['?', '#']).next().unwrap_or(key).to_string())
            .filter(|key| !key.is_empty())
    }
}

pub struct MinIOClient {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    endpoint: String,
    access_key: String,
    secret_key: String,
    region_name: String,
    image_prefix: String,
    urls: ObjectUrls,
    http_client: Client,
}

impl MinIOClient {
    /// Connect, create the bucket when missing and open the image prefix for
    /// anonymous reads
    pub async fn new(config: MinIOConfig) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Failed to create MinIO credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Internal(format!("Failed to create MinIO bucket: {}", e)))?;
        bucket.set_path_style();

        let http_client = Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let urls = ObjectUrls::new(&config.endpoint, &config.public_endpoint, &config.bucket);

        let client = Self {
            bucket,
            region,
            credentials,
            endpoint: config.endpoint,
            access_key: config.access_key,
            secret_key: config.secret_key,
            region_name: config.region,
            image_prefix: config.image_prefix,
            urls,
            http_client,
        };

        client.ensure_bucket_exists().await;
        client.set_public_read_policy().await;

        info!(
            "MinIO client initialized for endpoint: {}, bucket: {}, image_prefix: {}",
            client.endpoint,
            client.bucket.name(),
            client.image_prefix
        );

        Ok(client)
    }

    /// Create the bucket; an existing bucket is not an error
    async fn ensure_bucket_exists(&self) {
        let created = Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await;

        match created {
            Ok(_) => info!("Bucket '{}' created", self.bucket.name()),
            Err(e) => {
                let msg = e.to_string();
                if msg.contains("BucketAlreadyOwnedByYou") || msg.contains("BucketAlreadyExists") {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                } else {
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists.",
                        self.bucket.name(),
                        e
                    );
                }
            }
        }
    }

    /// Grant anonymous `s3:GetObject` on `<image_prefix>/*`.
    ///
    /// Failure only warns; the policy can be applied by hand with
    /// `mc anonymous set download`.
    async fn set_public_read_policy(&self) {
        let bucket_name = self.bucket.name();
        let policy = json!({
            "Version": "2012-10-17",
            "Statement": [{
                "Effect": "Allow",
                "Principal": {"AWS": "*"},
                "Action": ["s3:GetObject"],
                "Resource": [format!("arn:aws:s3:::{}/{}/*", bucket_name, self.image_prefix)]
            }]
        })
        .to_string();

        match self.put_bucket_policy(&bucket_name, &policy).await {
            Ok(()) => info!(
                "Set public read policy for {}/{}/*",
                bucket_name, self.image_prefix
            ),
            Err(e) => warn!(
                "Failed to set bucket policy for '{}': {}. Run: mc anonymous set download minio/{}/{}",
                bucket_name, e, bucket_name, self.image_prefix
            ),
        }
    }

    async fn put_bucket_policy(&self, bucket_name: &str, policy: &str) -> Result<(), AppError> {
        let endpoint = Url::parse(&self.endpoint)
            .map_err(|e| AppError::Internal(format!("Invalid endpoint URL: {}", e)))?;
        let host = match (endpoint.host_str(), endpoint.port()) {
            (Some(h), Some(p)) => format!("{}:{}", h, p),
            (Some(h), None) => h.to_string(),
            (None, _) => return Err(AppError::Internal("Endpoint URL has no host".to_string())),
        };

        let path = format!("/{}", bucket_name);
        let signed = sigv4::sign_s3(
            &sigv4::Credentials {
                access_key: &self.access_key,
                secret_key: &self.secret_key,
                region: &self.region_name,
            },
            &sigv4::CanonicalRequest {
                method: "PUT",
                host: &host,
                path: &path,
                query: "policy=",
                payload: policy.as_bytes(),
            },
            Utc::now(),
        )
        .map_err(|e| AppError::Internal(format!("Failed to sign policy request: {}", e)))?;

        let response = self
            .http_client
            .put(format!("{}{}?policy", self.endpoint, path))
            .header("Host", &host)
            .header("x-amz-date", &signed.amz_date)
            .header("x-amz-content-sha256", &signed.content_sha256)
            .header("Authorization", &signed.authorization)
            .header("Content-Type", "application/json")
            .body(policy.to_string())
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to send policy request: {}", e)))?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Internal(format!(
            "Bucket policy rejected: {} - {}",
            status, body
        )))
    }

    /// `<image_prefix>/<purpose>/<owner>/<uuid>.<ext>`
    pub fn generate_key(&self, purpose: &str, owner: Uuid, extension: &str) -> String {
        format!(
            "{}/{}/{}/{}.{}",
            self.image_prefix,
            purpose,
            owner,
            Uuid::new_v4(),
            extension
        )
    }

    pub async fn upload(&self, key: &str, data: &[u8], content_type: &str) -> Result<(), AppError> {
        self.bucket
            .put_object_with_content_type(key, data, content_type)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to upload file '{}': {}", key, e)))?;

        debug!("Uploaded '{}' to bucket '{}'", key, self.bucket.name());
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.bucket
            .delete_object(key)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to delete file '{}': {}", key, e)))?;

        debug!("Deleted '{}' from bucket '{}'", key, self.bucket.name());
        Ok(())
    }

    pub fn get_file_url(&self, key: &str) -> String {
        self.urls.url_for(key)
    }

    pub fn extract_key_from_url(&self, url: &str) -> Option<String> {
        self.urls.key_from_url(url)
    }
}
