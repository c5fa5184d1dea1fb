// ==================== PROFILE IMAGE STORAGE ====================
// Mock mode discards uploads after logging them, real mode writes to S3.
// Both build the same public URL for the stored object.

use crate::{config::AppConfig, utils::error::AppError};
use actix_web::web::Bytes;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::{config::Credentials, primitives::ByteStream};

/// Image file received with a create request
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Public URL of an uploaded object (`s3-{region}` form)
pub fn object_url(bucket: &str, region: &str, key: &str) -> String {
    format!("https://{}.s3-{}.amazonaws.com/{}", bucket, region, key)
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn put(&self, key: &str, image: &ImageUpload) -> Result<(), AppError>;

    fn public_url(&self, key: &str) -> String;
}

// ==================== MOCK ====================

pub struct NoopImageStore {
    bucket: String,
    region: String,
}

impl NoopImageStore {
    pub fn new(bucket: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: region.into(),
        }
    }
}

#[async_trait]
impl ImageStore for NoopImageStore {
    async fn put(&self, key: &str, image: &ImageUpload) -> Result<(), AppError> {
        log::info!(
            "📦 [MOCK] Pretending to upload {} to bucket {} ({} bytes)",
            key,
            self.bucket,
            image.bytes.len()
        );
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        object_url(&self.bucket, &self.region, key)
    }
}

// ==================== S3 ====================

pub struct S3ImageStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    region: String,
}

impl S3ImageStore {
    /// Builds the S3 client. Explicit credentials win over the default AWS chain.
    pub async fn from_config(config: &AppConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.aws_region.clone()));

        match (&config.aws_access_key_id, &config.aws_secret_access_key) {
            (Some(key_id), Some(secret)) => {
                log::info!("🔑 Using S3 credentials from environment");
                loader = loader.credentials_provider(Credentials::new(
                    key_id.clone(),
                    secret.clone(),
                    config.aws_session_token.clone(),
                    None,
                    "environment",
                ));
            }
            _ => log::info!("🔑 Using default AWS credential chain for S3"),
        }

        let sdk_config = loader.load().await;

        Self {
            client: aws_sdk_s3::Client::new(&sdk_config),
            bucket: config.s3_bucket.clone(),
            region: config.aws_region.clone(),
        }
    }
}

#[async_trait]
impl ImageStore for S3ImageStore {
    async fn put(&self, key: &str, image: &ImageUpload) -> Result<(), AppError> {
        log::info!("📤 Uploading {} to bucket {}", key, self.bucket);

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(image.bytes.clone()));

        if let Some(content_type) = &image.content_type {
            request = request.content_type(content_type);
        }

        request.send().await.map_err(|e| {
            let message = aws_sdk_s3::error::DisplayErrorContext(&e).to_string();
            log::error!("❌ Upload of {} failed: {}", key, message);
            AppError::StorageFailure(message)
        })?;

        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        object_url(&self.bucket, &self.region, key)
    }
}
