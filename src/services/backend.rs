// ==================== BACKEND SELECTION ====================
// One backend is picked at startup from MOCK_AWS and shared by every request.

use crate::{
    config::AppConfig,
    models::{NewUser, User, UserPatch},
    seeds::mock_users_seed,
    services::{
        image_store::{ImageUpload, NoopImageStore, S3ImageStore},
        mock_store::MockUserStore,
        remote_proxy::RemoteUserApi,
    },
    utils::error::AppError,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Operations every backend offers to the router
#[async_trait]
pub trait UserBackend: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>, AppError>;

    /// Fails with `EmailConflict` when the email is already taken
    async fn ensure_email_available(&self, email: &str) -> Result<(), AppError>;

    /// Returns the stored record when the backend reports it back
    async fn create_user(&self, user: NewUser) -> Result<Option<User>, AppError>;

    async fn get_user(&self, id: i64) -> Result<User, AppError>;

    async fn update_user(&self, id: i64, patch: UserPatch) -> Result<User, AppError>;

    /// Returns the confirmation message
    async fn delete_user(&self, id: i64) -> Result<String, AppError>;

    /// Stores the image under `key` and returns its public URL
    async fn store_image(&self, key: &str, image: &ImageUpload) -> Result<String, AppError>;

    fn mode(&self) -> &'static str;
}

pub async fn select_backend(config: &AppConfig) -> Arc<dyn UserBackend> {
    if config.mock_mode {
        log::info!("🧪 Running in MOCK mode...");
        let images = NoopImageStore::new(config.s3_bucket.clone(), config.aws_region.clone());
        Arc::new(MockUserStore::new(
            mock_users_seed::default_users(),
            Box::new(images),
        ))
    } else {
        log::info!("☁️  Running in REMOTE mode against {}", config.api_url);
        let images = S3ImageStore::from_config(config).await;
        Arc::new(RemoteUserApi::new(&config.api_url, Box::new(images)))
    }
}
