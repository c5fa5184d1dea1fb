// ==================== IN-MEMORY USER STORE ====================
// Used when MOCK_AWS=true. Data lives for the process lifetime only.

use crate::{
    models::{NewUser, User, UserPatch},
    services::{
        backend::UserBackend,
        image_store::{ImageStore, ImageUpload},
    },
    utils::error::AppError,
};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};

struct MockState {
    users: Vec<User>,
    /// Highest id ever handed out, so deleted ids are not reused
    last_id: i64,
}

impl MockState {
    fn email_taken(&self, email: &str, except_id: Option<i64>) -> bool {
        self.users
            .iter()
            .any(|u| u.email == email && Some(u.id) != except_id)
    }

    fn next_id(&self) -> i64 {
        let max_existing = self.users.iter().map(|u| u.id).max().unwrap_or(0);
        self.last_id.max(max_existing) + 1
    }
}

pub struct MockUserStore {
    state: Mutex<MockState>,
    images: Box<dyn ImageStore>,
}

impl MockUserStore {
    pub fn new(seed: Vec<User>, images: Box<dyn ImageStore>) -> Self {
        let last_id = seed.iter().map(|u| u.id).max().unwrap_or(0);
        Self {
            state: Mutex::new(MockState { users: seed, last_id }),
            images,
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserBackend for MockUserStore {
    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.lock().users.clone())
    }

    async fn ensure_email_available(&self, email: &str) -> Result<(), AppError> {
        if self.lock().email_taken(email, None) {
            return Err(AppError::EmailConflict);
        }
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> Result<Option<User>, AppError> {
        let mut state = self.lock();

        // Re-checked under the lock so two racing creates can't both pass
        if state.email_taken(&user.email, None) {
            return Err(AppError::EmailConflict);
        }

        let id = state.next_id();
        let user = user.with_id(id);
        state.last_id = id;
        state.users.push(user.clone());

        log::info!("👤 [MOCK] Created user {} ({}), {} users stored", id, user.email, state.users.len());
        Ok(Some(user))
    }

    async fn get_user(&self, id: i64) -> Result<User, AppError> {
        self.lock()
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn update_user(&self, id: i64, patch: UserPatch) -> Result<User, AppError> {
        let mut state = self.lock();

        if let Some(email) = &patch.email {
            if state.email_taken(email, Some(id)) {
                return Err(AppError::EmailConflict);
            }
        }

        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AppError::NotFound)?;
        user.apply(patch);

        Ok(user.clone())
    }

    async fn delete_user(&self, id: i64) -> Result<String, AppError> {
        let mut state = self.lock();
        let before = state.users.len();
        state.users.retain(|u| u.id != id);

        if state.users.len() == before {
            log::debug!("🗑️  [MOCK] User {} was not present", id);
        }

        Ok("User deleted successfully".to_string())
    }

    async fn store_image(&self, key: &str, image: &ImageUpload) -> Result<String, AppError> {
        self.images.put(key, image).await?;
        Ok(self.images.public_url(key))
    }

    fn mode(&self) -> &'static str {
        "mock"
    }
}
