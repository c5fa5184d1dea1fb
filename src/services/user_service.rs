// ==================== USER LIFECYCLE ====================
// Create flow shared by both backends: email check, optional image upload, insert.

use crate::{
    models::{NewUser, User},
    services::{backend::UserBackend, image_store::ImageUpload},
    utils::error::AppError,
};
use serde::Deserialize;

/// Form fields submitted on create. Every field must be present; empty values are accepted.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct CreateUserForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub institution: Option<String>,
    pub position: Option<String>,
    pub phone: Option<String>,
}

impl CreateUserForm {
    /// Sets a field by its form name; unknown names are ignored
    pub fn set(&mut self, field: &str, value: String) {
        match field {
            "name" => self.name = Some(value),
            "email" => self.email = Some(value),
            "institution" => self.institution = Some(value),
            "position" => self.position = Some(value),
            "phone" => self.phone = Some(value),
            _ => log::debug!("Ignoring unknown form field '{}'", field),
        }
    }

    fn into_new_user(self) -> Result<NewUser, AppError> {
        fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
            value.ok_or_else(|| AppError::InvalidRequest(format!("missing field '{}'", field)))
        }

        Ok(NewUser {
            name: required(self.name, "name")?,
            email: required(self.email, "email")?,
            institution: required(self.institution, "institution")?,
            position: required(self.position, "position")?,
            phone: required(self.phone, "phone")?,
            image_url: String::new(),
        })
    }
}

/// Creates a user. Fails fast on a taken email before anything is uploaded.
pub async fn add_user(
    backend: &dyn UserBackend,
    form: CreateUserForm,
    image: Option<ImageUpload>,
) -> Result<Option<User>, AppError> {
    let mut new_user = form.into_new_user()?;
    backend.ensure_email_available(&new_user.email).await?;

    // A file part without a filename means nothing was picked in the form
    if let Some(image) = image.filter(|img| !img.filename.is_empty()) {
        let key = format!("users/{}", image.filename);
        new_user.image_url = backend.store_image(&key, &image).await?;
    }

    backend.create_user(new_user).await
}
