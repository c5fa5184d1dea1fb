use actix_multipart::{Multipart, MultipartError};
use actix_web::{http::header, web, Either, HttpResponse, ResponseError};
use futures::TryStreamExt;
use crate::{
    models::{User, UserPatch},
    services::{
        backend::UserBackend,
        image_store::ImageUpload,
        user_service::{self, CreateUserForm},
    },
    utils::error::AppError,
};

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct UpdateUserResponse {
    pub message: String,
    pub data: User,
}

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

fn bad_multipart(e: MultipartError) -> AppError {
    AppError::InvalidRequest(format!("malformed multipart body: {}", e))
}

/// Splits a multipart submission into form fields and the optional `image` file part
async fn read_multipart(mut payload: Multipart) -> Result<(CreateUserForm, Option<ImageUpload>), AppError> {
    let mut form = CreateUserForm::default();
    let mut image = None;

    while let Some(mut field) = payload.try_next().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_owned);
        let content_type = field.content_type().map(|mime| mime.to_string());

        let mut data = web::BytesMut::new();
        while let Some(chunk) = field.try_next().await.map_err(bad_multipart)? {
            data.extend_from_slice(&chunk);
        }

        if name == "image" {
            image = Some(ImageUpload {
                filename: filename.unwrap_or_default(),
                content_type,
                bytes: data.freeze(),
            });
        } else {
            let value = String::from_utf8(data.to_vec())
                .map_err(|_| AppError::InvalidRequest(format!("field '{}' is not valid UTF-8", name)))?;
            form.set(&name, value);
        }
    }

    Ok((form, image))
}

/// GET /users - Lists users as JSON
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = [User])
    )
)]
pub async fn list_users(backend: web::Data<dyn UserBackend>) -> HttpResponse {
    log::info!("📋 GET /users");

    match backend.list_users().await {
        Ok(users) => {
            log::info!("✅ Listed {} users", users.len());
            HttpResponse::Ok().json(users)
        }
        Err(e) => {
            log::error!("❌ Error listing users: {}", e);
            e.error_response()
        }
    }
}

/// POST /users - Creates a user from a form submission, then redirects to the index
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body(content = CreateUserForm, content_type = "multipart/form-data"),
    responses(
        (status = 302, description = "User created, redirect to index"),
        (status = 400, description = "Missing field or malformed body", body = ErrorResponse),
        (status = 409, description = "Email already exists", body = ErrorResponse),
        (status = 500, description = "Image upload failed", body = ErrorResponse)
    )
)]
pub async fn create_user(
    backend: web::Data<dyn UserBackend>,
    payload: Either<web::Form<CreateUserForm>, Multipart>,
) -> HttpResponse {
    let parsed = match payload {
        Either::Left(form) => Ok((form.into_inner(), None)),
        Either::Right(multipart) => read_multipart(multipart).await,
    };

    let (form, image) = match parsed {
        Ok(parsed) => parsed,
        Err(e) => {
            log::warn!("⚠️ Rejected user submission: {}", e);
            return e.error_response();
        }
    };

    let email = form.email.clone().unwrap_or_default();
    log::info!("📝 POST /users - email: {}", email);

    match user_service::add_user(backend.get_ref(), form, image).await {
        Ok(created) => {
            match created {
                Some(user) => log::info!("✅ User created: {} (id {})", user.email, user.id),
                None => log::info!("✅ User created: {}", email),
            }
            HttpResponse::Found()
                .insert_header((header::LOCATION, "/"))
                .finish()
        }
        Err(e) => {
            log::warn!("❌ Failed to create {}: {}", email, e);
            e.error_response()
        }
    }
}

/// GET /users/{id} - Returns a single user
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(backend: web::Data<dyn UserBackend>, id: web::Path<i64>) -> HttpResponse {
    let id = id.into_inner();
    log::info!("🔍 GET /users/{}", id);

    match backend.get_user(id).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => {
            log::warn!("⚠️ User {} lookup failed: {}", id, e);
            e.error_response()
        }
    }
}

/// PUT|PATCH /users/{id} - Merges the supplied fields into the user
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UserPatch,
    responses(
        (status = 200, description = "User updated", body = UpdateUserResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Email belongs to another user", body = ErrorResponse)
    )
)]
pub async fn update_user(
    backend: web::Data<dyn UserBackend>,
    id: web::Path<i64>,
    patch: web::Json<UserPatch>,
) -> HttpResponse {
    let id = id.into_inner();
    log::info!("🔧 PUT /users/{} - Updating", id);

    match backend.update_user(id, patch.into_inner()).await {
        Ok(user) => {
            log::info!("✅ User {} updated", id);
            HttpResponse::Ok().json(UpdateUserResponse {
                message: "User updated".to_string(),
                data: user,
            })
        }
        Err(e) => {
            log::warn!("❌ Error updating user {}: {}", id, e);
            e.error_response()
        }
    }
}

/// DELETE /users/{id} - Removes a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse)
    )
)]
pub async fn delete_user(backend: web::Data<dyn UserBackend>, id: web::Path<i64>) -> HttpResponse {
    let id = id.into_inner();
    log::info!("🗑️  DELETE /users/{}", id);

    match backend.delete_user(id).await {
        Ok(message) => {
            log::info!("✅ User {} deleted", id);
            HttpResponse::Ok().json(MessageResponse { message })
        }
        Err(e) => {
            log::error!("❌ Error deleting user {}: {}", id, e);
            e.error_response()
        }
    }
}
