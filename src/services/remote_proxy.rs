// ==================== REMOTE USER API ====================
// Used when MOCK_AWS=false. Every operation is forwarded to API_GATEWAY_URL;
// non-success replies are handed back to the caller with their own status/body.

use crate::{
    models::{NewUser, User, UserPatch},
    services::{
        backend::UserBackend,
        image_store::{ImageStore, ImageUpload},
    },
    utils::error::AppError,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub struct RemoteUserApi {
    client: reqwest::Client,
    base_url: String,
    images: Box<dyn ImageStore>,
}

/// Status and decoded body of a remote reply
struct RemoteReply {
    status: StatusCode,
    body: Value,
}

impl RemoteReply {
    fn into_upstream_error(self) -> AppError {
        AppError::Upstream {
            status: self.status.as_u16(),
            body: self.body,
        }
    }

    fn decode<T: DeserializeOwned>(self) -> Result<T, AppError> {
        serde_json::from_value(self.body)
            .map_err(|e| AppError::RemoteUnavailable(format!("Unexpected reply body: {}", e)))
    }
}

impl RemoteUserApi {
    pub fn new(base_url: &str, images: Box<dyn ImageStore>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            images,
        }
    }

    fn user_url(&self, id: i64) -> String {
        format!("{}/{}", self.base_url, id)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<RemoteReply, AppError> {
        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                log::error!("❌ Remote API call failed: {}", e);
                AppError::RemoteUnavailable(e.to_string())
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::RemoteUnavailable(format!("Failed to read reply: {}", e)))?;

        // Non-JSON bodies are wrapped so the caller always gets JSON back
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or_else(|_| serde_json::json!({ "error": text }))
        };

        log::debug!("🌐 Remote API replied {}", status);
        Ok(RemoteReply { status, body })
    }
}

#[async_trait]
impl UserBackend for RemoteUserApi {
    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let reply = self.send(self.client.get(&self.base_url)).await?;
        if !reply.status.is_success() {
            return Err(reply.into_upstream_error());
        }
        reply.decode()
    }

    async fn ensure_email_available(&self, email: &str) -> Result<(), AppError> {
        let url = format!("{}?email={}", self.base_url, urlencoding::encode(email));
        let reply = self.send(self.client.get(&url)).await?;

        // Only an explicit 409 counts as a conflict; the insert itself re-checks
        if reply.status == StatusCode::CONFLICT {
            return Err(AppError::EmailConflict);
        }
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> Result<Option<User>, AppError> {
        let reply = self.send(self.client.post(&self.base_url).json(&user)).await?;

        if reply.status == StatusCode::CONFLICT {
            return Err(AppError::EmailConflict);
        }
        if !reply.status.is_success() {
            return Err(reply.into_upstream_error());
        }

        Ok(serde_json::from_value(reply.body).ok())
    }

    async fn get_user(&self, id: i64) -> Result<User, AppError> {
        let reply = self.send(self.client.get(self.user_url(id))).await?;
        if !reply.status.is_success() {
            return Err(reply.into_upstream_error());
        }
        reply.decode()
    }

    async fn update_user(&self, id: i64, patch: UserPatch) -> Result<User, AppError> {
        let reply = self.send(self.client.put(self.user_url(id)).json(&patch)).await?;
        if !reply.status.is_success() {
            return Err(reply.into_upstream_error());
        }

        // Accept either a bare user or a {"data": user} envelope
        let body = match reply.body {
            Value::Object(mut map) if map.contains_key("data") => {
                map.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        };
        RemoteReply { status: reply.status, body }.decode()
    }

    async fn delete_user(&self, id: i64) -> Result<String, AppError> {
        let reply = self.send(self.client.delete(self.user_url(id))).await?;
        if !reply.status.is_success() {
            return Err(reply.into_upstream_error());
        }

        Ok(reply
            .body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("User deleted successfully")
            .to_string())
    }

    async fn store_image(&self, key: &str, image: &ImageUpload) -> Result<String, AppError> {
        self.images.put(key, image).await?;
        Ok(self.images.public_url(key))
    }

    fn mode(&self) -> &'static str {
        "remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::image_store::NoopImageStore;
    use actix_web::{web, App, HttpResponse, HttpServer};
    use std::collections::HashMap;

    fn john() -> Value {
        serde_json::json!({
            "id": 1,
            "name": "John Doe",
            "email": "john@example.com",
            "institution": "Example University",
            "position": "Researcher",
            "phone": "1234567890",
            "image_url": ""
        })
    }

    async fn fake_list(query: web::Query<HashMap<String, String>>) -> HttpResponse {
        match query.get("email").map(String::as_str) {
            Some("john@example.com") => {
                HttpResponse::Conflict().json(serde_json::json!({ "message": "exists" }))
            }
            Some(_) => HttpResponse::Ok().json(Vec::<Value>::new()),
            None => HttpResponse::Ok().json(vec![john()]),
        }
    }

    async fn fake_create(body: web::Json<Value>) -> HttpResponse {
        if body["email"] == "race@example.com" {
            return HttpResponse::Conflict().json(serde_json::json!({ "message": "exists" }));
        }
        let mut created = body.into_inner();
        created["id"] = serde_json::json!(10);
        HttpResponse::Created().json(created)
    }

    async fn fake_get(id: web::Path<i64>) -> HttpResponse {
        if *id == 1 {
            HttpResponse::Ok().json(john())
        } else {
            HttpResponse::NotFound().json(serde_json::json!({ "message": "User not found" }))
        }
    }

    async fn fake_update(id: web::Path<i64>, patch: web::Json<Value>) -> HttpResponse {
        if *id != 1 {
            return HttpResponse::NotFound().json(serde_json::json!({ "message": "User not found" }));
        }
        let mut user = john();
        if let (Value::Object(target), Value::Object(changes)) = (&mut user, patch.into_inner()) {
            target.extend(changes);
        }
        HttpResponse::Ok().json(serde_json::json!({ "message": "User updated", "data": user }))
    }

    async fn fake_delete(id: web::Path<i64>) -> HttpResponse {
        if *id == 500 {
            return HttpResponse::InternalServerError().body("boom");
        }
        HttpResponse::Ok().json(serde_json::json!({ "message": "Deleted from remote" }))
    }

    async fn spawn_fake_api() -> RemoteUserApi {
        let server = HttpServer::new(|| {
            App::new()
                .route("/api", web::get().to(fake_list))
                .route("/api", web::post().to(fake_create))
                .route("/api/{id}", web::get().to(fake_get))
                .route("/api/{id}", web::put().to(fake_update))
                .route("/api/{id}", web::delete().to(fake_delete))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();

        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());

        RemoteUserApi::new(
            &format!("http://{}/api/", addr),
            Box::new(NoopImageStore::new("bucket", "us-east-1")),
        )
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Jane Roe".into(),
            email: email.into(),
            institution: "Example Institute".into(),
            position: "Analyst".into(),
            phone: "0987654321".into(),
            image_url: String::new(),
        }
    }

    #[actix_web::test]
    async fn test_list_decodes_remote_users() {
        let api = spawn_fake_api().await;
        let users = api.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, "john@example.com");
    }

    #[actix_web::test]
    async fn test_email_check_maps_409_to_conflict() {
        let api = spawn_fake_api().await;
        assert!(matches!(
            api.ensure_email_available("john@example.com").await,
            Err(AppError::EmailConflict)
        ));
        assert!(api.ensure_email_available("jane+tag@example.com").await.is_ok());
    }

    #[actix_web::test]
    async fn test_create_returns_remote_record() {
        let api = spawn_fake_api().await;
        let created = api.create_user(new_user("jane@example.com")).await.unwrap().unwrap();
        assert_eq!(created.id, 10);
        assert_eq!(created.email, "jane@example.com");
    }

    #[actix_web::test]
    async fn test_create_conflict_from_insert() {
        let api = spawn_fake_api().await;
        assert!(matches!(
            api.create_user(new_user("race@example.com")).await,
            Err(AppError::EmailConflict)
        ));
    }

    #[actix_web::test]
    async fn test_get_missing_forwards_status_and_body() {
        let api = spawn_fake_api().await;
        match api.get_user(2).await {
            Err(AppError::Upstream { status, body }) => {
                assert_eq!(status, 404);
                assert_eq!(body["message"], "User not found");
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[actix_web::test]
    async fn test_update_unwraps_data_envelope() {
        let api = spawn_fake_api().await;
        let patch = UserPatch {
            position: Some("Professor".into()),
            ..Default::default()
        };
        let user = api.update_user(1, patch).await.unwrap();
        assert_eq!(user.position, "Professor");
        assert_eq!(user.name, "John Doe");
    }

    #[actix_web::test]
    async fn test_update_missing_forwards_status() {
        let api = spawn_fake_api().await;
        let patch = UserPatch {
            name: Some("Nobody".into()),
            ..Default::default()
        };
        match api.update_user(99, patch).await {
            Err(AppError::Upstream { status, body }) => {
                assert_eq!(status, 404);
                assert_eq!(body, serde_json::json!({ "message": "User not found" }));
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[actix_web::test]
    async fn test_router_forwards_remote_status_and_body() {
        use actix_web::{http::StatusCode, test};
        use std::sync::Arc;

        let backend: Arc<dyn UserBackend> = Arc::new(spawn_fake_api().await);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(backend))
                .app_data(web::Data::new(crate::config::AppConfig::from_lookup(|_| None)))
                .configure(crate::api::configure),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/users/2").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, serde_json::json!({ "message": "User not found" }));

        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/users/1")
                .set_json(serde_json::json!({ "phone": "555" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "User updated");
        assert_eq!(body["data"]["phone"], "555");
    }

    #[actix_web::test]
    async fn test_delete_uses_remote_message() {
        let api = spawn_fake_api().await;
        assert_eq!(api.delete_user(1).await.unwrap(), "Deleted from remote");
    }

    #[actix_web::test]
    async fn test_delete_failure_wraps_plain_text_body() {
        let api = spawn_fake_api().await;
        match api.delete_user(500).await {
            Err(AppError::Upstream { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body["error"], "boom");
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[actix_web::test]
    async fn test_unreachable_api_is_reported() {
        let api = RemoteUserApi::new(
            "http://127.0.0.1:1/api",
            Box::new(NoopImageStore::new("bucket", "us-east-1")),
        );
        assert!(matches!(api.list_users().await, Err(AppError::RemoteUnavailable(_))));
    }
}
