use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    EmailConflict,
    NotFound,
    StorageFailure(String),
    InvalidRequest(String),
    /// Non-success reply from the remote API, forwarded as-is
    Upstream { status: u16, body: serde_json::Value },
    RemoteUnavailable(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::EmailConflict => write!(f, "Email already exists"),
            AppError::NotFound => write!(f, "User not found"),
            AppError::StorageFailure(msg) => write!(f, "{}", msg),
            AppError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            AppError::Upstream { status, body } => write!(f, "Remote API replied {}: {}", status, body),
            AppError::RemoteUnavailable(msg) => write!(f, "Remote API unavailable: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::EmailConflict => StatusCode::CONFLICT,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::StorageFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::RemoteUnavailable(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Upstream { body, .. } => HttpResponse::build(self.status_code()).json(body),
            _ => HttpResponse::build(self.status_code()).json(serde_json::json!({
                "error": self.to_string()
            })),
        }
    }
}
