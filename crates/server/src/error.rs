use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::DbErr;
use deployment::DeploymentError;
use services::services::{
    auth::AuthServiceError, config::ConfigError, ingest::IngestServiceError,
    storage::StorageServiceError,
};
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthServiceError),
    #[error(transparent)]
    Ingest(#[from] IngestServiceError),
    #[error(transparent)]
    Storage(#[from] StorageServiceError),
    #[error(transparent)]
    Deployment(#[from] DeploymentError),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<&'static str> for ApiError {
    fn from(msg: &'static str) -> Self {
        ApiError::BadRequest(msg.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_type) = match &self {
            ApiError::Auth(err) => match err {
                AuthServiceError::MissingFields | AuthServiceError::PasswordTooShort => {
                    (StatusCode::BAD_REQUEST, "AuthError")
                }
                AuthServiceError::EmailTaken => (StatusCode::CONFLICT, "AuthError"),
                AuthServiceError::InvalidCredentials | AuthServiceError::InvalidToken => {
                    (StatusCode::UNAUTHORIZED, "AuthError")
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "AuthError"),
            },
            ApiError::Ingest(err) => match err {
                IngestServiceError::EmptyTitle => (StatusCode::BAD_REQUEST, "IngestError"),
                IngestServiceError::AlbumNotFound | IngestServiceError::PhotoNotFound => {
                    (StatusCode::NOT_FOUND, "IngestError")
                }
                IngestServiceError::Database(DbErr::RecordNotFound(_)) => {
                    (StatusCode::NOT_FOUND, "IngestError")
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "IngestError"),
            },
            ApiError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "StorageError"),
            ApiError::Deployment(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DeploymentError"),
            ApiError::Database(db_err) => match db_err {
                DbErr::RecordNotFound(_) => (StatusCode::NOT_FOUND, "DatabaseError"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "DatabaseError"),
            },
            ApiError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ConfigError"),
            ApiError::Multipart(_) => (StatusCode::BAD_REQUEST, "MultipartError"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IoError"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "ConflictError"),
            ApiError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PayloadTooLarge"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "InternalError"),
        };

        let error_message = match &self {
            ApiError::Auth(err) => match err {
                AuthServiceError::Database(_)
                | AuthServiceError::TokenEncoding(_)
                | AuthServiceError::Hashing(_) => format!("{}: {}", error_type, self),
                _ => err.to_string(),
            },
            ApiError::Ingest(err) => match err {
                IngestServiceError::Database(DbErr::RecordNotFound(msg)) => msg.clone(),
                IngestServiceError::Storage(_) | IngestServiceError::Database(_) => {
                    format!("{}: {}", error_type, self)
                }
                _ => err.to_string(),
            },
            ApiError::Database(DbErr::RecordNotFound(msg)) => msg.clone(),
            ApiError::Multipart(_) => {
                "Failed to upload file. Please ensure the file is valid and try again.".to_string()
            }
            ApiError::Unauthorized => "Unauthorized. Please sign in again.".to_string(),
            ApiError::NotFound(msg) => msg.clone(),
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Conflict(msg) => msg.clone(),
            ApiError::PayloadTooLarge(msg) => msg.clone(),
            ApiError::Internal(msg) => msg.clone(),
            _ => format!("{}: {}", error_type, self),
        };

        if status_code.is_server_error() {
            tracing::error!(
                status = %status_code,
                error_type,
                error = %self,
                "API request failed"
            );
        }
        let response = ApiResponse::<()>::error(&error_message);
        (status_code, Json(response)).into_response()
    }
}
