use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    SupabaseApi(String),
    NoPermission(String),
    NotFound(String),
    ConfigError(String),
    JsonError(serde_json::Error),
    HttpError(reqwest::Error),
    ValidationError(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::SupabaseApi(msg) => write!(f, "Supabase API error: {}", msg),
            AppError::NoPermission(msg) => write!(f, "Permission error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::JsonError(err) => write!(f, "JSON error: {}", err),
            AppError::HttpError(err) => write!(f, "HTTP error: {}", err),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::JsonError(err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::HttpError(err)
    }
}

impl From<supabase::SupabaseError> for AppError {
    fn from(err: supabase::SupabaseError) -> Self {
        match err {
            supabase::SupabaseError::HttpError(e) => AppError::HttpError(e),
            supabase::SupabaseError::JsonError(e) => AppError::JsonError(e),
            supabase::SupabaseError::NotFound(msg) => AppError::NotFound(msg),
            supabase::SupabaseError::ValidationError(msg) => AppError::ValidationError(msg),
            supabase::SupabaseError::ConfigError(msg) => AppError::ConfigError(msg),
            supabase::SupabaseError::AuthError(msg) => AppError::SupabaseApi(msg),
            supabase::SupabaseError::ApiError { status, message } => {
                AppError::SupabaseApi(format!("status {}: {}", status, message))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::SupabaseApi(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::NoPermission(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConfigError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::JsonError(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::HttpError(err) => (StatusCode::BAD_GATEWAY, err.to_string()),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = json!({
            "error": error_message,
            "status": status.as_u16()
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
