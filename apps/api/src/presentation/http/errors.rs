//! HTTP error handling and response conversion.
//!
//! Every JSON error body is `{ "error": message }`. Server errors are logged at
//! `error`, client errors at `warn`.

use crate::domain::errors::DomainError;
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Realm sent with Basic-auth challenges.
pub const ADMIN_REALM: &str = r#"Basic realm="Budstagram Admin""#;

/// Application-level errors returned from handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found (404).
    NotFound(String),

    /// Missing or malformed input (400).
    BadRequest(String),

    /// Request data failed validation (400).
    ValidationError(String),

    /// Admin credentials missing or wrong (401). `challenge` asks the browser
    /// to prompt for credentials; only page navigations get one.
    Unauthorized { challenge: bool },

    /// Database operation failed (500).
    Database(String),

    /// Object storage rejected the write (500). The message is shown as-is.
    Storage(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not found: {}", msg),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Self::Unauthorized { .. } => write!(f, "Unauthorized"),
            Self::Database(msg) => write!(f, "Database error: {}", msg),
            Self::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl AppError {
    /// Get the appropriate HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) | Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Database(_) | Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-safe error message. Storage messages pass through untouched.
    fn user_message(&self) -> String {
        match self {
            Self::NotFound(_) => "Not found".into(),
            Self::BadRequest(msg) | Self::ValidationError(msg) => msg.clone(),
            Self::Unauthorized { .. } => "Unauthorized".into(),
            Self::Database(_) => "Database operation failed".into(),
            Self::Storage(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.user_message();

        if status.is_server_error() {
            tracing::error!("error={}", self);
        } else {
            tracing::warn!("error={}", self);
        }

        if let Self::Unauthorized { challenge: true } = self {
            return (
                status,
                [(header::WWW_AUTHENTICATE, HeaderValue::from_static(ADMIN_REALM))],
                message,
            )
                .into_response();
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

// === Domain Error Conversion ===

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound(msg) => AppError::NotFound(msg),
            DomainError::ValidationError(msg) => AppError::ValidationError(msg),
            DomainError::StorageError(msg) => AppError::Storage(msg),
            DomainError::InfrastructureError(msg) => AppError::Database(msg),
        }
    }
}
