//! Error Types
//!
//! Centralized error handling for account and review operations.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Errors surfaced to API callers
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("Email already in use")]
    DuplicateEmail,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing or invalid fields: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Malformed request: {0}")]
    BadRequest(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error")]
    Internal,
}

impl ApiError {
    /// Stable machine-readable code used in error bodies
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::DuplicateEmail => "duplicate_email",
            ApiError::InvalidCredentials => "invalid_credentials",
            ApiError::Validation(_) => "validation_error",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::StoreUnavailable(_) => "store_unavailable",
            ApiError::Config(_) => "configuration_error",
            ApiError::Internal => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::DuplicateEmail | ApiError::Validation(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::StoreUnavailable(_) | ApiError::Config(_) | ApiError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Validation(fields) => serde_json::json!({
                "error": self.code(),
                "message": self.to_string(),
                "fields": fields,
            }),
            // Never leak driver or configuration details to clients
            ApiError::StoreUnavailable(_) | ApiError::Config(_) | ApiError::Internal => {
                serde_json::json!({
                    "error": self.code(),
                    "message": "An internal error occurred",
                })
            }
            _ => serde_json::json!({
                "error": self.code(),
                "message": self.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// Errors raised by the persistence layer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The email uniqueness constraint rejected an insert
    #[error("email already exists")]
    DuplicateEmail,

    /// Any other constraint (e.g. the rating bound) rejected a write
    #[error("constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_check_violation() {
                return StoreError::ConstraintViolation(
                    db_err.constraint().unwrap_or("check").to_string(),
                );
            }
        }
        StoreError::Unavailable(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => ApiError::DuplicateEmail,
            StoreError::ConstraintViolation(constraint) => {
                tracing::debug!(constraint = %constraint, "Store rejected write");
                ApiError::Validation(vec![constraint])
            }
            StoreError::Unavailable(msg) => {
                tracing::error!("Store error: {}", msg);
                ApiError::StoreUnavailable(msg)
            }
        }
    }
}

impl From<argon2::password_hash::Error> for ApiError {
    fn from(err: argon2::password_hash::Error) -> Self {
        tracing::error!("Password hashing error: {:?}", err);
        ApiError::Internal
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::error!("Token signing error: {:?}", err);
        ApiError::Internal
    }
}
