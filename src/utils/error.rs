use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::utils::response::error as error_response;

/// Field-level validation failures, keyed by field name. Ordered so the
/// serialized `details` object is stable.
pub type FieldErrors = BTreeMap<&'static str, String>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Validation error: one or more fields are invalid")]
    FormError(FieldErrors),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::FormError(_) => StatusCode::BAD_REQUEST,
            AppError::AuthError(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::FormError(_) => "VALIDATION_ERROR",
            AppError::AuthError(_) => "AUTH_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::ValidationError(msg)
            | AppError::AuthError(msg)
            | AppError::NotFound(msg) => {
                error!(error = ?self, message = %msg, "Application error");
            }
            AppError::FormError(errors) => {
                error!(fields = ?errors.keys().collect::<Vec<_>>(), "Form validation failed");
            }
            AppError::DatabaseError(e) => {
                error!(error = ?e, "Database error");
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        // Log internal details
        self.log();

        // Only expose high-level message to the client
        let public_message = match &self {
            AppError::ValidationError(msg)
            | AppError::AuthError(msg)
            | AppError::NotFound(msg) => msg.clone(),
            AppError::FormError(_) => "One or more fields are invalid".to_string(),
            AppError::DatabaseError(_) => "A database error occurred".to_string(),
        };

        // Field errors are the only internal detail safe to expose
        let details = match &self {
            AppError::FormError(errors) => serde_json::to_value(errors).ok(),
            _ => None,
        };

        error_response(code, public_message, details, status)
    }
}
