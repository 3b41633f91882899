//! Error handling for the bookrack HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use uuid::Uuid;

/// Application error kinds that map to HTTP responses.
///
/// Bodies are plain text: validation and conflict messages are user-facing
/// and rendered by the browser exactly as written by the handlers.
#[derive(Error, Debug)]
pub enum AppError {
    /// Bad or missing input, recovered locally
    #[error("{message}")]
    Validation { message: String },

    /// A book with the submitted ISBN already exists
    #[error("{message}")]
    DuplicateIsbn { message: String },

    /// Store or connectivity failure
    #[error("{message}")]
    Store { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a duplicate-ISBN conflict error
    pub fn duplicate_isbn(message: impl Into<String>) -> Self {
        Self::DuplicateIsbn {
            message: message.into(),
        }
    }

    /// Create a store failure error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();

        let (status, message) = match self {
            AppError::Validation { message } => (StatusCode::UNPROCESSABLE_ENTITY, message),
            AppError::DuplicateIsbn { message } => (StatusCode::CONFLICT, message),
            AppError::Store { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        tracing::error!(
            error_id = %error_id,
            status_code = %status.as_u16(),
            message = %message,
            "request error"
        );

        // In production, hide internal error details
        let message = if cfg!(not(debug_assertions)) && status == StatusCode::INTERNAL_SERVER_ERROR
        {
            "An internal server error occurred".to_string()
        } else {
            message
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn validation_error_preserves_message() {
        let error = AppError::validation("Rating must be a number between 0 and 5.");

        assert_eq!(
            error.to_string(),
            "Rating must be a number between 0 and 5."
        );
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn duplicate_isbn_maps_to_conflict() {
        let error = AppError::duplicate_isbn("A book with this ISBN already exists.");
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn store_error_maps_to_service_unavailable() {
        let error = AppError::store("Error fetching books.");
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn not_found_maps_to_404() {
        let error = AppError::not_found("Resource not found");
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_error_maps_to_500() {
        let internal_error = anyhow::anyhow!("Database connection failed");
        let error = AppError::Internal(internal_error);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
