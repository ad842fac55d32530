//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding. All route handlers return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use velora_core::ValidationErrors;

use crate::airtable::AirtableError;
use crate::services::orders::CheckoutError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Record service operation failed.
    #[error("Record service error: {0}")]
    Airtable(#[from] AirtableError),

    /// Checkout form failed validation.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Validation(errors) => Self::Validation(errors),
            CheckoutError::EmptyCart => Self::BadRequest("Cart is empty".to_string()),
            CheckoutError::UnknownShippingMethod(name) => {
                Self::BadRequest(format!("Unknown shipping method: {name}"))
            }
            CheckoutError::Airtable(e) => Self::Airtable(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-side errors to Sentry; misses and client mistakes
        // are not error events.
        let is_server_error = match &self {
            Self::Airtable(AirtableError::NotFound) => false,
            Self::Airtable(_) | Self::Internal(_) => true,
            Self::Validation(_) | Self::NotFound(_) | Self::BadRequest(_) => false,
        };
        if is_server_error {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Airtable(AirtableError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Airtable(AirtableError::RateLimited(_)) => StatusCode::TOO_MANY_REQUESTS,
            Self::Airtable(_) => StatusCode::BAD_GATEWAY,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let body = match &self {
            Self::Airtable(AirtableError::NotFound) => json!({"error": "Not found"}),
            Self::NotFound(message) => json!({"error": message}),
            Self::Airtable(_) => json!({"error": "External service error"}),
            Self::Internal(_) => json!({"error": "Internal server error"}),
            Self::Validation(errors) => json!({
                "error": "Missing or invalid fields",
                "fields": errors,
            }),
            Self::BadRequest(message) => json!({"error": message}),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status_of(AppError::NotFound("order".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Airtable(AirtableError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Airtable(AirtableError::RateLimited(5))),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            status_of(AppError::BadRequest("nope".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_checkout_error_mapping() {
        let err: AppError = CheckoutError::EmptyCart.into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let err: AppError = CheckoutError::UnknownShippingMethod("Drone".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
