//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.
//! Store and driver errors are logged here and never sent to the caller.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::models::ValidationError;
use crate::service::ServiceError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Request body could not be read as JSON (400)
    BadRequest { message: String },

    /// Store-backed operation failed (500, logged)
    Service(ServiceError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(e) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "validation_error",
                    "message": e.to_string()
                }),
            ),
            Self::BadRequest { message } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "bad_request",
                    "message": message
                }),
            ),
            Self::Service(e) => {
                // Log the store error, return only the operation-level message
                tracing::error!(error = %e, cause = %e.store_error(), "Service error");
                let code = match e {
                    ServiceError::Unavailable(_) => "service_unavailable",
                    _ => "internal_error",
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": code,
                        "message": e.to_string()
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        Self::Service(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::StoreError;
    use crate::models::ContactId;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_is_400() {
        let err = ApiError::Validation(ValidationError::Empty { field: "first_name" });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["message"], "first_name is required");
    }

    #[tokio::test]
    async fn service_error_is_500_without_driver_text() {
        let id = ContactId::generate();
        let err = ApiError::Service(ServiceError::UpdateFailed {
            id,
            store: crate::service::StoreKind::Secondary,
            source: StoreError::unreachable("connection refused by 10.0.0.7:5432"),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "internal_error");
        assert_eq!(body["message"], format!("failed to update contact {id}"));
        assert!(!body.to_string().contains("10.0.0.7"));
    }

    #[tokio::test]
    async fn unavailable_is_500() {
        let err = ApiError::Service(ServiceError::Unavailable(StoreError::unreachable("down")));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "service_unavailable");
    }
}
