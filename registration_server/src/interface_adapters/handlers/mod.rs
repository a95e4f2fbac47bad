pub mod bookings;
pub mod registration;

use axum::{http::StatusCode, Json};

use crate::domain::errors::FieldError;
use crate::interface_adapters::protocol::{ErrorResponse, HealthResponse};

pub type ApiError = (StatusCode, Json<ErrorResponse>);

// Helper to build a JSON error response.
pub(crate) fn error_response(status: StatusCode, message: &str) -> ApiError {
    error_response_with_fields(status, message, Vec::new())
}

pub(crate) fn error_response_with_fields(
    status: StatusCode,
    message: &str,
    errors: Vec<FieldError>,
) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            message: message.to_string(),
            errors,
        }),
    )
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
