use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};

use crate::domain::entities::{BookingStatus, DocumentUpload};
use crate::domain::errors::{FieldError, RegistrationError};
use crate::interface_adapters::extractors::{multipart_rejection, ApiJson, ApiPath};
use crate::interface_adapters::handlers::{error_response, error_response_with_fields, ApiError};
use crate::interface_adapters::protocol::{
    BookingSummaryResponse, RegisterGuestsRequest, RegisterGuestsResponse,
    UploadDocumentResponse,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::lookup_booking::LookupBookingUseCase;
use crate::use_cases::register_guests::RegisterGuestsUseCase;
use crate::use_cases::upload_document::UploadDocumentUseCase;

// Multipart field carrying the document scan.
const DOCUMENT_FIELD: &str = "document";

// Handler for the guest-facing booking summary behind a registration link.
#[tracing::instrument(name = "lookup_booking", skip_all)]
pub async fn lookup_booking(
    State(state): State<AppState>,
    ApiPath(token): ApiPath<String>,
) -> Result<Json<BookingSummaryResponse>, ApiError> {
    let use_case = LookupBookingUseCase {
        store: state.bookings.clone(),
        clock: state.clock.clone(),
    };

    let booking = use_case
        .execute(&token)
        .await
        .map_err(map_registration_error)?;

    Ok(Json(booking.into()))
}

// Handler for guest self-registration.
#[tracing::instrument(
    name = "register_guests",
    skip_all,
    fields(guest_count = payload.guests.len())
)]
pub async fn register_guests(
    State(state): State<AppState>,
    ApiPath(token): ApiPath<String>,
    ApiJson(payload): ApiJson<RegisterGuestsRequest>,
) -> Result<(StatusCode, Json<RegisterGuestsResponse>), ApiError> {
    let use_case = RegisterGuestsUseCase {
        store: state.bookings.clone(),
        clock: state.clock.clone(),
        documents_base_url: state.policy.documents_base_url.clone(),
    };

    let result = use_case
        .execute(&token, payload.guests)
        .await
        .map_err(map_registration_error)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterGuestsResponse {
            confirmation_code: result.confirmation_code,
            status: BookingStatus::Completed,
            guest_count: result.guests.len(),
        }),
    ))
}

// Handler for uploading a passport or ID scan ahead of registration.
#[tracing::instrument(name = "upload_document", skip_all)]
pub async fn upload_document(
    State(state): State<AppState>,
    ApiPath(token): ApiPath<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadDocumentResponse>), ApiError> {
    let mut multipart = multipart.map_err(multipart_rejection)?;
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(|err| {
        tracing::warn!(error = %err, "invalid multipart payload");
        error_response(err.status(), "invalid multipart payload")
    })? {
        if field.name() != Some(DOCUMENT_FIELD) {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|err| {
            tracing::warn!(error = %err, "failed to read document field");
            error_response(err.status(), "invalid multipart payload")
        })?;
        upload = Some(DocumentUpload {
            content_type,
            bytes: bytes.to_vec(),
        });
        break;
    }

    let upload = upload.ok_or_else(|| {
        error_response_with_fields(
            StatusCode::BAD_REQUEST,
            "invalid document upload",
            vec![FieldError::new(DOCUMENT_FIELD, "document file is required")],
        )
    })?;

    let use_case = UploadDocumentUseCase {
        store: state.bookings.clone(),
        documents: state.documents.clone(),
        clock: state.clock.clone(),
        max_bytes: state.policy.max_upload_bytes,
    };

    let result = use_case
        .execute(&token, upload)
        .await
        .map_err(map_registration_error)?;

    Ok((
        StatusCode::CREATED,
        Json(UploadDocumentResponse { url: result.url }),
    ))
}

// Maps domain errors to HTTP responses for the token-keyed surface.
fn map_registration_error(err: RegistrationError) -> ApiError {
    match err {
        RegistrationError::InvalidToken => {
            error_response(StatusCode::NOT_FOUND, "invalid registration token")
        }
        RegistrationError::AlreadyRegistered => {
            error_response(StatusCode::CONFLICT, "booking already registered")
        }
        RegistrationError::BookingExpired => error_response(StatusCode::GONE, "booking expired"),
        RegistrationError::Validation(errors) => {
            error_response_with_fields(StatusCode::BAD_REQUEST, "invalid guest data", errors)
        }
        RegistrationError::UnsupportedMediaType(_) => error_response(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "document must be a JPEG, PNG or PDF file",
        ),
        RegistrationError::DocumentTooLarge { .. } => {
            error_response(StatusCode::PAYLOAD_TOO_LARGE, "document too large")
        }
        RegistrationError::StorageFailure(_) => error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "storage unavailable, please retry",
        ),
    }
}
