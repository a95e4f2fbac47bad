use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::domain::errors::{BookingError, TokenError};
use crate::interface_adapters::extractors::{ApiJson, ApiPath, ApiQuery};
use crate::interface_adapters::handlers::{error_response, error_response_with_fields, ApiError};
use crate::interface_adapters::protocol::{
    BookingListResponse, BookingResponse, CreateBookingRequest, GuestListResponse,
    ListBookingsQuery, UpdateStatusRequest,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::create_booking::{CreateBookingUseCase, NewBooking};
use crate::use_cases::manage_bookings::ManageBookingsUseCase;
use crate::use_cases::token_issuer::TokenIssuer;

// Handler for creating a booking and issuing its registration token.
#[tracing::instrument(
    name = "create_booking",
    skip_all,
    fields(property_id = %payload.property_id)
)]
pub async fn create_booking(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    let use_case = CreateBookingUseCase {
        issuer: TokenIssuer {
            source: state.tokens.clone(),
            store: state.bookings.clone(),
            length: state.policy.token_length,
            max_retries: state.policy.token_max_retries,
        },
        store: state.bookings.clone(),
        clock: state.clock.clone(),
    };

    let booking = use_case
        .execute(NewBooking {
            property_id: payload.property_id,
            check_in: payload.check_in,
            check_out: payload.check_out,
            confirmation_code: payload.confirmation_code,
        })
        .await
        .map_err(map_booking_error)?;

    Ok((StatusCode::CREATED, Json(booking.into())))
}

#[tracing::instrument(name = "list_bookings", skip_all, fields(status = ?query.status))]
pub async fn list_bookings(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListBookingsQuery>,
) -> Result<Json<BookingListResponse>, ApiError> {
    let use_case = ManageBookingsUseCase {
        store: state.bookings.clone(),
    };

    let bookings = use_case
        .list(query.status)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(BookingListResponse {
        bookings: bookings.into_iter().map(Into::into).collect(),
    }))
}

pub async fn get_booking(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    let use_case = ManageBookingsUseCase {
        store: state.bookings.clone(),
    };

    let booking = use_case.get(id).await.map_err(map_booking_error)?;

    Ok(Json(booking.into()))
}

#[tracing::instrument(name = "update_booking_status", skip_all, fields(booking_id = %id))]
pub async fn update_booking_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateStatusRequest>,
) -> Result<Json<BookingResponse>, ApiError> {
    let use_case = ManageBookingsUseCase {
        store: state.bookings.clone(),
    };

    let booking = use_case
        .update_status(id, payload.status)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(booking.into()))
}

#[tracing::instrument(name = "delete_booking", skip_all, fields(booking_id = %id))]
pub async fn delete_booking(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    let use_case = ManageBookingsUseCase {
        store: state.bookings.clone(),
    };

    use_case.delete(id).await.map_err(map_booking_error)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_booking_guests(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<GuestListResponse>, ApiError> {
    let use_case = ManageBookingsUseCase {
        store: state.bookings.clone(),
    };

    let guests = use_case.guests(id).await.map_err(map_booking_error)?;

    Ok(Json(GuestListResponse {
        guests: guests.into_iter().map(Into::into).collect(),
    }))
}

// Maps domain errors to HTTP responses for the admin surface.
fn map_booking_error(err: BookingError) -> ApiError {
    match err {
        BookingError::Validation(errors) => error_response_with_fields(
            StatusCode::BAD_REQUEST,
            "invalid booking data",
            errors,
        ),
        BookingError::NotFound => error_response(StatusCode::NOT_FOUND, "booking not found"),
        BookingError::DuplicateConfirmationCode => {
            error_response(StatusCode::CONFLICT, "confirmation_code already in use")
        }
        BookingError::TokenConflict => error_response(
            StatusCode::CONFLICT,
            "registration token conflict, please retry",
        ),
        err @ BookingError::InvalidTransition { .. } => {
            error_response(StatusCode::CONFLICT, &err.to_string())
        }
        BookingError::Token(TokenError::TokenGenerationExhausted { attempts }) => {
            tracing::error!(attempts, "registration token issuance exhausted");
            error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                "could not issue a registration token, please retry",
            )
        }
        BookingError::Token(TokenError::StoreUnavailable(_)) | BookingError::StorageFailure(_) => {
            error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                "storage unavailable, please retry",
            )
        }
        BookingError::Token(err) => {
            tracing::error!(error = %err, "registration token issuer misconfigured");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}
