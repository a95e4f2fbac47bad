use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{Booking, BookingStatus, DocumentType, Guest, GuestDetails};
use crate::domain::errors::FieldError;

// Request payload for admin booking creation.
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub property_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub confirmation_code: String,
}

// Query string for the admin booking list.
#[derive(Debug, Default, Deserialize)]
pub struct ListBookingsQuery {
    pub status: Option<BookingStatus>,
}

// Request payload for an admin status change.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: BookingStatus,
}

// Full booking view returned to admins.
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub property_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub confirmation_code: String,
    pub registration_token: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            property_id: booking.property_id,
            check_in: booking.check_in,
            check_out: booking.check_out,
            confirmation_code: booking.confirmation_code,
            registration_token: booking.registration_token,
            status: booking.status,
            created_at: booking.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookingListResponse {
    pub bookings: Vec<BookingResponse>,
}

// Guest-facing booking view; never echoes the token or internal ids.
#[derive(Debug, Serialize)]
pub struct BookingSummaryResponse {
    pub property_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub confirmation_code: String,
    pub status: BookingStatus,
}

impl From<Booking> for BookingSummaryResponse {
    fn from(booking: Booking) -> Self {
        Self {
            property_id: booking.property_id,
            check_in: booking.check_in,
            check_out: booking.check_out,
            confirmation_code: booking.confirmation_code,
            status: booking.status,
        }
    }
}

// Request payload for guest self-registration.
#[derive(Debug, Deserialize)]
pub struct RegisterGuestsRequest {
    pub guests: Vec<GuestDetails>,
}

#[derive(Debug, Serialize)]
pub struct GuestResponse {
    pub id: Uuid,
    pub confirmation_code: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub nationality: String,
    pub document_type: DocumentType,
    pub document_number: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub document_url: Option<String>,
    pub registered_at: DateTime<Utc>,
}

impl From<Guest> for GuestResponse {
    fn from(guest: Guest) -> Self {
        Self {
            id: guest.id,
            confirmation_code: guest.confirmation_code,
            first_name: guest.first_name,
            last_name: guest.last_name,
            date_of_birth: guest.date_of_birth,
            nationality: guest.nationality,
            document_type: guest.document_type,
            document_number: guest.document_number,
            email: guest.email,
            phone: guest.phone,
            document_url: guest.document_url,
            registered_at: guest.registered_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GuestListResponse {
    pub guests: Vec<GuestResponse>,
}

// Response payload for a completed registration.
#[derive(Debug, Serialize)]
pub struct RegisterGuestsResponse {
    pub confirmation_code: String,
    pub status: BookingStatus,
    pub guest_count: usize,
}

// Response payload for a document upload.
#[derive(Debug, Serialize)]
pub struct UploadDocumentResponse {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

// Simple error envelope for JSON responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}
