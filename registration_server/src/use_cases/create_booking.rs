use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::entities::{Booking, BookingStatus};
use crate::domain::errors::{BookingError, StoreError};
use crate::domain::ports::{BookingStore, Clock, TokenSource};
use crate::domain::validation::{validate_confirmation_code, validate_property_id, validate_stay};
use crate::use_cases::token_issuer::TokenIssuer;

// Admin input for a new booking.
pub struct NewBooking {
    pub property_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub confirmation_code: String,
}

// Booking creation use case with injected dependencies.
pub struct CreateBookingUseCase<G, S, C> {
    pub issuer: TokenIssuer<G, S>,
    pub store: S,
    pub clock: C,
}

impl<G, S, C> CreateBookingUseCase<G, S, C>
where
    G: TokenSource,
    S: BookingStore,
    C: Clock,
{
    pub async fn execute(&self, input: NewBooking) -> Result<Booking, BookingError> {
        let mut errors = Vec::new();
        let property_id = validate_property_id(&input.property_id, &mut errors);
        let confirmation_code = validate_confirmation_code(&input.confirmation_code, &mut errors);
        validate_stay(input.check_in, input.check_out, &mut errors);
        if !errors.is_empty() {
            return Err(BookingError::Validation(errors));
        }

        // No booking is written without a verified token.
        let registration_token = self.issuer.generate_unique_token().await?;

        let booking = Booking {
            id: Uuid::new_v4(),
            property_id,
            check_in: input.check_in,
            check_out: input.check_out,
            confirmation_code,
            registration_token,
            status: BookingStatus::Pending,
            created_at: self.clock.now(),
        };

        self.store
            .insert(booking.clone())
            .await
            .map_err(|err| match err {
                StoreError::Duplicate("registration_token") => BookingError::TokenConflict,
                StoreError::Duplicate(_) => BookingError::DuplicateConfirmationCode,
                StoreError::Unavailable(message) => BookingError::StorageFailure(message),
            })?;

        tracing::info!(
            booking_id = %booking.id,
            property_id = %booking.property_id,
            "booking created"
        );

        Ok(booking)
    }
}
