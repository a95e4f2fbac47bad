use crate::domain::entities::{Booking, BookingStatus};
use crate::domain::errors::RegistrationError;
use crate::domain::ports::{BookingStore, Clock};

// Resolves a token to a booking that still accepts registration.
//
// Shared gate for every token-keyed guest operation: the booking must exist,
// be pending, and its check-out date must not have passed.
pub(crate) async fn open_booking<S, C>(
    store: &S,
    clock: &C,
    token: &str,
) -> Result<Booking, RegistrationError>
where
    S: BookingStore,
    C: Clock,
{
    if token.is_empty() {
        return Err(RegistrationError::InvalidToken);
    }

    let booking = store
        .find_by_token(token)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "booking lookup by token failed");
            RegistrationError::StorageFailure(err.to_string())
        })?
        .ok_or(RegistrationError::InvalidToken)?;

    match booking.status {
        BookingStatus::Completed => Err(RegistrationError::AlreadyRegistered),
        BookingStatus::Expired => Err(RegistrationError::BookingExpired),
        BookingStatus::Pending if booking.check_out < clock.today() => {
            Err(RegistrationError::BookingExpired)
        }
        BookingStatus::Pending => Ok(booking),
    }
}

// Guest-facing booking lookup use case.
pub struct LookupBookingUseCase<S, C> {
    pub store: S,
    pub clock: C,
}

impl<S, C> LookupBookingUseCase<S, C>
where
    S: BookingStore,
    C: Clock,
{
    pub async fn execute(&self, token: &str) -> Result<Booking, RegistrationError> {
        open_booking(&self.store, &self.clock, token).await
    }
}
