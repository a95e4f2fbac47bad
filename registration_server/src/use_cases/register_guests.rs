use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Guest, GuestDetails};
use crate::domain::errors::{FieldError, RegistrationError};
use crate::domain::ports::{BookingStore, Clock};
use crate::domain::validation::{non_blank, validate_document_url, validate_guest};
use crate::use_cases::lookup_booking::open_booking;

pub const MAX_GUESTS_PER_BOOKING: usize = 16;

// Result of a completed self-registration.
pub struct RegisterGuestsResponse {
    pub booking_id: Uuid,
    pub confirmation_code: String,
    pub guests: Vec<Guest>,
}

// Guest self-registration use case with injected dependencies.
pub struct RegisterGuestsUseCase<S, C> {
    pub store: S,
    pub clock: C,
    // Public URL the document store serves uploads under, e.g. `https://host/uploads`.
    pub documents_base_url: Arc<str>,
}

impl<S, C> RegisterGuestsUseCase<S, C>
where
    S: BookingStore,
    C: Clock,
{
    pub async fn execute(
        &self,
        token: &str,
        entries: Vec<GuestDetails>,
    ) -> Result<RegisterGuestsResponse, RegistrationError> {
        let booking = open_booking(&self.store, &self.clock, token).await?;

        let today = self.clock.today();
        let mut errors = Vec::new();
        if entries.is_empty() {
            errors.push(FieldError::new("guests", "at least one guest is required"));
        } else if entries.len() > MAX_GUESTS_PER_BOOKING {
            errors.push(FieldError::new(
                "guests",
                format!("at most {MAX_GUESTS_PER_BOOKING} guests per booking"),
            ));
        }
        let document_prefix = format!(
            "{}/{}/",
            self.documents_base_url.trim_end_matches('/'),
            booking.id
        );
        for (index, entry) in entries.iter().enumerate() {
            let prefix = format!("guests[{index}]");
            validate_guest(&prefix, entry, today, &mut errors);
            validate_document_url(&prefix, &entry.document_url, &document_prefix, &mut errors);
        }
        if !errors.is_empty() {
            return Err(RegistrationError::Validation(errors));
        }

        let registered_at = self.clock.now();
        let guests: Vec<Guest> = entries
            .into_iter()
            .map(|entry| Guest {
                id: Uuid::new_v4(),
                booking_id: booking.id,
                confirmation_code: booking.confirmation_code.clone(),
                first_name: entry.first_name.trim().to_string(),
                last_name: entry.last_name.trim().to_string(),
                date_of_birth: entry.date_of_birth,
                nationality: entry.nationality,
                document_type: entry.document_type,
                document_number: entry.document_number.trim().to_ascii_uppercase(),
                email: non_blank(&entry.email).map(str::to_string),
                phone: non_blank(&entry.phone).map(str::to_string),
                document_url: non_blank(&entry.document_url).map(str::to_string),
                registered_at,
            })
            .collect();

        let completed = self
            .store
            .complete_registration(booking.id, guests.clone())
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "failed to store guest registration");
                RegistrationError::StorageFailure(err.to_string())
            })?;
        if !completed {
            // A concurrent submission or an admin action got there first.
            return Err(RegistrationError::AlreadyRegistered);
        }

        tracing::info!(
            booking_id = %booking.id,
            guest_count = guests.len(),
            "guest registration completed"
        );

        Ok(RegisterGuestsResponse {
            booking_id: booking.id,
            confirmation_code: booking.confirmation_code,
            guests,
        })
    }
}
