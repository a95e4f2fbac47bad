use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::entities::{Booking, BookingStatus, Guest};
use crate::domain::errors::StoreError;
use crate::domain::ports::BookingStore;

#[derive(Default)]
struct Tables {
    bookings: HashMap<Uuid, Booking>,
    guests: Vec<Guest>,
}

// In-memory booking store for local runs and tests.
//
// Mirrors the unique constraints of the PostgreSQL schema so the booking
// workflow behaves the same on either adapter.
#[derive(Clone, Default)]
pub struct InMemoryBookingStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn insert(&self, booking: Booking) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        for existing in tables.bookings.values() {
            if existing.registration_token == booking.registration_token {
                return Err(StoreError::Duplicate("registration_token"));
            }
            if existing.confirmation_code == booking.confirmation_code {
                return Err(StoreError::Duplicate("confirmation_code"));
            }
        }
        tables.bookings.insert(booking.id, booking);
        Ok(())
    }

    async fn token_exists(&self, token: &str) -> Result<bool, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .bookings
            .values()
            .any(|b| b.registration_token == token))
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Booking>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .bookings
            .values()
            .find(|b| b.registration_token == token)
            .cloned())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.bookings.get(&id).cloned())
    }

    async fn list(&self, status: Option<BookingStatus>) -> Result<Vec<Booking>, StoreError> {
        let tables = self.tables.lock().await;
        let mut bookings: Vec<Booking> = tables
            .bookings
            .values()
            .filter(|b| status.is_none_or(|s| b.status == s))
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        match tables.bookings.get_mut(&id) {
            Some(booking) if booking.status == from => {
                booking.status = to;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        tables.guests.retain(|g| g.booking_id != id);
        Ok(tables.bookings.remove(&id).is_some())
    }

    async fn complete_registration(
        &self,
        booking_id: Uuid,
        guests: Vec<Guest>,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        match tables.bookings.get_mut(&booking_id) {
            Some(booking) if booking.status == BookingStatus::Pending => {
                booking.status = BookingStatus::Completed;
            }
            _ => return Ok(false),
        }
        tables.guests.extend(guests);
        Ok(true)
    }

    async fn guests_for_booking(&self, booking_id: Uuid) -> Result<Vec<Guest>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .guests
            .iter()
            .filter(|g| g.booking_id == booking_id)
            .cloned()
            .collect())
    }
}
