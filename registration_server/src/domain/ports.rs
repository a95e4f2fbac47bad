use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Booking, BookingStatus, Guest};
use crate::domain::errors::StoreError;

// Port for booking and guest persistence used by the workflows.
#[async_trait]
pub trait BookingStore: Send + Sync {
    // Atomic insert; unique violations come back as `StoreError::Duplicate`.
    async fn insert(&self, booking: Booking) -> Result<(), StoreError>;
    async fn token_exists(&self, token: &str) -> Result<bool, StoreError>;
    async fn find_by_token(&self, token: &str) -> Result<Option<Booking>, StoreError>;
    async fn get(&self, id: Uuid) -> Result<Option<Booking>, StoreError>;
    // Newest first.
    async fn list(&self, status: Option<BookingStatus>) -> Result<Vec<Booking>, StoreError>;
    // Compare-and-set on status; returns false when the current status differs.
    async fn update_status(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<bool, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
    // Stores the guests and flips pending -> completed in one step.
    // Returns false, storing nothing, when the booking is no longer pending.
    async fn complete_registration(
        &self,
        booking_id: Uuid,
        guests: Vec<Guest>,
    ) -> Result<bool, StoreError>;
    async fn guests_for_booking(&self, booking_id: Uuid) -> Result<Vec<Guest>, StoreError>;
}

// Port for the blob store holding uploaded document scans.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    // Persists the blob under `key` and returns a retrievable URL.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<String, StoreError>;
}

// Port for the random source behind registration tokens.
pub trait TokenSource: Send + Sync {
    fn generate(&self, length: usize) -> String;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

// Shared adapters are held as `Arc<dyn Port>` in the app state; these
// forwarding impls let them be handed to the generic use cases directly.
#[async_trait]
impl<T: BookingStore + ?Sized> BookingStore for Arc<T> {
    async fn insert(&self, booking: Booking) -> Result<(), StoreError> {
        (**self).insert(booking).await
    }

    async fn token_exists(&self, token: &str) -> Result<bool, StoreError> {
        (**self).token_exists(token).await
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Booking>, StoreError> {
        (**self).find_by_token(token).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        (**self).get(id).await
    }

    async fn list(&self, status: Option<BookingStatus>) -> Result<Vec<Booking>, StoreError> {
        (**self).list(status).await
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<bool, StoreError> {
        (**self).update_status(id, from, to).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        (**self).delete(id).await
    }

    async fn complete_registration(
        &self,
        booking_id: Uuid,
        guests: Vec<Guest>,
    ) -> Result<bool, StoreError> {
        (**self).complete_registration(booking_id, guests).await
    }

    async fn guests_for_booking(&self, booking_id: Uuid) -> Result<Vec<Guest>, StoreError> {
        (**self).guests_for_booking(booking_id).await
    }
}

#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<String, StoreError> {
        (**self).put(key, bytes).await
    }
}

impl<T: TokenSource + ?Sized> TokenSource for Arc<T> {
    fn generate(&self, length: usize) -> String {
        (**self).generate(length)
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
