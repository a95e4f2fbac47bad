use uuid::Uuid;

use crate::domain::entities::{Booking, BookingStatus, Guest};
use crate::domain::errors::{BookingError, StoreError};
use crate::domain::ports::BookingStore;

// Admin-side booking queries and maintenance.
pub struct ManageBookingsUseCase<S> {
    pub store: S,
}

impl<S> ManageBookingsUseCase<S>
where
    S: BookingStore,
{
    pub async fn list(&self, status: Option<BookingStatus>) -> Result<Vec<Booking>, BookingError> {
        self.store.list(status).await.map_err(storage_failure)
    }

    pub async fn get(&self, id: Uuid) -> Result<Booking, BookingError> {
        self.store
            .get(id)
            .await
            .map_err(storage_failure)?
            .ok_or(BookingError::NotFound)
    }

    // Only pending -> expired is reachable here; completion belongs to the
    // guest registration flow.
    pub async fn update_status(
        &self,
        id: Uuid,
        next: BookingStatus,
    ) -> Result<Booking, BookingError> {
        let mut booking = self.get(id).await?;

        let allowed = next == BookingStatus::Expired && booking.status.can_transition_to(next);
        if !allowed {
            return Err(BookingError::InvalidTransition {
                from: booking.status.to_string(),
                to: next.to_string(),
            });
        }

        let updated = self
            .store
            .update_status(id, booking.status, next)
            .await
            .map_err(storage_failure)?;
        if !updated {
            // Someone else moved the booking between our read and write.
            let current = self.get(id).await?;
            return Err(BookingError::InvalidTransition {
                from: current.status.to_string(),
                to: next.to_string(),
            });
        }

        tracing::info!(booking_id = %id, status = %next, "booking status updated");
        booking.status = next;
        Ok(booking)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), BookingError> {
        let removed = self.store.delete(id).await.map_err(storage_failure)?;
        if !removed {
            return Err(BookingError::NotFound);
        }
        tracing::info!(booking_id = %id, "booking deleted");
        Ok(())
    }

    pub async fn guests(&self, id: Uuid) -> Result<Vec<Guest>, BookingError> {
        // Distinguish "no guests yet" from "no such booking".
        self.get(id).await?;
        self.store
            .guests_for_booking(id)
            .await
            .map_err(storage_failure)
    }
}

fn storage_failure(err: StoreError) -> BookingError {
    tracing::error!(error = %err, "booking store failure");
    BookingError::StorageFailure(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{pending_booking, FailureFlags, RecordingStore};
    use chrono::Duration;

    #[tokio::test]
    async fn when_listing_then_bookings_are_newest_first_and_filtered_by_status() {
        let store = RecordingStore::new();
        let older = pending_booking("token-older1", "CODE1");
        let mut newer = pending_booking("token-newer1", "CODE2");
        newer.created_at = older.created_at + Duration::hours(1);
        let mut expired = pending_booking("token-expir1", "CODE3");
        expired.status = BookingStatus::Expired;
        store.insert_test_booking(older.clone());
        store.insert_test_booking(newer.clone());
        store.insert_test_booking(expired);
        let use_case = ManageBookingsUseCase { store };

        let pending = use_case
            .list(Some(BookingStatus::Pending))
            .await
            .expect("expected list to succeed");
        let all = use_case.list(None).await.expect("expected list to succeed");

        let ids: Vec<_> = pending.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn when_booking_is_missing_then_get_returns_not_found() {
        let use_case = ManageBookingsUseCase {
            store: RecordingStore::new(),
        };

        let result = use_case.get(Uuid::new_v4()).await;

        assert!(matches!(result, Err(BookingError::NotFound)));
    }

    #[tokio::test]
    async fn when_pending_booking_is_expired_then_status_is_persisted() {
        let store = RecordingStore::new();
        let booking = pending_booking("token-pend01", "CODE1");
        store.insert_test_booking(booking.clone());
        let use_case = ManageBookingsUseCase {
            store: store.clone(),
        };

        let updated = use_case
            .update_status(booking.id, BookingStatus::Expired)
            .await
            .expect("expected status update to succeed");

        assert_eq!(updated.status, BookingStatus::Expired);
        let saved = store.get_test_booking(booking.id).expect("expected booking");
        assert_eq!(saved.status, BookingStatus::Expired);
    }

    #[tokio::test]
    async fn when_admin_tries_to_complete_booking_then_transition_is_rejected() {
        let store = RecordingStore::new();
        let booking = pending_booking("token-pend02", "CODE1");
        store.insert_test_booking(booking.clone());
        let use_case = ManageBookingsUseCase { store };

        let result = use_case
            .update_status(booking.id, BookingStatus::Completed)
            .await;

        assert!(matches!(result, Err(BookingError::InvalidTransition { .. })));
    }

    #[tokio::test]
    async fn when_booking_is_completed_then_it_cannot_be_expired() {
        let store = RecordingStore::new();
        let mut booking = pending_booking("token-done01", "CODE1");
        booking.status = BookingStatus::Completed;
        store.insert_test_booking(booking.clone());
        let use_case = ManageBookingsUseCase { store };

        let result = use_case
            .update_status(booking.id, BookingStatus::Expired)
            .await;

        match result {
            Err(BookingError::InvalidTransition { from, to }) => {
                assert_eq!(from, "completed");
                assert_eq!(to, "expired");
            }
            other => panic!("expected invalid transition, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn when_booking_is_deleted_then_a_second_delete_returns_not_found() {
        let store = RecordingStore::new();
        let booking = pending_booking("token-del001", "CODE1");
        store.insert_test_booking(booking.clone());
        let use_case = ManageBookingsUseCase {
            store: store.clone(),
        };

        use_case
            .delete(booking.id)
            .await
            .expect("expected delete to succeed");

        assert!(store.get_test_booking(booking.id).is_none());
        assert!(matches!(
            use_case.delete(booking.id).await,
            Err(BookingError::NotFound)
        ));
    }

    #[tokio::test]
    async fn when_listing_guests_for_unknown_booking_then_returns_not_found() {
        let use_case = ManageBookingsUseCase {
            store: RecordingStore::new(),
        };

        let result = use_case.guests(Uuid::new_v4()).await;

        assert!(matches!(result, Err(BookingError::NotFound)));
    }

    #[tokio::test]
    async fn when_store_read_fails_then_returns_storage_failure() {
        let use_case = ManageBookingsUseCase {
            store: RecordingStore::new().with_failures(FailureFlags {
                read: true,
                ..Default::default()
            }),
        };

        let result = use_case.list(None).await;

        assert!(matches!(result, Err(BookingError::StorageFailure(_))));
    }
}
