use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use crate::domain::entities::{Booking, BookingStatus, DocumentType, Guest, GuestDetails};
use crate::domain::errors::StoreError;
use crate::domain::ports::{BookingStore, Clock, DocumentStore, TokenSource};

// Shared fixed time source for deterministic use-case tests.
pub(crate) struct FixedClock(pub(crate) DateTime<Utc>);

impl FixedClock {
    pub(crate) fn on(year: i32, month: u32, day: u32) -> Self {
        Self(
            Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
                .single()
                .expect("valid fixed clock time"),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(crate) fn pending_booking(token: &str, code: &str) -> Booking {
    Booking {
        id: Uuid::new_v4(),
        property_id: "villa-rosa".to_string(),
        check_in: date(2026, 7, 1),
        check_out: date(2026, 7, 8),
        confirmation_code: code.to_string(),
        registration_token: token.to_string(),
        status: BookingStatus::Pending,
        created_at: Utc
            .with_ymd_and_hms(2026, 6, 1, 9, 0, 0)
            .single()
            .expect("valid created_at"),
    }
}

pub(crate) fn guest_details(first_name: &str) -> GuestDetails {
    GuestDetails {
        first_name: first_name.to_string(),
        last_name: "Rossi".to_string(),
        date_of_birth: date(1988, 3, 14),
        nationality: "IT".to_string(),
        document_type: DocumentType::Passport,
        document_number: "YA7654321".to_string(),
        email: None,
        phone: None,
        document_url: None,
    }
}

// Token source yielding `cand<N>` padded to the requested length.
#[derive(Default)]
pub(crate) struct ScriptedTokenSource {
    calls: AtomicUsize,
    empty: bool,
}

impl ScriptedTokenSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn empty() -> Self {
        Self {
            empty: true,
            ..Self::default()
        }
    }

    pub(crate) fn candidate(attempt: usize, length: usize) -> String {
        let mut value = format!("cand{attempt}");
        while value.len() < length {
            value.push('x');
        }
        value.truncate(length);
        value
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TokenSource for ScriptedTokenSource {
    fn generate(&self, length: usize) -> String {
        let attempt = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.empty {
            return String::new();
        }
        Self::candidate(attempt, length)
    }
}

// Scripted answers for successive uniqueness checks.
#[derive(Clone, Copy, Debug)]
pub(crate) enum TokenCheck {
    Free,
    Taken,
    Unavailable,
}

// Store double that only answers `token_exists`, in script order.
// Once the script runs out every candidate is free.
pub(crate) struct TokenCheckStore {
    script: Mutex<VecDeque<TokenCheck>>,
    checked: Mutex<Vec<String>>,
}

impl TokenCheckStore {
    pub(crate) fn new(script: Vec<TokenCheck>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            checked: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.checked.lock().expect("checked mutex poisoned").len()
    }

    pub(crate) fn checked(&self) -> Vec<String> {
        self.checked.lock().expect("checked mutex poisoned").clone()
    }
}

fn not_scripted() -> StoreError {
    StoreError::Unavailable("not scripted".to_string())
}

#[async_trait]
impl BookingStore for TokenCheckStore {
    async fn insert(&self, _booking: Booking) -> Result<(), StoreError> {
        Err(not_scripted())
    }

    async fn token_exists(&self, token: &str) -> Result<bool, StoreError> {
        self.checked
            .lock()
            .expect("checked mutex poisoned")
            .push(token.to_string());
        let next = self
            .script
            .lock()
            .expect("script mutex poisoned")
            .pop_front()
            .unwrap_or(TokenCheck::Free);
        match next {
            TokenCheck::Free => Ok(false),
            TokenCheck::Taken => Ok(true),
            TokenCheck::Unavailable => Err(StoreError::Unavailable("connection reset".to_string())),
        }
    }

    async fn find_by_token(&self, _token: &str) -> Result<Option<Booking>, StoreError> {
        Err(not_scripted())
    }

    async fn get(&self, _id: Uuid) -> Result<Option<Booking>, StoreError> {
        Err(not_scripted())
    }

    async fn list(&self, _status: Option<BookingStatus>) -> Result<Vec<Booking>, StoreError> {
        Err(not_scripted())
    }

    async fn update_status(
        &self,
        _id: Uuid,
        _from: BookingStatus,
        _to: BookingStatus,
    ) -> Result<bool, StoreError> {
        Err(not_scripted())
    }

    async fn delete(&self, _id: Uuid) -> Result<bool, StoreError> {
        Err(not_scripted())
    }

    async fn complete_registration(
        &self,
        _booking_id: Uuid,
        _guests: Vec<Guest>,
    ) -> Result<bool, StoreError> {
        Err(not_scripted())
    }

    async fn guests_for_booking(&self, _booking_id: Uuid) -> Result<Vec<Guest>, StoreError> {
        Err(not_scripted())
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub insert: bool,
    pub read: bool,
    pub write: bool,
}

#[derive(Default)]
struct Tables {
    bookings: HashMap<Uuid, Booking>,
    guests: Vec<Guest>,
}

// Full in-memory booking store with failure toggles for negative paths.
#[derive(Clone, Default)]
pub(crate) struct RecordingStore {
    tables: Arc<Mutex<Tables>>,
    failures: FailureFlags,
    // Makes every insert report a unique violation on this field.
    duplicate_on_insert: Option<&'static str>,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn with_duplicate_on_insert(mut self, field: &'static str) -> Self {
        self.duplicate_on_insert = Some(field);
        self
    }

    pub(crate) fn insert_test_booking(&self, booking: Booking) {
        let mut guard = self.tables.lock().expect("tables mutex poisoned");
        guard.bookings.insert(booking.id, booking);
    }

    pub(crate) fn get_test_booking(&self, id: Uuid) -> Option<Booking> {
        let guard = self.tables.lock().expect("tables mutex poisoned");
        guard.bookings.get(&id).cloned()
    }

    pub(crate) fn booking_count(&self) -> usize {
        let guard = self.tables.lock().expect("tables mutex poisoned");
        guard.bookings.len()
    }

    pub(crate) fn test_guests(&self) -> Vec<Guest> {
        let guard = self.tables.lock().expect("tables mutex poisoned");
        guard.guests.clone()
    }

    fn fail(flag: bool, what: &str) -> Result<(), StoreError> {
        if flag {
            return Err(StoreError::Unavailable(format!("{what} failed")));
        }
        Ok(())
    }
}

#[async_trait]
impl BookingStore for RecordingStore {
    async fn insert(&self, booking: Booking) -> Result<(), StoreError> {
        Self::fail(self.failures.insert, "insert")?;
        if let Some(field) = self.duplicate_on_insert {
            return Err(StoreError::Duplicate(field));
        }
        let mut guard = self.tables.lock().expect("tables mutex poisoned");
        guard.bookings.insert(booking.id, booking);
        Ok(())
    }

    async fn token_exists(&self, token: &str) -> Result<bool, StoreError> {
        Self::fail(self.failures.read, "token_exists")?;
        let guard = self.tables.lock().expect("tables mutex poisoned");
        Ok(guard
            .bookings
            .values()
            .any(|b| b.registration_token == token))
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Booking>, StoreError> {
        Self::fail(self.failures.read, "find_by_token")?;
        let guard = self.tables.lock().expect("tables mutex poisoned");
        Ok(guard
            .bookings
            .values()
            .find(|b| b.registration_token == token)
            .cloned())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        Self::fail(self.failures.read, "get")?;
        let guard = self.tables.lock().expect("tables mutex poisoned");
        Ok(guard.bookings.get(&id).cloned())
    }

    async fn list(&self, status: Option<BookingStatus>) -> Result<Vec<Booking>, StoreError> {
        Self::fail(self.failures.read, "list")?;
        let guard = self.tables.lock().expect("tables mutex poisoned");
        let mut bookings: Vec<Booking> = guard
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
        Self::fail(self.failures.write, "update_status")?;
        let mut guard = self.tables.lock().expect("tables mutex poisoned");
        match guard.bookings.get_mut(&id) {
            Some(booking) if booking.status == from => {
                booking.status = to;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Self::fail(self.failures.write, "delete")?;
        let mut guard = self.tables.lock().expect("tables mutex poisoned");
        guard.guests.retain(|g| g.booking_id != id);
        Ok(guard.bookings.remove(&id).is_some())
    }

    async fn complete_registration(
        &self,
        booking_id: Uuid,
        guests: Vec<Guest>,
    ) -> Result<bool, StoreError> {
        Self::fail(self.failures.write, "complete_registration")?;
        let mut guard = self.tables.lock().expect("tables mutex poisoned");
        match guard.bookings.get_mut(&booking_id) {
            Some(booking) if booking.status == BookingStatus::Pending => {
                booking.status = BookingStatus::Completed;
            }
            _ => return Ok(false),
        }
        guard.guests.extend(guests);
        Ok(true)
    }

    async fn guests_for_booking(&self, booking_id: Uuid) -> Result<Vec<Guest>, StoreError> {
        Self::fail(self.failures.read, "guests_for_booking")?;
        let guard = self.tables.lock().expect("tables mutex poisoned");
        Ok(guard
            .guests
            .iter()
            .filter(|g| g.booking_id == booking_id)
            .cloned()
            .collect())
    }
}

// Document store double that records keys and can be told to fail.
#[derive(Clone, Default)]
pub(crate) struct RecordingDocumentStore {
    pub keys: Arc<Mutex<Vec<(String, usize)>>>,
    pub should_fail: bool,
}

impl RecordingDocumentStore {
    pub(crate) fn stored(&self) -> Vec<(String, usize)> {
        self.keys.lock().expect("keys mutex poisoned").clone()
    }
}

#[async_trait]
impl DocumentStore for RecordingDocumentStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<String, StoreError> {
        if self.should_fail {
            return Err(StoreError::Unavailable("put failed".to_string()));
        }
        self.keys
            .lock()
            .expect("keys mutex poisoned")
            .push((key.to_string(), bytes.len()));
        Ok(format!("https://files.test/uploads/{key}"))
    }
}
