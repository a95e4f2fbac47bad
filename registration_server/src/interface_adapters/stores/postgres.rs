use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::entities::{Booking, BookingStatus, Guest};
use crate::domain::errors::StoreError;
use crate::domain::ports::BookingStore;

// Constraint names from migrations/0001_bookings.sql.
const TOKEN_CONSTRAINT: &str = "bookings_registration_token_key";
const CODE_CONSTRAINT: &str = "bookings_confirmation_code_key";

const BOOKING_COLUMNS: &str = "id, property_id, check_in, check_out, confirmation_code, \
                               registration_token, status, created_at";

// PostgreSQL-backed booking store.
#[derive(Clone)]
pub struct PostgresBookingStore {
    pub db: PgPool,
}

#[derive(FromRow)]
struct BookingRow {
    id: Uuid,
    property_id: String,
    check_in: NaiveDate,
    check_out: NaiveDate,
    confirmation_code: String,
    registration_token: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = StoreError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: row.id,
            property_id: row.property_id,
            check_in: row.check_in,
            check_out: row.check_out,
            confirmation_code: row.confirmation_code,
            registration_token: row.registration_token,
            status: row.status.parse().map_err(StoreError::Unavailable)?,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct GuestRow {
    id: Uuid,
    booking_id: Uuid,
    confirmation_code: String,
    first_name: String,
    last_name: String,
    date_of_birth: NaiveDate,
    nationality: String,
    document_type: String,
    document_number: String,
    email: Option<String>,
    phone: Option<String>,
    document_url: Option<String>,
    registered_at: DateTime<Utc>,
}

impl TryFrom<GuestRow> for Guest {
    type Error = StoreError;

    fn try_from(row: GuestRow) -> Result<Self, Self::Error> {
        Ok(Guest {
            id: row.id,
            booking_id: row.booking_id,
            confirmation_code: row.confirmation_code,
            first_name: row.first_name,
            last_name: row.last_name,
            date_of_birth: row.date_of_birth,
            nationality: row.nationality,
            document_type: row
                .document_type
                .parse()
                .map_err(StoreError::Unavailable)?,
            document_number: row.document_number,
            email: row.email,
            phone: row.phone,
            document_url: row.document_url,
            registered_at: row.registered_at,
        })
    }
}

fn unavailable(err: sqlx::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

// Maps unique violations onto the field that caused them.
fn map_insert_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            match db_err.constraint() {
                Some(TOKEN_CONSTRAINT) => return StoreError::Duplicate("registration_token"),
                Some(CODE_CONSTRAINT) => return StoreError::Duplicate("confirmation_code"),
                _ => {}
            }
        }
    }
    unavailable(err)
}

fn into_bookings(rows: Vec<BookingRow>) -> Result<Vec<Booking>, StoreError> {
    rows.into_iter().map(Booking::try_from).collect()
}

#[async_trait]
impl BookingStore for PostgresBookingStore {
    async fn insert(&self, booking: Booking) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, property_id, check_in, check_out, confirmation_code,
                registration_token, status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(booking.id)
        .bind(&booking.property_id)
        .bind(booking.check_in)
        .bind(booking.check_out)
        .bind(&booking.confirmation_code)
        .bind(&booking.registration_token)
        .bind(booking.status.as_str())
        .bind(booking.created_at)
        .execute(&self.db)
        .await
        .map_err(map_insert_error)?;

        Ok(())
    }

    async fn token_exists(&self, token: &str) -> Result<bool, StoreError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM bookings WHERE registration_token = $1)",
        )
        .bind(token)
        .fetch_one(&self.db)
        .await
        .map_err(unavailable)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Booking>, StoreError> {
        let query = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE registration_token = $1");
        sqlx::query_as::<_, BookingRow>(&query)
            .bind(token)
            .fetch_optional(&self.db)
            .await
            .map_err(unavailable)?
            .map(Booking::try_from)
            .transpose()
    }

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        let query = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, BookingRow>(&query)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(unavailable)?
            .map(Booking::try_from)
            .transpose()
    }

    async fn list(&self, status: Option<BookingStatus>) -> Result<Vec<Booking>, StoreError> {
        let query = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings \
             WHERE ($1::TEXT IS NULL OR status = $1) \
             ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, BookingRow>(&query)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(&self.db)
            .await
            .map_err(unavailable)?;
        into_bookings(rows)
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE bookings SET status = $3 WHERE id = $1 AND status = $2")
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .execute(&self.db)
            .await
            .map_err(unavailable)?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        // Guests go with the booking via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(unavailable)?;
        Ok(result.rows_affected() == 1)
    }

    async fn complete_registration(
        &self,
        booking_id: Uuid,
        guests: Vec<Guest>,
    ) -> Result<bool, StoreError> {
        let mut tx = self.db.begin().await.map_err(unavailable)?;

        let updated = sqlx::query(
            "UPDATE bookings SET status = 'completed' WHERE id = $1 AND status = 'pending'",
        )
        .bind(booking_id)
        .execute(&mut *tx)
        .await
        .map_err(unavailable)?;
        if updated.rows_affected() == 0 {
            tx.rollback().await.map_err(unavailable)?;
            return Ok(false);
        }

        for guest in &guests {
            sqlx::query(
                r#"
                INSERT INTO guests (
                    id, booking_id, confirmation_code, first_name, last_name,
                    date_of_birth, nationality, document_type, document_number,
                    email, phone, document_url, registered_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                "#,
            )
            .bind(guest.id)
            .bind(guest.booking_id)
            .bind(&guest.confirmation_code)
            .bind(&guest.first_name)
            .bind(&guest.last_name)
            .bind(guest.date_of_birth)
            .bind(&guest.nationality)
            .bind(guest.document_type.as_str())
            .bind(&guest.document_number)
            .bind(&guest.email)
            .bind(&guest.phone)
            .bind(&guest.document_url)
            .bind(guest.registered_at)
            .execute(&mut *tx)
            .await
            .map_err(unavailable)?;
        }

        tx.commit().await.map_err(unavailable)?;
        Ok(true)
    }

    async fn guests_for_booking(&self, booking_id: Uuid) -> Result<Vec<Guest>, StoreError> {
        let rows = sqlx::query_as::<_, GuestRow>(
            r#"
            SELECT id, booking_id, confirmation_code, first_name, last_name,
                   date_of_birth, nationality, document_type, document_number,
                   email, phone, document_url, registered_at
            FROM guests
            WHERE booking_id = $1
            ORDER BY registered_at, last_name, first_name
            "#,
        )
        .bind(booking_id)
        .fetch_all(&self.db)
        .await
        .map_err(unavailable)?;

        rows.into_iter().map(Guest::try_from).collect()
    }
}
