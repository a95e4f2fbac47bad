use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// Lifecycle of a booking with respect to guest registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Completed,
    Expired,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Completed => "completed",
            BookingStatus::Expired => "expired",
        }
    }

    // Only pending bookings move; completed and expired are terminal.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Completed)
                | (BookingStatus::Pending, BookingStatus::Expired)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(BookingStatus::Pending),
            "completed" => Ok(BookingStatus::Completed),
            "expired" => Ok(BookingStatus::Expired),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}

// Reservation eligible for guest self-registration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub property_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub confirmation_code: String,
    pub registration_token: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Passport,
    IdCard,
    DrivingLicense,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Passport => "passport",
            DocumentType::IdCard => "id_card",
            DocumentType::DrivingLicense => "driving_license",
        }
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "passport" => Ok(DocumentType::Passport),
            "id_card" => Ok(DocumentType::IdCard),
            "driving_license" => Ok(DocumentType::DrivingLicense),
            other => Err(format!("unknown document type: {other}")),
        }
    }
}

// Registered occupant, linked to its booking by confirmation code.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Guest {
    pub id: Uuid,
    pub booking_id: Uuid,
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

// Guest fields as submitted by the registration form, before validation.
#[derive(Clone, Debug, Deserialize)]
pub struct GuestDetails {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub nationality: String,
    pub document_type: DocumentType,
    pub document_number: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub document_url: Option<String>,
}

// Uploaded identity document scan as received at the boundary.
#[derive(Clone, Debug)]
pub struct DocumentUpload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}
