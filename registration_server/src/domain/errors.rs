use serde::Serialize;
use thiserror::Error;

// Failures reported by storage ports.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    // A uniqueness constraint rejected the write; the payload names the field.
    #[error("duplicate value for {0}")]
    Duplicate(&'static str),
}

// Token issuance failures.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token length must be greater than zero")]
    InvalidLength,
    #[error("retry budget must be at least one")]
    InvalidRetryBudget,
    #[error("token candidate is empty")]
    EmptyCandidate,
    #[error("uniqueness check failed: {0}")]
    StoreUnavailable(String),
    #[error("no unique token after {attempts} attempts")]
    TokenGenerationExhausted { attempts: u32 },
}

// Single field-level validation problem.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

// Domain-level errors for admin booking workflows.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("invalid booking data")]
    Validation(Vec<FieldError>),
    #[error("booking not found")]
    NotFound,
    #[error("confirmation code already in use")]
    DuplicateConfirmationCode,
    #[error("registration token collided on insert")]
    TokenConflict,
    #[error("status transition from {from} to {to} is not allowed")]
    InvalidTransition { from: String, to: String },
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("storage failure: {0}")]
    StorageFailure(String),
}

// Domain-level errors for the token-keyed guest workflows.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("invalid registration token")]
    InvalidToken,
    #[error("booking already registered")]
    AlreadyRegistered,
    #[error("booking expired")]
    BookingExpired,
    #[error("invalid guest data")]
    Validation(Vec<FieldError>),
    #[error("unsupported document type: {0}")]
    UnsupportedMediaType(String),
    #[error("document exceeds {limit} bytes")]
    DocumentTooLarge { limit: usize },
    #[error("storage failure: {0}")]
    StorageFailure(String),
}
