use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

use crate::domain::ports::{BookingStore, Clock, DocumentStore, TokenSource};

// Request-independent knobs the handlers pass into the use cases.
#[derive(Clone)]
pub struct Policy {
    pub admin_token: Arc<str>,
    pub token_length: usize,
    pub token_max_retries: u32,
    pub max_upload_bytes: usize,
    // Public URL prefix of stored documents; guest document URLs must live under it.
    pub documents_base_url: Arc<str>,
}

impl fmt::Debug for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Policy")
            .field("admin_token", &"<redacted>")
            .field("token_length", &self.token_length)
            .field("token_max_retries", &self.token_max_retries)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("documents_base_url", &self.documents_base_url)
            .finish()
    }
}

// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    // We use Arc<dyn Trait> so the server can pick adapters at startup.
    pub bookings: Arc<dyn BookingStore>,
    pub documents: Arc<dyn DocumentStore>,
    pub tokens: Arc<dyn TokenSource>,
    pub clock: Arc<dyn Clock>,
    pub policy: Policy,
}

// System clock adapter used by the registration use cases.
#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
