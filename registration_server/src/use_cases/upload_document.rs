use uuid::Uuid;

use crate::domain::entities::DocumentUpload;
use crate::domain::errors::RegistrationError;
use crate::domain::ports::{BookingStore, Clock, DocumentStore};
use crate::use_cases::lookup_booking::open_booking;

// Content types accepted for identity document scans, with file extensions.
const ACCEPTED_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("application/pdf", "pdf"),
];

pub struct UploadDocumentResponse {
    pub url: String,
}

// Document scan upload use case with injected dependencies.
pub struct UploadDocumentUseCase<S, D, C> {
    pub store: S,
    pub documents: D,
    pub clock: C,
    pub max_bytes: usize,
}

impl<S, D, C> UploadDocumentUseCase<S, D, C>
where
    S: BookingStore,
    D: DocumentStore,
    C: Clock,
{
    pub async fn execute(
        &self,
        token: &str,
        upload: DocumentUpload,
    ) -> Result<UploadDocumentResponse, RegistrationError> {
        let booking = open_booking(&self.store, &self.clock, token).await?;

        let content_type = upload.content_type.trim().to_ascii_lowercase();
        let extension = ACCEPTED_TYPES
            .iter()
            .find(|(mime, _)| *mime == content_type)
            .map(|(_, ext)| *ext)
            .ok_or_else(|| RegistrationError::UnsupportedMediaType(upload.content_type.clone()))?;

        if upload.bytes.len() > self.max_bytes {
            return Err(RegistrationError::DocumentTooLarge {
                limit: self.max_bytes,
            });
        }

        let size = upload.bytes.len();
        let key = format!("{}/{}.{}", booking.id, Uuid::new_v4(), extension);
        let url = self
            .documents
            .put(&key, upload.bytes)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "failed to store document");
                RegistrationError::StorageFailure(err.to_string())
            })?;

        tracing::info!(booking_id = %booking.id, size, "document uploaded");

        Ok(UploadDocumentResponse { url })
    }
}
