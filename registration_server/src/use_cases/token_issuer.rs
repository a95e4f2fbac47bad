use crate::domain::errors::TokenError;
use crate::domain::ports::{BookingStore, TokenSource};

pub const DEFAULT_TOKEN_LENGTH: usize = 12;
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Issues registration tokens that do not collide with any stored booking.
///
/// Uniqueness holds at check time only. Two concurrent issuers may still race
/// between the check and the booking insert; the store's unique constraint on
/// the token column is what finally rejects a duplicate.
pub struct TokenIssuer<G, S> {
    pub source: G,
    pub store: S,
    pub length: usize,
    pub max_retries: u32,
}

impl<G, S> TokenIssuer<G, S>
where
    G: TokenSource,
    S: BookingStore,
{
    pub fn new(source: G, store: S) -> Self {
        Self {
            source,
            store,
            length: DEFAULT_TOKEN_LENGTH,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub async fn generate_unique_token(&self) -> Result<String, TokenError> {
        if self.length == 0 {
            return Err(TokenError::InvalidLength);
        }
        if self.max_retries == 0 {
            return Err(TokenError::InvalidRetryBudget);
        }

        for attempt in 1..=self.max_retries {
            let candidate = self.source.generate(self.length);

            if !self.token_exists(&candidate).await? {
                tracing::debug!(attempt, "registration token issued");
                return Ok(candidate);
            }

            tracing::warn!(
                attempt,
                max_retries = self.max_retries,
                "registration token collision"
            );
        }

        Err(TokenError::TokenGenerationExhausted {
            attempts: self.max_retries,
        })
    }

    // A failed lookup must never read as "free".
    async fn token_exists(&self, candidate: &str) -> Result<bool, TokenError> {
        if candidate.is_empty() {
            return Err(TokenError::EmptyCandidate);
        }

        self.store.token_exists(candidate).await.map_err(|err| {
            tracing::error!(error = %err, "registration token uniqueness check failed");
            TokenError::StoreUnavailable(err.to_string())
        })
    }
}
