use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};

use crate::domain::ports::TokenSource;

/// Returns `length` URL-safe characters (`[A-Za-z0-9_-]`) drawn from the OS
/// CSPRNG.
///
/// Enough bytes are drawn that their base64url encoding covers `length`
/// characters; the encoding is then truncated. Every kept character carries
/// six uniformly random bits.
pub fn random_token(length: usize) -> String {
    let mut buffer = vec![0u8; (length * 3).div_ceil(4)];
    OsRng.fill_bytes(&mut buffer);
    let mut token = URL_SAFE_NO_PAD.encode(buffer);
    token.truncate(length);
    token
}

// OS-entropy token source used by the token issuer.
#[derive(Clone, Copy, Default)]
pub struct SecureTokenSource;

impl TokenSource for SecureTokenSource {
    fn generate(&self, length: usize) -> String {
        random_token(length)
    }
}
