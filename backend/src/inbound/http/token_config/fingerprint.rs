//! Signing secret fingerprinting for operational visibility.
//!
//! Operators compare the logged fingerprint across replicas to confirm they
//! share a secret without the secret itself reaching the logs.

use sha2::{Digest, Sha256};

use crate::domain::SigningSecret;

/// Length of the fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Truncated SHA-256 of the secret as 16 lowercase hex characters.
///
/// # Examples
///
/// ```rust
/// use focus_backend::domain::SigningSecret;
/// use focus_backend::inbound::http::token_config::fingerprint::secret_fingerprint;
///
/// let secret = SigningSecret::new(b"example-secret".to_vec()).expect("non-empty");
/// let fp = secret_fingerprint(&secret);
///
/// assert_eq!(fp.len(), 16);
/// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn secret_fingerprint(secret: &SigningSecret) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.expose());
    let digest = hasher.finalize();
    hex::encode(&digest[..FINGERPRINT_BYTES])
}
