//! Password verification against stored Argon2 PHC strings.
//!
//! Hashes are written by whatever provisions accounts; this service only
//! checks a presented password against the stored hash.

use argon2::password_hash::{self, PasswordHash};
use argon2::{Argon2, PasswordVerifier};
use zeroize::Zeroizing;

use super::Error;

/// Stored hash could not be parsed or verified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored password hash is unusable: {message}")]
pub struct PasswordHashError {
    message: String,
}

/// Check `password` against a PHC-format hash.
///
/// Returns `Ok(false)` on mismatch and an error when the stored hash is
/// malformed.
pub fn verify_password(password: &str, phc: &str) -> Result<bool, PasswordHashError> {
    let parsed = PasswordHash::new(phc).map_err(|err| PasswordHashError {
        message: err.to_string(),
    })?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(err) => Err(PasswordHashError {
            message: err.to_string(),
        }),
    }
}

/// Run [`verify_password`] on the blocking pool.
pub(crate) async fn verify_password_blocking(
    password: &str,
    phc: String,
) -> Result<bool, Error> {
    let password = Zeroizing::new(password.to_owned());
    tokio::task::spawn_blocking(move || verify_password(&password, &phc))
        .await
        .map_err(|err| Error::internal(format!("password check did not complete: {err}")))?
        .map_err(|err| Error::internal(err.to_string()))
}

#[cfg(test)]
pub(crate) mod test_hashes {
    //! Deterministic hashes for tests.
    use argon2::password_hash::{PasswordHasher, SaltString};
    use argon2::Argon2;

    /// Argon2id PHC string for `password` with a fixed salt.
    pub(crate) fn hash(password: &str) -> String {
        let salt = SaltString::encode_b64(b"focus-test-salt!").expect("valid salt");
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .expect("hashing succeeds")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::test_hashes::hash;
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("hunter2", true)]
    #[case("Hunter2", false)]
    #[case("", false)]
    fn matches_only_the_hashed_password(#[case] attempt: &str, #[case] expected: bool) {
        let stored = hash("hunter2");
        assert_eq!(verify_password(attempt, &stored).expect("valid hash"), expected);
    }

    #[rstest]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("pw", "not-a-hash").is_err());
    }

    #[rstest]
    #[tokio::test]
    async fn blocking_wrapper_maps_bad_hashes_to_internal_errors() {
        let err = verify_password_blocking("pw", "not-a-hash".to_owned())
            .await
            .expect_err("malformed hash");
        assert_eq!(err.code(), crate::domain::ErrorCode::InternalError);
    }
}
